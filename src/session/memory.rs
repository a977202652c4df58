use std::sync::{Arc, Mutex};

use super::{SessionState, SessionStorage};

/// In-process storage, shared between clones.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<SessionState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> SessionState {
        self.snapshot()
    }

    fn store(&self, state: &SessionState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state.clone();
    }

    fn clear(&self) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = SessionState::default();
    }
}
