use actix_web::cookie::Key;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub bind_addr: String,
    pub session_key: Key,
    pub cookie_secure: bool,
}

impl Config {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        // Session encryption key; a generated one loses sessions on restart.
        let session_key = match lookup("SESSION_KEY") {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need 64+), generating random key",
                    val.len()
                );
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        };

        Self {
            api_url,
            bind_addr,
            session_key,
            cookie_secure,
        }
    }
}
