pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod session;
pub mod state;
pub mod templates_structs;
pub mod workflow;
