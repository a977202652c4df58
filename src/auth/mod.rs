pub mod csrf;
pub mod guard;
pub mod middleware;
pub mod session;
pub mod validate;
