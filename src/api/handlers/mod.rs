//! HTTP request handlers.

pub mod auth_handler;
pub mod mobile_handler;

pub use auth_handler::auth_routes;
pub use mobile_handler::mobile_routes;
