//! HTTP 层

pub mod dto;
pub mod error;

mod handlers;
mod routes;
mod server;
mod state;

pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
