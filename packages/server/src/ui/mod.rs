//! UI layer: axum server, WebSocket and HTTP handlers.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
