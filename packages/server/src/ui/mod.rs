//! WebSocket signaling server and its HTTP API.

mod handler;
mod router;
mod runner;
mod signal;
pub mod state;

pub use router::SignalingRouter;
pub use runner::{create_app, run, serve};
