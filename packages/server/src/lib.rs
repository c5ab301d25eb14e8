//! WebRTC signaling and room-coordination server.
//!
//! Clients join rooms over a WebSocket, exchange SDP offers/answers and ICE
//! candidates through the server, chat, and publish media-state changes.
//! Room state lives in memory only.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod testing;

// Re-export entry points
pub use ui::run as run_server;
