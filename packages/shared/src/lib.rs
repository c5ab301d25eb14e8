//! Shared utilities for the Kaigi signaling server.

pub mod logger;
pub mod time;
