//! Infrastructure layer: wire formats, connections, fan-out and storage.

pub mod broadcast;
pub mod connection;
pub mod dto;
pub mod repository;
