//! Repository implementations.
//!
//! Use cases reach room state only through a repository, which owns the
//! locking discipline.

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
