//! Chat client library for short-lived chat rooms.
//!
//! The session core keeps one logical chat session (room + identity)
//! consistent across restarts, transient disconnects and reconnect races,
//! while deduplicating messages and reflecting room expiry deterministically.
//! The room-management API and the broadcast server are external services;
//! this crate only talks to them.

// layers
pub mod client;
pub mod infrastructure;

// shared library
pub mod common;
