//! Tagmark: a self-hosted bookmark store.
//!
//! Bookmarks carry lowercase tags, live in a flat JSON database file and are
//! managed through a small CRUD protocol served over a websocket (or stdio).
//! This library crate exposes all modules for use by the binaries and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
pub mod ws_server;
