//! Chat Backend Library
//!
//! Chat persistence over HTTP with optional AI replies and bearer-token ownership.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod completion;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
