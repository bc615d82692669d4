//! API module
//!
//! Contains HTTP request handlers for chat endpoints

pub mod chats;
