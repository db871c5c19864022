//! Outbound services used by the storefront.
//!
//! # Services
//!
//! - `chat` - Shopping assistant proxy to a Gemini-compatible model

pub mod chat;

pub use chat::{ChatClient, ChatError};
