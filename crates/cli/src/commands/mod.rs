//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod chat;
