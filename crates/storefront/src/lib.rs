//! Grocer storefront library.
//!
//! This crate provides the storefront HTTP service as a library, allowing it
//! to be tested end to end and embedded by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
