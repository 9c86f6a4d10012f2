//! gocu library
//!
//! A curl copycat with persistent `{{name}}` variables. This module exposes
//! the variable cache, placeholder resolver, HTTP types and CLI model for use
//! by the binary and in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod http;
pub mod resolver;
