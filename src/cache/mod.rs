//! Persistent variable cache
//!
//! This module provides the `VariableStore`, a name to value mapping kept in a
//! single flat file in the user cache directory, and the codec that reads and
//! writes that file. Stored variables are substituted into requests through
//! `{{name}}` placeholders.

pub mod codec;
mod store;

pub use codec::CodecError;
pub use store::{StoreError, VariableStore, CACHE_FILE_NAME};
