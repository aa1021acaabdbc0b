//! Error types for the command map.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
