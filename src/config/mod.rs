//! Configuration module for the command map.
//!
//! Handles loading and validating configuration from TOML files.

mod settings;

pub use settings::*;
