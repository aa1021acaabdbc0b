//! Command Map Library
//!
//! Runtime command registry and dispatcher for multi-user interactive
//! servers: maps command text from the console or a connected player to a
//! registered handler, resolves the command's target, consults the
//! permission policy and runs the handler inline or concurrently.

pub mod audit;
pub mod commands;
pub mod config;
pub mod entity;
pub mod error;
pub mod feedback;
pub mod permission;
