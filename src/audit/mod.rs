//! Audit logging module.
//!
//! Records every dispatch attempt as one JSON object per line: who invoked
//! what, against which target, and how the invocation ended.

mod entry;
mod logger;

pub use entry::{AuditEntry, AuditOutcome};
pub use logger::AuditLogger;
