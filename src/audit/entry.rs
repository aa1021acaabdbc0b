//! Audit entry types.

use serde::Serialize;
use uuid::Uuid;

use crate::commands::ExecutionMode;
use crate::entity::Uid;

/// A single audit log entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// RFC 3339 timestamp of the invocation.
    pub timestamp: String,
    pub invocation_id: Uuid,
    /// Invoker identity (`console` or the account id).
    pub invoker: String,
    /// Label or alias as typed.
    pub label: String,
    /// Uid of the resolved target, if resolution got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Uid>,
    pub outcome: AuditOutcome,
}

impl AuditEntry {
    pub fn new(
        timestamp: String,
        invocation_id: Uuid,
        invoker: String,
        label: String,
        target: Option<Uid>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            timestamp,
            invocation_id,
            invoker,
            label,
            target,
            outcome,
        }
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The handler was run (or handed to a concurrent task).
    Executed { mode: ExecutionMode },
    /// Remembered target set.
    TargetSet { uid: Uid },
    /// Remembered target cleared.
    TargetCleared,
    /// The permission policy refused the command.
    Denied { node: String },
    /// Aborted with feedback to the invoker.
    Rejected { reason: String },
}
