//! Per-invocation context handed to handlers.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::entity::{InvokerId, Player};
use crate::feedback::FeedbackSink;

/// Execution context for a command.
///
/// Owns everything it holds so that concurrent handlers can take it onto
/// another thread.
#[derive(Clone)]
pub struct CommandContext {
    /// Unique identifier for this invocation.
    pub invocation_id: Uuid,
    /// The label or alias the command was invoked with.
    pub label: String,
    /// The invoking player, `None` for the console.
    pub invoker: Option<Arc<Player>>,
    /// The resolved target.
    pub target: Option<Arc<Player>>,
    feedback: Arc<dyn FeedbackSink>,
}

impl CommandContext {
    pub fn new(
        invocation_id: Uuid,
        label: String,
        invoker: Option<Arc<Player>>,
        target: Option<Arc<Player>>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            invocation_id,
            label,
            invoker,
            target,
            feedback,
        }
    }

    pub fn invoker_id(&self) -> InvokerId {
        InvokerId::of(self.invoker.as_deref())
    }

    /// Send feedback to the invoker.
    pub fn reply(&self, key: &str, args: &[String]) {
        self.feedback.send(self.invoker.as_deref(), key, args);
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("invocation_id", &self.invocation_id)
            .field("label", &self.label)
            .field("invoker", &self.invoker_id())
            .field("target", &self.target.as_ref().map(|t| t.uid()))
            .finish()
    }
}
