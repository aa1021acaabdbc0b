//! Feedback sink trait and the bundled implementations.

use std::io::Write;
use std::sync::Mutex;

use tracing::{info, warn};

use crate::entity::{InvokerId, Player};

/// Receives feedback for an invoker.
///
/// `recipient` is `None` for the operator console.
pub trait FeedbackSink: Send + Sync {
    fn send(&self, recipient: Option<&Player>, key: &str, args: &[String]);
}

/// A feedback message captured by [`MemoryFeedback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub recipient: InvokerId,
    pub key: String,
    pub args: Vec<String>,
}

/// Writes console feedback to stdout and logs player feedback.
///
/// Player-bound messages belong to the transport layer, which is not part
/// of this crate, so they only show up in the log.
#[derive(Debug, Default)]
pub struct ConsoleFeedback;

impl ConsoleFeedback {
    pub fn new() -> Self {
        Self
    }
}

impl FeedbackSink for ConsoleFeedback {
    fn send(&self, recipient: Option<&Player>, key: &str, args: &[String]) {
        match recipient {
            None => {
                let mut stdout = std::io::stdout().lock();
                let line = if args.is_empty() {
                    key.to_string()
                } else {
                    format!("{} {}", key, args.join(" "))
                };
                if let Err(e) = writeln!(stdout, "{}", line) {
                    warn!(error = %e, key, "Failed to write console feedback");
                }
            }
            Some(player) => {
                info!(
                    uid = player.uid(),
                    account = player.account_id(),
                    key,
                    args = ?args,
                    "Feedback to player"
                );
            }
        }
    }
}

/// Buffers feedback in memory.
#[derive(Debug, Default)]
pub struct MemoryFeedback {
    messages: Mutex<Vec<FeedbackMessage>>,
}

impl MemoryFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message received so far.
    pub fn messages(&self) -> Vec<FeedbackMessage> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Message keys in the order they were received.
    pub fn keys(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|m| m.key.clone())
            .collect()
    }

    /// Drain and return everything received so far.
    pub fn take(&self) -> Vec<FeedbackMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl FeedbackSink for MemoryFeedback {
    fn send(&self, recipient: Option<&Player>, key: &str, args: &[String]) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(FeedbackMessage {
                recipient: InvokerId::of(recipient),
                key: key.to_string(),
                args: args.to_vec(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::keys;

    #[test]
    fn test_memory_feedback_records_recipient() {
        let sink = MemoryFeedback::new();
        let player = Player::new(7, "acct-7", true);

        sink.send(None, keys::NOT_SPECIFIED, &[]);
        sink.send(Some(&player), keys::UNKNOWN_COMMAND, &["warp".to_string()]);

        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].recipient, InvokerId::Console);
        assert_eq!(messages[1].recipient, InvokerId::Account("acct-7".to_string()));
        assert_eq!(messages[1].args, vec!["warp".to_string()]);
    }

    #[test]
    fn test_memory_feedback_take_drains() {
        let sink = MemoryFeedback::new();
        sink.send(None, keys::CLEAR_TARGET, &[]);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.keys().is_empty());
    }
}
