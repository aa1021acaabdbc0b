//! Disconnects an online player.

use tracing::info;

use crate::commands::metadata::{CommandMetadata, TargetRequirement};
use crate::commands::traits::CommandHandler;
use crate::commands::types::CommandContext;
use crate::error::CommandError;
use crate::feedback::keys;

/// Marks the target offline. The session layer notices the flag and closes
/// the connection.
pub struct KickCommand {
    meta: CommandMetadata,
}

impl KickCommand {
    pub fn new() -> Self {
        Self {
            meta: CommandMetadata::new("kick")
                .permission("server.kick")
                .targeted(true)
                .requires(TargetRequirement::Online),
        }
    }
}

impl Default for KickCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for KickCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    fn execute(&self, ctx: &CommandContext, args: Vec<String>) -> Result<(), CommandError> {
        let target = ctx
            .target
            .as_ref()
            .ok_or_else(|| CommandError::execution("kick requires a target"))?;

        target.set_online(false);
        let reason = args.join(" ");
        info!(uid = target.uid(), by = %ctx.invoker_id(), reason = %reason, "Player kicked");

        ctx.reply(keys::KICK_SUCCESS, &[target.uid().to_string(), reason]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::builtin::test_support::context;
    use crate::entity::Player;
    use crate::feedback::MemoryFeedback;
    use std::sync::Arc;

    #[test]
    fn test_kick_marks_offline() {
        let cmd = KickCommand::new();
        let feedback = Arc::new(MemoryFeedback::new());
        let target = Arc::new(Player::new(7, "acct-7", true));

        cmd.execute(
            &context("kick", Some(Arc::clone(&target)), feedback.clone()),
            vec!["spamming".to_string(), "chat".to_string()],
        )
        .unwrap();

        assert!(!target.is_online());
        assert_eq!(feedback.messages()[0].args, vec!["7", "spamming chat"]);
    }

    #[test]
    fn test_kick_without_target_fails() {
        let cmd = KickCommand::new();
        let feedback = Arc::new(MemoryFeedback::new());
        let result = cmd.execute(&context("kick", None, feedback), Vec::new());
        assert!(result.is_err());
    }
}
