//! Reports a player's online status.

use crate::commands::metadata::{CommandMetadata, TargetRequirement};
use crate::commands::traits::CommandHandler;
use crate::commands::types::CommandContext;
use crate::error::CommandError;
use crate::feedback::keys;

pub struct StatusCommand {
    meta: CommandMetadata,
}

impl StatusCommand {
    pub fn new() -> Self {
        Self {
            meta: CommandMetadata::new("status")
                .alias("st")
                .permission("player.status")
                .targeted(true)
                .requires(TargetRequirement::Any),
        }
    }
}

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for StatusCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    fn execute(&self, ctx: &CommandContext, _args: Vec<String>) -> Result<(), CommandError> {
        let target = ctx
            .target
            .as_ref()
            .ok_or_else(|| CommandError::execution("status requires a target"))?;

        let state = if target.is_online() { "online" } else { "offline" };
        ctx.reply(
            keys::STATUS_REPORT,
            &[
                target.uid().to_string(),
                target.account_id().to_string(),
                state.to_string(),
            ],
        );
        Ok(())
    }
}
