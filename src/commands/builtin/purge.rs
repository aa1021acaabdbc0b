//! Removes an offline player from the directory.

use std::sync::Arc;

use tracing::info;

use crate::commands::metadata::{CommandMetadata, ExecutionMode, TargetRequirement};
use crate::commands::traits::CommandHandler;
use crate::commands::types::CommandContext;
use crate::entity::PlayerDirectory;
use crate::error::CommandError;
use crate::feedback::keys;

/// Runs concurrently: cleaning up a player's data can take a while.
pub struct PurgeCommand {
    meta: CommandMetadata,
    directory: Arc<PlayerDirectory>,
}

impl PurgeCommand {
    pub fn new(directory: Arc<PlayerDirectory>) -> Self {
        Self {
            meta: CommandMetadata::new("purge")
                .permission("server.purge")
                .targeted(true)
                .requires(TargetRequirement::Offline)
                .execution(ExecutionMode::Concurrent),
            directory,
        }
    }
}

impl CommandHandler for PurgeCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    fn execute(&self, ctx: &CommandContext, _args: Vec<String>) -> Result<(), CommandError> {
        let target = ctx
            .target
            .as_ref()
            .ok_or_else(|| CommandError::execution("purge requires a target"))?;

        if self.directory.remove(target.uid()).is_none() {
            return Err(CommandError::execution(format!(
                "player {} already removed",
                target.uid()
            )));
        }

        info!(uid = target.uid(), by = %ctx.invoker_id(), "Player purged");
        ctx.reply(keys::PURGE_SUCCESS, &[target.uid().to_string()]);
        Ok(())
    }
}
