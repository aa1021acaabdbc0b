//! Built-in commands.
//!
//! The table below is the complete set of commands registered at startup.
//!
//! ## Adding a New Command
//!
//! 1. Create a new file in this directory
//! 2. Implement the `CommandHandler` trait, building its `CommandMetadata`
//! 3. Add it to `builtin_commands()`

mod help;
mod kick;
mod purge;
mod status;

use std::sync::Arc;

use crate::entity::PlayerDirectory;

use super::registry::CommandRegistry;
use super::traits::CommandHandler;

pub use help::HelpCommand;
pub use kick::KickCommand;
pub use purge::PurgeCommand;
pub use status::StatusCommand;

/// Build the static command table.
pub fn builtin_commands(
    registry: &Arc<CommandRegistry>,
    directory: &Arc<PlayerDirectory>,
) -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(HelpCommand::new(Arc::downgrade(registry))),
        Arc::new(StatusCommand::new()),
        Arc::new(KickCommand::new()),
        Arc::new(PurgeCommand::new(Arc::clone(directory))),
    ]
}

#[cfg(test)]
mod test_support {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::commands::CommandContext;
    use crate::entity::Player;
    use crate::feedback::MemoryFeedback;

    pub fn context(
        label: &str,
        target: Option<Arc<Player>>,
        feedback: Arc<MemoryFeedback>,
    ) -> CommandContext {
        CommandContext::new(Uuid::new_v4(), label.to_string(), None, target, feedback)
    }
}
