//! Lists registered commands.

use std::sync::Weak;

use crate::commands::metadata::CommandMetadata;
use crate::commands::registry::CommandRegistry;
use crate::commands::traits::CommandHandler;
use crate::commands::types::CommandContext;
use crate::error::CommandError;
use crate::feedback::keys;

/// `help [label]` sends one entry per command, sorted by label.
pub struct HelpCommand {
    meta: CommandMetadata,
    // Weak: the registry owns this handler.
    registry: Weak<CommandRegistry>,
}

impl HelpCommand {
    pub fn new(registry: Weak<CommandRegistry>) -> Self {
        Self {
            meta: CommandMetadata::new("help").aliases(["h", "?"]),
            registry,
        }
    }
}

impl CommandHandler for HelpCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    fn execute(&self, ctx: &CommandContext, args: Vec<String>) -> Result<(), CommandError> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| CommandError::execution("command registry dropped"))?;

        let mut entries = match args.first() {
            Some(name) => match registry.metadata(name) {
                Some(meta) => vec![meta],
                None => {
                    ctx.reply(keys::UNKNOWN_COMMAND, &[name.clone()]);
                    return Ok(());
                }
            },
            None => registry.list_metadata(),
        };
        entries.sort_by(|a, b| a.label.cmp(&b.label));

        for meta in entries {
            let aliases: Vec<&str> = meta.aliases.iter().map(String::as_str).collect();
            ctx.reply(
                keys::HELP_ENTRY,
                &[
                    meta.label.clone(),
                    aliases.join(","),
                    meta.permission.clone(),
                    format!("{:?}", meta.target_requirement).to_lowercase(),
                ],
            );
        }
        Ok(())
    }
}
