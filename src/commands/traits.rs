//! Command handler trait definition.

use crate::error::CommandError;

use super::metadata::CommandMetadata;
use super::types::CommandContext;

/// Core trait for all registered commands.
///
/// # Example
///
/// ```ignore
/// pub struct PingCommand {
///     meta: CommandMetadata,
/// }
///
/// impl CommandHandler for PingCommand {
///     fn metadata(&self) -> &CommandMetadata {
///         &self.meta
///     }
///
///     fn execute(&self, ctx: &CommandContext, _args: Vec<String>) -> Result<(), CommandError> {
///         ctx.reply("commands.ping.pong", &[]);
///         Ok(())
///     }
/// }
/// ```
pub trait CommandHandler: Send + Sync {
    /// Descriptor read by the registry at registration time.
    fn metadata(&self) -> &CommandMetadata;

    /// Execute the command.
    ///
    /// `args` are the tokens left after the label and any inline `@uid`.
    /// Errors are logged by the dispatcher and not reported to the invoker;
    /// handlers that want to tell the invoker something use `ctx.reply`.
    ///
    /// Note: Concurrent commands are called from a blocking worker thread.
    fn execute(&self, ctx: &CommandContext, args: Vec<String>) -> Result<(), CommandError>;
}
