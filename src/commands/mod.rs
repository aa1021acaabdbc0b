//! Command registry, target resolution and dispatch.
//!
//! Raw input flows through [`Dispatcher::invoke`]: the label is split off,
//! `@uid`/`target` directives are handled, the handler is looked up in the
//! [`CommandRegistry`], the target is resolved, the permission policy and the
//! command's [`TargetRequirement`] are checked, and finally the handler runs
//! inline or on its own task depending on its [`ExecutionMode`].

mod dispatcher;
mod metadata;
mod registry;
mod target;
mod traits;
mod types;

pub mod builtin;

pub use dispatcher::{Dispatcher, InvocationOutcome};
pub use metadata::{CommandMetadata, ExecutionMode, TargetRequirement};
pub use registry::{CommandEntry, CommandRegistry};
pub use target::{RememberedTargets, TargetChange, TargetDirective, TargetResolver, TARGET_LABEL};
pub use traits::CommandHandler;
pub use types::CommandContext;
