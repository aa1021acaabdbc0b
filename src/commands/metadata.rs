//! Command metadata attached to every handler.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::Player;
use crate::error::{CommandError, RequirementErrorKind};

/// Constraint a command places on its resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetRequirement {
    /// No constraint; the target may be absent.
    #[default]
    None,
    /// A target must be present.
    Any,
    /// A target must be present and online.
    Online,
    /// A target must be present and offline.
    Offline,
}

impl TargetRequirement {
    /// Check a resolved target against this requirement.
    pub fn check(self, target: Option<&Player>) -> Result<(), CommandError> {
        let kind = match (self, target) {
            (Self::None, _) => return Ok(()),
            (_, None) => RequirementErrorKind::TargetRequired,
            (Self::Online, Some(t)) if !t.is_online() => RequirementErrorKind::TargetMustBeOnline,
            (Self::Offline, Some(t)) if t.is_online() => RequirementErrorKind::TargetMustBeOffline,
            _ => return Ok(()),
        };
        Err(CommandError::requirement(kind))
    }
}

/// How the dispatcher runs a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Run on the invoking thread; `invoke` returns after the handler.
    #[default]
    Inline,
    /// Run on an independent task; `invoke` does not wait for it.
    Concurrent,
}

/// Immutable descriptor of a command.
///
/// Built once per handler with the builder methods below:
///
/// ```
/// use command_map::commands::{CommandMetadata, ExecutionMode, TargetRequirement};
///
/// let meta = CommandMetadata::new("kick")
///     .alias("k")
///     .permission("server.kick")
///     .targeted(true)
///     .requires(TargetRequirement::Online)
///     .execution(ExecutionMode::Inline);
/// assert!(meta.aliases.contains("k"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandMetadata {
    pub label: String,
    pub aliases: BTreeSet<String>,
    /// Permission node; empty means no permission is needed.
    pub permission: String,
    /// Whether the permission check also considers the target.
    pub permission_targeted: bool,
    pub target_requirement: TargetRequirement,
    pub execution: ExecutionMode,
}

impl CommandMetadata {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            aliases: BTreeSet::new(),
            permission: String::new(),
            permission_targeted: false,
            target_requirement: TargetRequirement::None,
            execution: ExecutionMode::Inline,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn permission(mut self, node: impl Into<String>) -> Self {
        self.permission = node.into();
        self
    }

    pub fn targeted(mut self, targeted: bool) -> Self {
        self.permission_targeted = targeted;
        self
    }

    pub fn requires(mut self, requirement: TargetRequirement) -> Self {
        self.target_requirement = requirement;
        self
    }

    pub fn execution(mut self, mode: ExecutionMode) -> Self {
        self.execution = mode;
        self
    }
}
