//! Error types for the command map.

use thiserror::Error;

use crate::entity::Uid;
use crate::feedback::keys;

/// Main error type for command registration and dispatch.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed or unresolvable user input.
    #[error("Input error: {kind}")]
    Input { kind: InputErrorKind },

    /// The resolved target does not satisfy the command's requirement.
    #[error("Requirement error: {kind}")]
    Requirement { kind: RequirementErrorKind },

    /// The permission policy refused the invocation.
    #[error("Permission denied for node '{node}'")]
    PermissionDenied { node: String },

    /// A handler failed while executing.
    #[error("Command execution failed: {message}")]
    Execution { message: String },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// User input error kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputErrorKind {
    #[error("Command not specified")]
    NotSpecified,

    #[error("Unknown command: {label}")]
    UnknownCommand { label: String },

    #[error("Invalid uid: '{input}'")]
    InvalidUid { input: String },

    #[error("Target {uid} not found")]
    TargetNotFound { uid: Uid },
}

/// Target requirement error kinds.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementErrorKind {
    #[error("Command requires a target")]
    TargetRequired,

    #[error("Command requires an online target")]
    TargetMustBeOnline,

    #[error("Command requires an offline target")]
    TargetMustBeOffline,
}

impl CommandError {
    /// Shorthand for an input error.
    pub fn input(kind: InputErrorKind) -> Self {
        Self::Input { kind }
    }

    /// Shorthand for a requirement error.
    pub fn requirement(kind: RequirementErrorKind) -> Self {
        Self::Requirement { kind }
    }

    /// Shorthand for a handler execution failure.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Feedback message key reported to the invoker, if any.
    ///
    /// Permission denials are silent here: the policy owns its messaging.
    pub fn feedback_key(&self) -> Option<&'static str> {
        match self {
            Self::Input { kind } => Some(match kind {
                InputErrorKind::NotSpecified => keys::NOT_SPECIFIED,
                InputErrorKind::UnknownCommand { .. } => keys::UNKNOWN_COMMAND,
                InputErrorKind::InvalidUid { .. } => keys::INVALID_UID,
                InputErrorKind::TargetNotFound { .. } => keys::TARGET_NOT_FOUND,
            }),
            Self::Requirement { kind } => Some(match kind {
                RequirementErrorKind::TargetRequired => keys::NEED_TARGET,
                RequirementErrorKind::TargetMustBeOnline => keys::NEED_TARGET_ONLINE,
                RequirementErrorKind::TargetMustBeOffline => keys::NEED_TARGET_OFFLINE,
            }),
            _ => None,
        }
    }

    /// Arguments substituted into the feedback message.
    pub fn feedback_args(&self) -> Vec<String> {
        match self {
            Self::Input {
                kind: InputErrorKind::UnknownCommand { label },
            } => vec![label.clone()],
            _ => Vec::new(),
        }
    }
}

/// Result type alias for command map operations.
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_carries_label() {
        let err = CommandError::input(InputErrorKind::UnknownCommand {
            label: "warp".to_string(),
        });
        assert_eq!(err.feedback_key(), Some(keys::UNKNOWN_COMMAND));
        assert_eq!(err.feedback_args(), vec!["warp".to_string()]);
    }

    #[test]
    fn test_permission_denied_is_silent() {
        let err = CommandError::PermissionDenied {
            node: "server.kick".to_string(),
        };
        assert!(err.feedback_key().is_none());
        assert!(err.feedback_args().is_empty());
    }

    #[test]
    fn test_requirement_keys() {
        let err = CommandError::requirement(RequirementErrorKind::TargetMustBeOffline);
        assert_eq!(err.feedback_key(), Some(keys::NEED_TARGET_OFFLINE));
        assert_eq!(err.to_string(), "Requirement error: Command requires an offline target");
    }
}
