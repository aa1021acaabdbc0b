//! Target resolution.
//!
//! Precedence, highest first:
//!
//! 1. `@<uid>` as the label, or the `target [@]<uid>` pseudo-command, which
//!    only set or clear the remembered target and never dispatch
//! 2. the first inline `@<uid>` argument
//! 3. the target supplied by the caller
//! 4. the invoker's remembered target, re-resolved on every use
//! 5. the invoker itself

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::entity::{EntityDirectory, InvokerId, Player, Uid};
use crate::error::{CommandError, InputErrorKind};

/// Label of the target-management pseudo-command.
pub const TARGET_LABEL: &str = "target";

/// Per-invoker sticky default targets.
///
/// Entries live until cleared with `target` or dropped with [`forget`];
/// nothing expires them.
///
/// [`forget`]: RememberedTargets::forget
#[derive(Debug, Default)]
pub struct RememberedTargets {
    entries: Mutex<HashMap<InvokerId, Uid>>,
}

impl RememberedTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, invoker: &InvokerId) -> Option<Uid> {
        self.lock().get(invoker).copied()
    }

    pub fn remember(&self, invoker: InvokerId, uid: Uid) {
        self.lock().insert(invoker, uid);
    }

    /// Drop the entry for `invoker`, returning the uid it held.
    pub fn forget(&self, invoker: &InvokerId) -> Option<Uid> {
        self.lock().remove(invoker)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<InvokerId, Uid>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A label-level request to change the remembered target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDirective {
    Clear,
    /// Unparsed uid string, `@` already stripped.
    Set(String),
}

impl TargetDirective {
    /// Recognize `@<uid>` labels and the `target` pseudo-command.
    ///
    /// Returns `None` for ordinary command labels.
    pub fn parse(label: &str, args: &[String]) -> Option<Self> {
        let raw = if let Some(rest) = label.strip_prefix('@') {
            rest
        } else if label.eq_ignore_ascii_case(TARGET_LABEL) {
            match args.first() {
                Some(arg) => arg.strip_prefix('@').unwrap_or(arg),
                None => "",
            }
        } else {
            return None;
        };

        Some(if raw.is_empty() {
            Self::Clear
        } else {
            Self::Set(raw.to_string())
        })
    }
}

/// Result of applying a [`TargetDirective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChange {
    Cleared,
    Set { uid: Uid, online: bool },
}

/// Resolves targets against the entity directory and remembered state.
pub struct TargetResolver<'a> {
    directory: &'a dyn EntityDirectory,
    remembered: &'a RememberedTargets,
}

impl<'a> TargetResolver<'a> {
    pub fn new(directory: &'a dyn EntityDirectory, remembered: &'a RememberedTargets) -> Self {
        Self {
            directory,
            remembered,
        }
    }

    /// Apply a label-level directive for `invoker`.
    pub fn apply(
        &self,
        invoker: &InvokerId,
        directive: &TargetDirective,
    ) -> Result<TargetChange, CommandError> {
        match directive {
            TargetDirective::Clear => {
                let previous = self.remembered.forget(invoker);
                debug!(invoker = %invoker, previous = ?previous, "Remembered target cleared");
                Ok(TargetChange::Cleared)
            }
            TargetDirective::Set(raw) => {
                let uid = parse_uid(raw)?;
                let player = self.find(uid)?;
                self.remembered.remember(invoker.clone(), uid);
                debug!(invoker = %invoker, uid, "Remembered target set");
                Ok(TargetChange::Set {
                    uid,
                    online: player.is_online(),
                })
            }
        }
    }

    /// Resolve the effective target of a dispatch.
    ///
    /// Removes the first inline `@<uid>` token from `args`.
    pub fn resolve(
        &self,
        invoker: Option<&Arc<Player>>,
        invoker_id: &InvokerId,
        supplied: Option<Arc<Player>>,
        args: &mut Vec<String>,
    ) -> Result<Option<Arc<Player>>, CommandError> {
        if let Some(pos) = args.iter().position(|arg| arg.starts_with('@')) {
            let token = args.remove(pos);
            let uid = parse_uid(&token[1..])?;
            return self.find(uid).map(Some);
        }

        if supplied.is_some() {
            return Ok(supplied);
        }

        // Re-resolved every time: the player may have gone away since.
        if let Some(uid) = self.remembered.get(invoker_id) {
            return self.find(uid).map(Some);
        }

        Ok(invoker.cloned())
    }

    fn find(&self, uid: Uid) -> Result<Arc<Player>, CommandError> {
        self.directory
            .find_by_uid(uid, true)
            .ok_or_else(|| CommandError::input(InputErrorKind::TargetNotFound { uid }))
    }
}

fn parse_uid(raw: &str) -> Result<Uid, CommandError> {
    raw.parse::<Uid>().map_err(|_| {
        CommandError::input(InputErrorKind::InvalidUid {
            input: raw.to_string(),
        })
    })
}
