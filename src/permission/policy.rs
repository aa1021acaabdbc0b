//! Permission policy trait.

use crate::entity::Player;

/// Decides whether an invoker may run a command against a target.
///
/// `targeted` tells the policy whether the permission node is scoped to the
/// target as well as the invoker. `invoker` is `None` for the console.
pub trait PermissionPolicy: Send + Sync {
    fn check_permission(
        &self,
        invoker: Option<&Player>,
        target: Option<&Player>,
        node: &str,
        targeted: bool,
    ) -> bool;
}

/// Policy that allows everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl PermissionPolicy for AllowAll {
    fn check_permission(
        &self,
        _invoker: Option<&Player>,
        _target: Option<&Player>,
        _node: &str,
        _targeted: bool,
    ) -> bool {
        true
    }
}
