//! Player references and invoker identity.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Numeric player identifier used by `@id` syntax.
pub type Uid = i32;

/// A player entity as seen by the command map.
///
/// The online flag is owned by the session layer and may flip between
/// invocations, which is why targets are re-checked on every dispatch.
#[derive(Debug)]
pub struct Player {
    uid: Uid,
    account_id: String,
    online: AtomicBool,
}

impl Player {
    /// Create a new player reference.
    pub fn new(uid: Uid, account_id: impl Into<String>, online: bool) -> Self {
        Self {
            uid,
            account_id: account_id.into(),
            online: AtomicBool::new(online),
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Update the online flag (called by the session layer).
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

/// Stable identity of the session issuing a command.
///
/// Keys the remembered-target map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvokerId {
    /// Operator console with no associated account.
    Console,
    /// A connected player, keyed by account id.
    Account(String),
}

impl InvokerId {
    /// Reserved rendering of the console identity.
    pub const CONSOLE: &'static str = "console";

    /// Derive the identity of an invoker (`None` is the console).
    pub fn of(invoker: Option<&Player>) -> Self {
        match invoker {
            Some(player) => Self::Account(player.account_id().to_string()),
            None => Self::Console,
        }
    }
}

impl fmt::Display for InvokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str(Self::CONSOLE),
            Self::Account(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_flag_toggles() {
        let player = Player::new(10001, "acct-1", true);
        assert!(player.is_online());
        player.set_online(false);
        assert!(!player.is_online());
    }

    #[test]
    fn test_invoker_identity() {
        let player = Player::new(10001, "acct-1", true);
        assert_eq!(InvokerId::of(None), InvokerId::Console);
        assert_eq!(
            InvokerId::of(Some(&player)),
            InvokerId::Account("acct-1".to_string())
        );
        assert_eq!(InvokerId::Console.to_string(), "console");
        assert_eq!(InvokerId::of(Some(&player)).to_string(), "acct-1");
    }
}
