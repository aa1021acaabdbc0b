//! Config-driven permission grants.
//!
//! Grants map an account id to node patterns:
//!
//! - `*` matches every node
//! - `server.*` matches `server.kick`, `server.kick.others`, ...
//! - anything else matches exactly
//!
//! Targeting another player with a targeted node additionally requires
//! `<node>.others`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::PermissionsConfig;
use crate::entity::Player;
use crate::feedback::{keys, FeedbackSink};

use super::policy::PermissionPolicy;

/// Suffix required to act on another player with a targeted node.
const OTHERS_SUFFIX: &str = ".others";

/// Permission policy backed by per-account grant lists.
pub struct GrantTable {
    grants: HashMap<String, Vec<String>>,
    console_bypass: bool,
    feedback: Arc<dyn FeedbackSink>,
}

impl GrantTable {
    /// Build the grant table from configuration.
    pub fn from_config(config: &PermissionsConfig, feedback: Arc<dyn FeedbackSink>) -> Self {
        let grants = config
            .grants
            .iter()
            .map(|(account, patterns)| {
                let patterns = patterns.iter().map(|p| p.trim().to_string()).collect();
                (account.clone(), patterns)
            })
            .collect();

        Self {
            grants,
            console_bypass: config.console_bypass,
            feedback,
        }
    }

    /// Whether the account holds a grant covering `node`.
    pub fn has_permission(&self, account_id: &str, node: &str) -> bool {
        if node.is_empty() {
            return true;
        }
        self.grants
            .get(account_id)
            .map(|patterns| patterns.iter().any(|p| pattern_matches(p, node)))
            .unwrap_or(false)
    }

    fn deny(&self, invoker: Option<&Player>, node: &str) -> bool {
        debug!(
            account = invoker.map(|p| p.account_id()).unwrap_or("console"),
            node,
            "Permission denied"
        );
        self.feedback
            .send(invoker, keys::PERMISSION_ERROR, &[node.to_string()]);
        false
    }
}

impl PermissionPolicy for GrantTable {
    fn check_permission(
        &self,
        invoker: Option<&Player>,
        target: Option<&Player>,
        node: &str,
        targeted: bool,
    ) -> bool {
        let Some(player) = invoker else {
            return self.console_bypass || self.deny(None, node);
        };

        if !self.has_permission(player.account_id(), node) {
            return self.deny(invoker, node);
        }

        let acts_on_other = target.is_some_and(|t| t.uid() != player.uid());
        if targeted && acts_on_other && !node.is_empty() {
            let others = format!("{}{}", node, OTHERS_SUFFIX);
            if !self.has_permission(player.account_id(), &others) {
                return self.deny(invoker, &others);
            }
        }

        true
    }
}

fn pattern_matches(pattern: &str, node: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_suffix(".*") {
        Some(prefix) => node
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.')),
        None => pattern == node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::MemoryFeedback;

    fn table(console_bypass: bool) -> (GrantTable, Arc<MemoryFeedback>) {
        let mut grants = HashMap::new();
        grants.insert("admin".to_string(), vec!["*".to_string()]);
        grants.insert(
            "mod".to_string(),
            vec!["server.*".to_string(), "player.status".to_string()],
        );
        let config = PermissionsConfig {
            console_bypass,
            grants,
        };
        let feedback = Arc::new(MemoryFeedback::new());
        (GrantTable::from_config(&config, feedback.clone()), feedback)
    }

    #[test]
    fn test_pattern_matching() {
        assert!(pattern_matches("*", "anything"));
        assert!(pattern_matches("server.*", "server.kick"));
        assert!(pattern_matches("server.*", "server.kick.others"));
        assert!(!pattern_matches("server.*", "server"));
        assert!(!pattern_matches("server.*", "serverx.kick"));
        assert!(pattern_matches("player.status", "player.status"));
        assert!(!pattern_matches("player.status", "player.status.others"));
    }

    #[test]
    fn test_console_bypass() {
        let (allow, _) = table(true);
        assert!(allow.check_permission(None, None, "server.kick", true));

        let (deny, feedback) = table(false);
        assert!(!deny.check_permission(None, None, "server.kick", true));
        assert_eq!(feedback.keys(), vec![keys::PERMISSION_ERROR.to_string()]);
    }

    #[test]
    fn test_targeting_others_requires_others_node() {
        let (grants, feedback) = table(true);
        let moderator = Player::new(1, "mod", true);
        let other = Player::new(2, "someone", true);

        // Own target is fine with the base node.
        assert!(grants.check_permission(Some(&moderator), Some(&moderator), "player.status", true));
        // Another player needs player.status.others, which is not granted.
        assert!(!grants.check_permission(Some(&moderator), Some(&other), "player.status", true));
        // Untargeted nodes ignore the target.
        assert!(grants.check_permission(Some(&moderator), Some(&other), "player.status", false));
        // Wildcard grants cover the .others node.
        assert!(grants.check_permission(Some(&moderator), Some(&other), "server.kick", true));

        let messages = feedback.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].args, vec!["player.status.others".to_string()]);
    }

    #[test]
    fn test_unknown_account_and_empty_node() {
        let (grants, _) = table(true);
        let stranger = Player::new(3, "stranger", true);
        assert!(grants.check_permission(Some(&stranger), None, "", false));
        assert!(!grants.check_permission(Some(&stranger), None, "server.kick", false));
    }
}
