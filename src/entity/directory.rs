//! Player lookup by uid.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::player::{Player, Uid};

/// Resolves player references by uid.
///
/// A `None` result is an expected outcome (unknown uid, or an offline
/// player when `allow_offline` is false), not a fault.
pub trait EntityDirectory: Send + Sync {
    fn find_by_uid(&self, uid: Uid, allow_offline: bool) -> Option<Arc<Player>>;
}

/// In-memory player directory.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    players: RwLock<HashMap<Uid, Arc<Player>>>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a player, returning the shared reference.
    pub fn insert(&self, player: Player) -> Arc<Player> {
        let player = Arc::new(player);
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        debug!(uid = player.uid(), account = player.account_id(), "Player added to directory");
        players.insert(player.uid(), Arc::clone(&player));
        player
    }

    /// Remove a player. Returns the removed reference if it existed.
    pub fn remove(&self, uid: Uid) -> Option<Arc<Player>> {
        let mut players = self.players.write().unwrap_or_else(|e| e.into_inner());
        let removed = players.remove(&uid);
        if removed.is_some() {
            debug!(uid, "Player removed from directory");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.players.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityDirectory for PlayerDirectory {
    fn find_by_uid(&self, uid: Uid, allow_offline: bool) -> Option<Arc<Player>> {
        let players = self.players.read().unwrap_or_else(|e| e.into_inner());
        players
            .get(&uid)
            .filter(|player| allow_offline || player.is_online())
            .cloned()
    }
}
