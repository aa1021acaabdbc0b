//! Command registry: labels, aliases and metadata.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::metadata::CommandMetadata;
use super::traits::CommandHandler;

/// A handler together with the metadata it was registered with.
#[derive(Clone)]
pub struct CommandEntry {
    pub handler: Arc<dyn CommandHandler>,
    pub metadata: Arc<CommandMetadata>,
}

/// The three lookup tables. Always mutated together under one write lock.
#[derive(Default)]
struct Tables {
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    aliases: HashMap<String, Arc<dyn CommandHandler>>,
    /// Keyed by label and by every alias.
    metadata: HashMap<String, Arc<CommandMetadata>>,
}

impl Tables {
    /// Drop an alias, but only while it still points at `owner`.
    fn remove_alias(&mut self, alias: &str, owner: &Arc<dyn CommandHandler>) {
        let owned = self
            .aliases
            .get(alias)
            .is_some_and(|handler| same_handler(handler, owner));
        if owned {
            self.aliases.remove(alias);
            if !self.commands.contains_key(alias) {
                self.metadata.remove(alias);
            }
        }
    }
}

/// Registry of all available commands.
///
/// Safe to share between sessions: lookups take a read lock, registration
/// takes the write lock, so a lookup never sees a label without its aliases
/// or metadata.
#[derive(Default)]
pub struct CommandRegistry {
    tables: RwLock<Tables>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every handler of a table under its own label.
    pub fn register_all<I>(&self, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn CommandHandler>>,
    {
        for handler in handlers {
            let label = handler.metadata().label.clone();
            self.register(&label, handler);
        }
        info!(count = self.len(), "Command registry initialized");
    }

    /// Register a command under `label`, replacing any previous registration.
    ///
    /// Aliases of the replaced command that the new one does not declare are
    /// dropped. An alias that collides with another command's label is
    /// skipped, and an existing alias named `label` is taken over.
    pub fn register(&self, label: &str, handler: Arc<dyn CommandHandler>) {
        let metadata = Arc::new(handler.metadata().clone());
        let mut tables = self.write();

        if let Some(previous) = tables.commands.get(label).cloned() {
            debug!(command = label, "Replacing registered command");
            if let Some(old) = tables.metadata.get(label).cloned() {
                for alias in old.aliases.difference(&metadata.aliases) {
                    tables.remove_alias(alias, &previous);
                }
            }
        } else {
            debug!(command = label, "Registering command");
        }

        // Labels win over aliases, including aliases registered earlier.
        if tables.aliases.remove(label).is_some() {
            let owner = tables.metadata.get(label).map(|m| m.label.clone());
            if owner.as_deref() != Some(label) {
                warn!(
                    command = label,
                    owner = ?owner,
                    "Label shadows an alias of another command, dropping alias"
                );
            }
        }

        tables.commands.insert(label.to_string(), Arc::clone(&handler));
        tables.metadata.insert(label.to_string(), Arc::clone(&metadata));

        for alias in &metadata.aliases {
            if alias != label && tables.commands.contains_key(alias) {
                warn!(
                    command = label,
                    alias = %alias,
                    "Alias shadows another command label, skipping"
                );
                continue;
            }
            tables.aliases.insert(alias.clone(), Arc::clone(&handler));
            tables.metadata.insert(alias.clone(), Arc::clone(&metadata));
        }
    }

    /// Remove a command and all of its aliases. Returns whether it existed.
    pub fn unregister(&self, label: &str) -> bool {
        let mut tables = self.write();

        let Some(handler) = tables.commands.remove(label) else {
            return false;
        };
        if let Some(metadata) = tables.metadata.remove(label) {
            for alias in &metadata.aliases {
                tables.remove_alias(alias, &handler);
            }
        }

        debug!(command = label, "Unregistered command");
        true
    }

    /// Get a handler by label, falling back to aliases.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        let tables = self.read();
        tables
            .commands
            .get(name)
            .or_else(|| tables.aliases.get(name))
            .cloned()
    }

    /// Get a handler and its metadata from one consistent snapshot.
    pub fn lookup_entry(&self, name: &str) -> Option<CommandEntry> {
        let tables = self.read();
        let handler = tables
            .commands
            .get(name)
            .or_else(|| tables.aliases.get(name))?;
        let metadata = tables.metadata.get(name)?;
        Some(CommandEntry {
            handler: Arc::clone(handler),
            metadata: Arc::clone(metadata),
        })
    }

    /// Get the metadata registered under a label or alias.
    pub fn metadata(&self, name: &str) -> Option<Arc<CommandMetadata>> {
        self.read().metadata.get(name).cloned()
    }

    /// Snapshot of the metadata of every registered label.
    pub fn list_metadata(&self) -> Vec<Arc<CommandMetadata>> {
        let tables = self.read();
        tables
            .commands
            .keys()
            .filter_map(|label| tables.metadata.get(label).cloned())
            .collect()
    }

    /// Snapshot of every registered handler (one per label).
    pub fn list_handlers(&self) -> Vec<Arc<dyn CommandHandler>> {
        self.read().commands.values().cloned().collect()
    }

    /// List all registered labels.
    pub fn labels(&self) -> Vec<String> {
        self.read().commands.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn same_handler(a: &Arc<dyn CommandHandler>, b: &Arc<dyn CommandHandler>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::CommandContext;
    use crate::error::CommandError;
    use std::thread;

    struct Stub {
        meta: CommandMetadata,
    }

    impl CommandHandler for Stub {
        fn metadata(&self) -> &CommandMetadata {
            &self.meta
        }

        fn execute(&self, _ctx: &CommandContext, _args: Vec<String>) -> Result<(), CommandError> {
            Ok(())
        }
    }

    fn stub(meta: CommandMetadata) -> Arc<dyn CommandHandler> {
        Arc::new(Stub { meta })
    }

    #[test]
    fn test_alias_resolves_to_label() {
        let registry = CommandRegistry::new();
        let handler = stub(CommandMetadata::new("give").aliases(["g", "item"]));
        registry.register("give", Arc::clone(&handler));

        for name in ["give", "g", "item"] {
            let entry = registry.lookup_entry(name).unwrap();
            assert!(same_handler(&entry.handler, &handler));
            assert_eq!(entry.metadata.label, "give");
        }
        assert_eq!(registry.metadata("g"), registry.metadata("give"));
        assert!(registry.lookup("nonexistent").is_none());
    }

    #[test]
    fn test_unregister_removes_aliases() {
        let registry = CommandRegistry::new();
        registry.register("give", stub(CommandMetadata::new("give").aliases(["g", "item"])));

        assert!(registry.unregister("give"));
        assert!(registry.lookup("give").is_none());
        assert!(registry.lookup("g").is_none());
        assert!(registry.lookup("item").is_none());
        assert!(registry.metadata("g").is_none());
        assert!(registry.is_empty());

        // Unknown label is a no-op
        assert!(!registry.unregister("give"));
    }

    #[test]
    fn test_register_overwrites_and_drops_stale_aliases() {
        let registry = CommandRegistry::new();
        registry.register("give", stub(CommandMetadata::new("give").aliases(["g", "item"])));

        let replacement = stub(CommandMetadata::new("give").alias("g").permission("player.give"));
        registry.register("give", Arc::clone(&replacement));

        assert_eq!(registry.len(), 1);
        assert!(same_handler(&registry.lookup("g").unwrap(), &replacement));
        assert_eq!(registry.metadata("g").unwrap().permission, "player.give");
        assert!(registry.lookup("item").is_none());
    }

    #[test]
    fn test_alias_colliding_with_label_is_skipped() {
        let registry = CommandRegistry::new();
        let kick = stub(CommandMetadata::new("kick"));
        registry.register("kick", Arc::clone(&kick));
        registry.register("ban", stub(CommandMetadata::new("ban").alias("kick")));

        assert!(same_handler(&registry.lookup("kick").unwrap(), &kick));
        assert_eq!(registry.metadata("kick").unwrap().label, "kick");
    }

    #[test]
    fn test_label_registered_over_alias_takes_the_name() {
        let registry = CommandRegistry::new();
        let give = stub(CommandMetadata::new("give").alias("g"));
        registry.register("give", Arc::clone(&give));
        registry.register("g", stub(CommandMetadata::new("g")));
        assert_eq!(registry.metadata("g").unwrap().label, "g");

        registry.unregister("g");
        for name in ["g", "give"] {
            assert_eq!(
                registry.lookup(name).is_some(),
                registry.lookup_entry(name).is_some(),
                "lookup and lookup_entry disagree on {}",
                name
            );
        }
        assert!(registry.lookup("g").is_none());
        assert!(registry.metadata("g").is_none());
        assert!(same_handler(&registry.lookup("give").unwrap(), &give));

        // Re-registering the owner restores the alias.
        registry.register("give", give);
        assert_eq!(registry.lookup_entry("g").unwrap().metadata.label, "give");
    }

    #[test]
    fn test_unregister_keeps_alias_taken_over_by_other_command() {
        let registry = CommandRegistry::new();
        registry.register("give", stub(CommandMetadata::new("give").alias("g")));
        let grant = stub(CommandMetadata::new("grant").alias("g"));
        registry.register("grant", Arc::clone(&grant));

        registry.unregister("give");
        assert!(same_handler(&registry.lookup("g").unwrap(), &grant));
        assert_eq!(registry.metadata("g").unwrap().label, "grant");
    }

    #[test]
    fn test_list_snapshots() {
        let registry = CommandRegistry::new();
        registry.register_all(vec![
            stub(CommandMetadata::new("help").alias("h")),
            stub(CommandMetadata::new("kick")),
        ]);

        let mut labels: Vec<String> = registry
            .list_metadata()
            .iter()
            .map(|m| m.label.clone())
            .collect();
        labels.sort();
        assert_eq!(labels, vec!["help".to_string(), "kick".to_string()]);
        assert_eq!(registry.list_handlers().len(), 2);

        // Snapshots are detached from later mutation
        let snapshot = registry.list_metadata();
        registry.unregister("kick");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.labels(), vec!["help".to_string()]);
    }

    #[test]
    fn test_lookup_consistent_during_reload() {
        let registry = Arc::new(CommandRegistry::new());
        registry.register("warp", stub(CommandMetadata::new("warp").alias("w")));

        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..500 {
                    registry.unregister("warp");
                    registry.register("warp", stub(CommandMetadata::new("warp").alias("w")));
                }
            })
        };

        for _ in 0..2000 {
            if let Some(entry) = registry.lookup_entry("w") {
                assert_eq!(entry.metadata.label, "warp");
                assert_eq!(entry.handler.metadata(), entry.metadata.as_ref());
                assert!(entry.metadata.aliases.contains("w"));
            }
        }
        writer.join().unwrap();
        assert!(registry.lookup("w").is_some());
    }
}
