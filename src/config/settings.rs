//! Configuration settings for the command map.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::entity::Uid;
use crate::error::CommandError;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub permissions: PermissionsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Operator console configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Prompt printed before reading each console line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

/// Command table configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandsConfig {
    /// Labels removed from the registry after the built-in table is loaded.
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// Permission grants.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionsConfig {
    /// Whether the console skips permission checks.
    #[serde(default = "default_console_bypass")]
    pub console_bypass: bool,
    /// Account id -> granted node patterns.
    #[serde(default)]
    pub grants: HashMap<String, Vec<String>>,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Whether audit logging is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Path to the audit log file.
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,
}

/// Players preloaded into the in-memory directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub players: Vec<PlayerSeed>,
}

/// A single directory seed entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSeed {
    pub uid: Uid,
    pub account_id: String,
    #[serde(default)]
    pub online: bool,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_console_bypass() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("logs/commands.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            console_bypass: default_console_bypass(),
            grants: HashMap::new(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CommandError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CommandError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        Self::parse(&content).map_err(|e| match e {
            CommandError::Config { message } => CommandError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse and validate settings from TOML content.
    pub fn parse(content: &str) -> Result<Self, CommandError> {
        let settings: Settings = toml::from_str(content).map_err(|e| CommandError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), CommandError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(CommandError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(CommandError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.commands.disabled.iter().any(|l| l.trim().is_empty()) {
            return Err(CommandError::Config {
                message: "Disabled command labels must not be empty".to_string(),
            });
        }

        for (account, patterns) in &self.permissions.grants {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(CommandError::Config {
                    message: format!("Empty permission pattern granted to '{}'", account),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "pretty");
        assert!(default_console_bypass());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.console.prompt, "> ");
        assert!(settings.permissions.console_bypass);
        assert!(!settings.audit.enabled);
        assert!(settings.directory.players.is_empty());
    }

    #[test]
    fn test_full_document() {
        let settings = Settings::parse(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [commands]
            disabled = ["purge"]

            [permissions]
            console_bypass = false
            [permissions.grants]
            "acct-1" = ["*"]

            [[directory.players]]
            uid = 10001
            account_id = "acct-1"
            online = true

            [[directory.players]]
            uid = 10002
            account_id = "acct-2"
            "#,
        )
        .unwrap();

        assert_eq!(settings.logging.format, "json");
        assert_eq!(settings.commands.disabled, vec!["purge".to_string()]);
        assert!(!settings.permissions.console_bypass);
        assert_eq!(settings.permissions.grants["acct-1"], vec!["*".to_string()]);
        assert_eq!(settings.directory.players.len(), 2);
        assert!(!settings.directory.players[1].online);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let result = Settings::parse("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(CommandError::Config { .. })));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let result = Settings::parse("[permissions.grants]\n\"acct\" = [\" \"]\n");
        assert!(matches!(result, Err(CommandError::Config { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[console]\nprompt = \"$ \"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.console.prompt, "$ ");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load("/nonexistent/command-map.toml");
        assert!(matches!(result, Err(CommandError::Config { .. })));
    }
}
