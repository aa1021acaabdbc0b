//! Message keys emitted by the dispatcher and the built-in commands.

pub const NOT_SPECIFIED: &str = "commands.generic.not_specified";
pub const UNKNOWN_COMMAND: &str = "commands.generic.unknown_command";
pub const INVALID_UID: &str = "commands.generic.invalid.uid";
pub const PERMISSION_ERROR: &str = "commands.generic.permission_error";

pub const TARGET_NOT_FOUND: &str = "commands.execution.player_exist_error";
pub const CLEAR_TARGET: &str = "commands.execution.clear_target";
pub const SET_TARGET: &str = "commands.execution.set_target";
pub const SET_TARGET_ONLINE: &str = "commands.execution.set_target_online";
pub const SET_TARGET_OFFLINE: &str = "commands.execution.set_target_offline";
pub const NEED_TARGET: &str = "commands.execution.need_target";
pub const NEED_TARGET_ONLINE: &str = "commands.execution.need_target_online";
pub const NEED_TARGET_OFFLINE: &str = "commands.execution.need_target_offline";

pub const HELP_ENTRY: &str = "commands.help.entry";
pub const STATUS_REPORT: &str = "commands.status.report";
pub const KICK_SUCCESS: &str = "commands.kick.success";
pub const PURGE_SUCCESS: &str = "commands.purge.success";
