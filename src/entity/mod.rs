//! Entity model used by the dispatcher.
//!
//! Only the minimal surface needed for target resolution lives here:
//! player identity, online status and lookup by uid.

mod directory;
mod player;

pub use directory::{EntityDirectory, PlayerDirectory};
pub use player::{InvokerId, Player, Uid};
