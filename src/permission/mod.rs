//! Permission gate.
//!
//! The dispatcher only asks a [`PermissionPolicy`] for a yes/no answer;
//! any messaging on denial is the policy's own business.

mod grants;
mod policy;

pub use grants::GrantTable;
pub use policy::{AllowAll, PermissionPolicy};
