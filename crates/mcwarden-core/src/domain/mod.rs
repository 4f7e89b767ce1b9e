//! Domain types shared by the runtime and the control plane.

mod access;
mod launch;

pub use access::{
    BanEntry, DEFAULT_BAN_REASON, DEFAULT_OP_LEVEL, OperatorEntry, validate_player_name,
    validate_single_line,
};
pub use launch::{LaunchSpec, SERVER_JAR, java_from_home};
