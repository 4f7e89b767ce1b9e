#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod classifier;
pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod settings;
pub mod state;

// Re-export commonly used types for convenience
pub use classifier::{LogClassifier, classify};
pub use domain::{
    BanEntry, DEFAULT_BAN_REASON, DEFAULT_OP_LEVEL, LaunchSpec, OperatorEntry, SERVER_JAR,
    java_from_home, validate_player_name, validate_single_line,
};
pub use error::SupervisorError;
pub use events::{LifecycleEvent, LogMessage, PlayerRef, ServerEvent};
pub use ports::{
    ArtifactFetcher, FetchError, ListStore, NoopProvisioner, ProvisionError, ServerProvisioner,
    StoreError,
};
pub use settings::{
    DEFAULT_BEDROCK_PORT, DEFAULT_GAME_PORT, DEFAULT_MAX_PLAYERS, ServerProperties,
    SupervisorConfig,
};
pub use state::{ServerState, StatusSnapshot};
