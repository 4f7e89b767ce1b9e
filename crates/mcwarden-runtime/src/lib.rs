//! Process runtime for mcwarden.
//!
//! Everything that touches the operating system lives here: spawning and
//! supervising the game server, signals, pidfiles, the list files and
//! downloads. The control plane only talks to [`ServerManager`].

pub mod manager;
pub mod pidfile;
pub mod process;
pub mod provision;
pub mod store;

pub use manager::ServerManager;
pub use process::{
    CommandLauncher, EventBus, Phase, ProcessLauncher, ServerSupervisor, Subscription,
};
pub use provision::{HttpFetcher, PluginArtifact, ServerLayout};
pub use store::{JsonListStore, ban_store, operator_store};
