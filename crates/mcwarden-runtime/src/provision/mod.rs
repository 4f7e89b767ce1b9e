//! Server directory provisioning: jar and plugin downloads plus config files.

mod fetch;
mod layout;

pub use fetch::{HttpFetcher, MAX_REDIRECTS};
pub use layout::{PAPER_JAR_URL, PluginArtifact, ServerLayout, bedrock_bridge_plugins};
