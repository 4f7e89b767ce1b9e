//! Console line classification.
//!
//! Maps one line of the game server's free-text output to the lifecycle
//! events it implies. Pure and deterministic; it never fails, so partial
//! lines from a byte stream are harmless.
//!
//! The patterns follow Paper/Spigot 1.20 output:
//!
//! ```text
//! [12:00:01 INFO]: Done (4.213s)! For help, type "help"
//! [12:03:44 INFO]: Steve joined the game
//! [12:09:10 INFO]: .BedrockAlex left the game
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::events::LifecycleEvent;
use crate::settings::DEFAULT_READY_MARKERS;

/// Player name token right before the join/leave phrase.
///
/// Covers Java names (`\w`) and Floodgate-prefixed Bedrock names (`.`, `*`).
/// The name must open the message (line start or right after the `]: `
/// log prefix) and the phrase must end it, so chat cannot forge roster events.
static JOINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\]: )([\w.*-]+) joined the game$").expect("valid regex")
});
static LEFT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\]: )([\w.*-]+) left the game$").expect("valid regex")
});

static DEFAULT_CLASSIFIER: LazyLock<LogClassifier> = LazyLock::new(LogClassifier::default);

/// Classify a line with the default ready markers.
pub fn classify(line: &str) -> Vec<LifecycleEvent> {
    DEFAULT_CLASSIFIER.classify(line)
}

/// Line classifier with configurable ready markers.
#[derive(Debug, Clone)]
pub struct LogClassifier {
    ready_markers: Vec<String>,
}

impl Default for LogClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_READY_MARKERS.iter().map(ToString::to_string))
    }
}

impl LogClassifier {
    /// Create a classifier that treats any of `ready_markers` as "server ready".
    pub fn new(ready_markers: impl IntoIterator<Item = String>) -> Self {
        Self {
            ready_markers: ready_markers
                .into_iter()
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Substrings that signal startup completion.
    pub fn ready_markers(&self) -> &[String] {
        &self.ready_markers
    }

    /// Classify a single output line.
    ///
    /// Returns the semantic events the line implies, or a single
    /// [`LifecycleEvent::LogLine`] passthrough when it implies none.
    pub fn classify(&self, line: &str) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();

        if self.ready_markers.iter().any(|m| line.contains(m.as_str())) {
            events.push(LifecycleEvent::ServerReady);
        }

        if let Some(name) = capture_name(&JOINED, line) {
            events.push(LifecycleEvent::PlayerJoined(name));
        } else if let Some(name) = capture_name(&LEFT, line) {
            events.push(LifecycleEvent::PlayerLeft(name));
        }

        if events.is_empty() {
            events.push(LifecycleEvent::LogLine(line.to_string()));
        }
        events
    }
}

fn capture_name(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
