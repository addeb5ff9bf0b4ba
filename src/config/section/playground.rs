//! `[playground]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [playground]
//! name = "Counter"            # Header label
//! live = true                 # Code panel visible at start
//! orientation = "h"           # "h" (side by side) or "v" (stacked)
//! debounce_ms = 100           # Quiet time before a rebuild
//! portal = "body"             # Fullscreen attach target
//! error_retention = "keep_renderable"
//! ```

use serde::{Deserialize, Serialize};

use crate::actor::debouncer::DEBOUNCE_MS;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::mount::DEFAULT_TARGET;
use crate::session::{ErrorRetention, Orientation};

/// Session presentation and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Header label.
    pub name: Option<String>,

    /// Initial code panel visibility.
    pub live: bool,

    pub orientation: Orientation,

    /// Debounce window in milliseconds.
    pub debounce_ms: u64,

    /// Fullscreen attach target. Empty string renders in place.
    pub portal: Option<String>,

    /// Extra class for the root element.
    pub class_name: Option<String>,

    /// Inline style for the root element.
    pub style: Option<String>,

    /// Whether a failed build keeps the previous render in its result.
    pub error_retention: ErrorRetention,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            name: None,
            live: true,
            orientation: Orientation::Horizontal,
            debounce_ms: DEBOUNCE_MS,
            portal: Some(DEFAULT_TARGET.to_string()),
            class_name: None,
            style: None,
            error_retention: ErrorRetention::default(),
        }
    }
}

impl PlaygroundConfig {
    /// Attach target, `None` when rendering in place.
    pub fn portal_target(&self) -> Option<&str> {
        self.portal.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.warn(
                FieldPath::new("playground.debounce_ms"),
                "0 rebuilds on every change (clamped to 1ms)",
            );
        }
        if self.debounce_ms > 60_000 {
            diag.error_with_hint(
                FieldPath::new("playground.debounce_ms"),
                format!("{}ms is longer than a minute", self.debounce_ms),
                "a few hundred milliseconds is usually enough",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::session::{ErrorRetention, Orientation};

    #[test]
    fn test_playground_defaults() {
        let config = test_parse_config("");
        assert!(config.playground.live);
        assert_eq!(config.playground.orientation, Orientation::Horizontal);
        assert_eq!(config.playground.debounce_ms, 100);
        assert_eq!(config.playground.portal_target(), Some("body"));
        assert_eq!(config.playground.error_retention, ErrorRetention::KeepRenderable);
    }

    #[test]
    fn test_playground_config() {
        let config = test_parse_config(
            "[playground]\nname = \"Counter\"\nlive = false\norientation = \"v\"\ndebounce_ms = 250\nerror_retention = \"drop_renderable\"",
        );
        assert_eq!(config.playground.name.as_deref(), Some("Counter"));
        assert!(!config.playground.live);
        assert_eq!(config.playground.orientation, Orientation::Vertical);
        assert_eq!(config.playground.debounce_ms, 250);
        assert_eq!(config.playground.error_retention, ErrorRetention::DropRenderable);
    }

    #[test]
    fn test_orientation_long_form() {
        let config = test_parse_config("[playground]\norientation = \"vertical\"");
        assert_eq!(config.playground.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_blank_portal_renders_in_place() {
        let config = test_parse_config("[playground]\nportal = \"  \"");
        assert_eq!(config.playground.portal_target(), None);
    }
}
