//! View State Machine.
//!
//! Four independent flags, each flipped only by an explicit user action:
//!
//! | Flag                    | Action               | Control               |
//! |-------------------------|----------------------|-----------------------|
//! | `orientation`           | `ToggleLayout`       | Toggle Layout         |
//! | `code_panel_visible`    | `ToggleCodePanel`    | Show/Hide Code Editor |
//! | `fullscreen`            | `ToggleFullscreen`   | Toggle fullscreen     |
//! | `error_overlay_toggled` | `ToggleErrorOverlay` | error indicator       |
//!
//! The only cross-dependency: while the code panel is hidden there is nothing
//! to split, so the layout control is not offered and `ToggleLayout` is a
//! no-op. The orientation itself is kept for when the panel comes back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Split direction between preview and code panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "h", alias = "horizontal")]
    Horizontal,
    #[serde(rename = "v", alias = "vertical")]
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Value of the `data-dir` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Horizontal => "h",
            Self::Vertical => "v",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attr())
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Ok(Self::Horizontal),
            "v" | "vertical" => Ok(Self::Vertical),
            other => Err(format!(
                "unknown orientation `{other}` (expected `h` or `v`)"
            )),
        }
    }
}

/// A user action on the panel chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewAction {
    ToggleLayout,
    ToggleCodePanel,
    ToggleFullscreen,
    ToggleErrorOverlay,
}

impl ViewAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::ToggleLayout => "layout",
            Self::ToggleCodePanel => "code",
            Self::ToggleFullscreen => "fullscreen",
            Self::ToggleErrorOverlay => "error",
        }
    }
}

/// User-controlled view flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub orientation: Orientation,
    pub code_panel_visible: bool,
    pub fullscreen: bool,
    /// Explicit intent to show the error overlay, independent of whether an
    /// error currently exists.
    pub error_overlay_toggled: bool,
}

impl ViewState {
    pub fn new(orientation: Orientation, live: bool) -> Self {
        Self {
            orientation,
            code_panel_visible: live,
            fullscreen: false,
            error_overlay_toggled: false,
        }
    }

    /// Apply one user action.
    pub fn apply(self, action: ViewAction) -> Self {
        let mut next = self;
        match action {
            ViewAction::ToggleLayout if self.layout_control_visible() => {
                next.orientation = self.orientation.toggled();
            }
            ViewAction::ToggleLayout => {}
            ViewAction::ToggleCodePanel => next.code_panel_visible = !self.code_panel_visible,
            ViewAction::ToggleFullscreen => next.fullscreen = !self.fullscreen,
            ViewAction::ToggleErrorOverlay => {
                next.error_overlay_toggled = !self.error_overlay_toggled;
            }
        }
        next
    }

    /// Layout control is only offered when there is something to split.
    pub fn layout_control_visible(&self) -> bool {
        self.code_panel_visible
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Orientation::default(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let view = ViewState::default();
        assert_eq!(view.orientation, Orientation::Horizontal);
        assert!(view.code_panel_visible);
        assert!(!view.fullscreen);
        assert!(!view.error_overlay_toggled);
    }

    #[test]
    fn test_flags_are_independent() {
        let view = ViewState::default()
            .apply(ViewAction::ToggleFullscreen)
            .apply(ViewAction::ToggleErrorOverlay);
        assert!(view.fullscreen);
        assert!(view.error_overlay_toggled);
        assert!(view.code_panel_visible);
        assert_eq!(view.orientation, Orientation::Horizontal);

        let view = view.apply(ViewAction::ToggleLayout);
        assert_eq!(view.orientation, Orientation::Vertical);
        assert!(view.fullscreen);
    }

    #[test]
    fn test_layout_preserved_while_code_hidden() {
        let view = ViewState::new(Orientation::Vertical, true).apply(ViewAction::ToggleCodePanel);
        assert!(!view.code_panel_visible);
        assert!(!view.layout_control_visible());

        // No control, no effect
        let view = view.apply(ViewAction::ToggleLayout);
        assert_eq!(view.orientation, Orientation::Vertical);

        let view = view.apply(ViewAction::ToggleCodePanel);
        assert!(view.layout_control_visible());
        assert_eq!(view.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_double_toggle_restores() {
        let start = ViewState::default();
        for action in [
            ViewAction::ToggleLayout,
            ViewAction::ToggleCodePanel,
            ViewAction::ToggleFullscreen,
            ViewAction::ToggleErrorOverlay,
        ] {
            assert_eq!(start.apply(action).apply(action), start, "{}", action.label());
        }
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!("h".parse::<Orientation>().unwrap(), Orientation::Horizontal);
        assert_eq!("Vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert!("diagonal".parse::<Orientation>().is_err());
        assert_eq!(Orientation::Vertical.to_string(), "v");
    }
}
