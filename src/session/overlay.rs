//! Error Visibility State Machine.
//!
//! Visibility is never stored; it is recomputed from the latest preview
//! result and the user's toggle on every state change:
//!
//! ```text
//! visible = error && (toggled || !renderable)
//! ```
//!
//! The toggle is sticky (a rebuild does not reset it), but the displayed
//! outcome follows the result: a build that loses its renderable brings the
//! overlay back even if the user had hidden it.

use crate::provider::PreviewResult;

/// Where the error overlay stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// No error.
    Hidden,
    /// Error and nothing rendered: shown by default.
    Dismissible,
    /// Error and the user asked to see it.
    UserShown,
    /// Error, but a renderable exists and the user has not asked for it.
    UserHidden,
}

impl OverlayState {
    pub fn evaluate(result: &PreviewResult, toggled: bool) -> Self {
        match (result.error.is_some(), toggled, result.renderable.is_some()) {
            (false, _, _) => Self::Hidden,
            (true, true, _) => Self::UserShown,
            (true, false, false) => Self::Dismissible,
            (true, false, true) => Self::UserHidden,
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, Self::Dismissible | Self::UserShown)
    }

    /// Whether the error indicator (the click target) exists at all.
    pub fn has_error(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}
