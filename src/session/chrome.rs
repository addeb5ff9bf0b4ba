//! Panel chrome projection.
//!
//! Everything here is derived from [`SessionState`] on demand. Front-ends
//! (the terminal renderer, or any host embedding the library) draw from a
//! [`Chrome`] value and report clicks back as [`ViewAction`]s.

use serde::Serialize;

use super::gate::PreviewView;
use super::options::Appearance;
use super::overlay::OverlayState;
use super::view::{Orientation, ViewAction, ViewState};
use super::SessionState;

/// Class of the root element, optionally followed by the host's extra class.
pub const ROOT_CLASS: &str = "code-kitchen-root";

/// Title of the error indicator.
pub const ERROR_INDICATOR_TITLE: &str = "This preview has errors. Click to show.";

// ============================================================================
// Attributes
// ============================================================================

/// Observable `data-*` attributes of the root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewAttributes {
    #[serde(rename = "data-dir")]
    pub dir: Orientation,
    /// Present only when fullscreen.
    #[serde(rename = "data-fullscreen", skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<bool>,
    /// Present only when the error overlay is visible.
    #[serde(rename = "data-show-error", skip_serializing_if = "Option::is_none")]
    pub show_error: Option<bool>,
    #[serde(rename = "data-show-code")]
    pub show_code: bool,
}

impl ViewAttributes {
    pub fn new(view: &ViewState, overlay: OverlayState) -> Self {
        Self {
            dir: view.orientation,
            fullscreen: view.fullscreen.then_some(true),
            show_error: overlay.is_visible().then_some(true),
            show_code: view.code_panel_visible,
        }
    }

    /// Attribute name/value pairs in document order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("data-dir", self.dir.as_attr().to_string())];
        if let Some(v) = self.fullscreen {
            pairs.push(("data-fullscreen", v.to_string()));
        }
        if let Some(v) = self.show_error {
            pairs.push(("data-show-error", v.to_string()));
        }
        pairs.push(("data-show-code", self.show_code.to_string()));
        pairs
    }
}

// ============================================================================
// Controls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    RotateToVertical,
    RotateToHorizontal,
    ShowCode,
    HideCode,
    Fullscreen,
    ExitFullscreen,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Control {
    #[serde(skip)]
    pub action: ViewAction,
    pub title: &'static str,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayView {
    pub message: String,
    pub visible: bool,
}

/// Full panel model of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub class_name: String,
    pub style: Option<String>,
    pub label: Option<String>,
    pub attributes: ViewAttributes,
    /// Toolbar, left to right.
    pub controls: Vec<Control>,
    pub content: PreviewView,
    /// Present whenever an error exists, visible or not.
    pub overlay: Option<OverlayView>,
    pub error_indicator: Option<Control>,
    pub editor_visible: bool,
}

impl Chrome {
    pub fn project(state: &SessionState, appearance: &Appearance) -> Self {
        let view = &state.view;
        let overlay = state.overlay();

        let class_name = match appearance.class_name.as_deref() {
            Some(extra) if !extra.trim().is_empty() => format!("{ROOT_CLASS} {}", extra.trim()),
            _ => ROOT_CLASS.to_string(),
        };

        Self {
            class_name,
            style: appearance.style.clone(),
            label: appearance.name.clone(),
            attributes: ViewAttributes::new(view, overlay),
            controls: toolbar(view),
            content: state.preview_view(),
            overlay: state.preview.error.as_ref().map(|failure| OverlayView {
                message: failure.to_string(),
                visible: overlay.is_visible(),
            }),
            error_indicator: overlay.has_error().then_some(Control {
                action: ViewAction::ToggleErrorOverlay,
                title: ERROR_INDICATOR_TITLE,
                icon: Icon::Error,
            }),
            editor_visible: view.code_panel_visible,
        }
    }

    /// Find the control bound to `action`, if it is currently offered.
    pub fn control(&self, action: ViewAction) -> Option<&Control> {
        self.controls
            .iter()
            .chain(self.error_indicator.as_ref())
            .find(|c| c.action == action)
    }
}

fn toolbar(view: &ViewState) -> Vec<Control> {
    let mut controls = Vec::with_capacity(3);
    if view.layout_control_visible() {
        // Icon names the orientation a click switches to
        controls.push(Control {
            action: ViewAction::ToggleLayout,
            title: "Toggle Layout",
            icon: match view.orientation {
                Orientation::Horizontal => Icon::RotateToVertical,
                Orientation::Vertical => Icon::RotateToHorizontal,
            },
        });
    }
    controls.push(Control {
        action: ViewAction::ToggleCodePanel,
        title: "Show/Hide Code Editor",
        icon: if view.code_panel_visible { Icon::HideCode } else { Icon::ShowCode },
    });
    controls.push(Control {
        action: ViewAction::ToggleFullscreen,
        title: "Toggle fullscreen",
        icon: if view.fullscreen { Icon::ExitFullscreen } else { Icon::Fullscreen },
    });
    controls
}
