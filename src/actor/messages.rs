//! Actor Message Definitions
//!
//! ```text
//! Playground --SessionMsg--> SessionActor --BuildRequest--> PreviewProvider
//!      ^                          |  ^                            |
//!      +------ Snapshot ----------+  +--------- BuildDone --------+
//! ```

use crate::core::{FileSet, SessionId};
use crate::mount::Placement;
use crate::provider::{Failure, Renderable};
use crate::session::{
    Chrome, OverlayState, PreviewView, SessionState, ViewAction, ViewAttributes, ViewState,
};

// =============================================================================
// SessionActor Messages
// =============================================================================

/// Messages to Session Actor
#[derive(Debug)]
pub enum SessionMsg {
    /// Editor replaced the whole file set (debounced)
    Edit(FileSet),
    /// Host pushed new initial files (bypasses the pending debounce)
    ResetInitial(FileSet),
    /// User action on the chrome
    Action(ViewAction),
    /// Dispose the session
    Shutdown,
}

/// Result of one provider call, tagged with the revision it was built for.
#[derive(Debug)]
pub struct BuildDone {
    pub revision: u64,
    pub outcome: Result<Renderable, Failure>,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything observable about a session at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub session_id: SessionId,
    pub revision: u64,
    /// Current, un-debounced files.
    pub files: FileSet,
    pub view: ViewState,
    pub bundling: bool,
    pub error: Option<Failure>,
    pub overlay: OverlayState,
    pub preview: PreviewView,
    pub chrome: Chrome,
    pub placement: Placement,
    /// Session was disposed; no further updates follow.
    pub closed: bool,
}

impl Snapshot {
    pub fn new(state: &SessionState, chrome: Chrome, placement: Placement) -> Self {
        Self {
            session_id: state.session_id.clone(),
            revision: state.revision,
            files: state.files.clone(),
            view: state.view,
            bundling: state.preview.bundling,
            error: state.preview.error.clone(),
            overlay: state.overlay(),
            preview: state.preview_view(),
            chrome,
            placement,
            closed: false,
        }
    }

    pub fn attributes(&self) -> &ViewAttributes {
        &self.chrome.attributes
    }
}
