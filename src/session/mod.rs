//! Preview-synchronization state machine.
//!
//! One [`SessionState`] per mounted playground. Every change goes through the
//! pure [`reduce`] function; everything the user sees is a projection of the
//! state, never stored next to it.
//!
//! ```text
//! Edit ─────────► files
//! ResetInitial ─► files (bypasses the debounce buffer)
//! DebounceFired ► debounced_files, revision+1
//! BuildStarted ─► bundling                    (stale revisions dropped)
//! BuildFinished ► preview, last_good          (stale revisions dropped)
//! Toggle ───────► view
//! ```
//!
//! # Module Structure
//!
//! - `view` - orientation / code panel / fullscreen / error toggle
//! - `overlay` - error overlay visibility projection
//! - `gate` - loading / rendered / empty projection
//! - `chrome` - panel model and `data-*` attributes
//! - `options` - mount-time options

pub mod chrome;
pub mod gate;
pub mod options;
pub mod overlay;
pub mod view;

use serde::{Deserialize, Serialize};

use crate::core::{FileSet, SessionId};
use crate::provider::{Failure, PreviewResult, Renderable};

pub use chrome::{Chrome, ViewAttributes};
pub use gate::PreviewView;
pub use options::{Appearance, SessionOptions};
pub use overlay::OverlayState;
pub use view::{Orientation, ViewAction, ViewState};

/// What a failed build does with the renderable of the previous result.
///
/// The render gate always falls back to the last known-good render; this
/// only decides whether that render still *suppresses* the error overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorRetention {
    /// The failed result keeps the last good renderable: the overlay stays
    /// behind the error indicator until the user clicks it, and can be
    /// hidden again.
    #[default]
    KeepRenderable,
    /// The failed result carries no renderable: the overlay is always
    /// shown, the toggle cannot hide it.
    DropRenderable,
}

/// A discrete input to the session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The editor replaced the whole file set.
    Edit(FileSet),
    /// The debounce window elapsed; this set goes to the provider.
    DebounceFired(FileSet),
    /// The provider was asked to build `revision`.
    BuildStarted { revision: u64 },
    /// The provider answered for `revision`.
    BuildFinished {
        revision: u64,
        outcome: Result<Renderable, Failure>,
    },
    /// A user action on the chrome.
    Toggle(ViewAction),
    /// New initial files pushed in from outside: a fresh baseline.
    ResetInitial(FileSet),
}

impl SessionEvent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit(_) => "edit",
            Self::DebounceFired(_) => "debounce",
            Self::BuildStarted { .. } => "start",
            Self::BuildFinished { .. } => "build",
            Self::Toggle(_) => "toggle",
            Self::ResetInitial(_) => "reset",
        }
    }
}

/// Full state of one mounted playground.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: SessionId,
    /// Latest baseline from the host (what the editor was seeded with).
    pub initial_files: FileSet,
    /// Current, un-debounced files.
    pub files: FileSet,
    /// Files as last handed to the provider.
    pub debounced_files: FileSet,
    /// Sequence number of `debounced_files`; 0 until the first build.
    pub revision: u64,
    pub view: ViewState,
    pub preview: PreviewResult,
    /// Last successful render, kept across failures and rebuilds.
    pub last_good: Option<Renderable>,
    pub retention: ErrorRetention,
}

impl SessionState {
    pub fn new(
        session_id: SessionId,
        initial_files: FileSet,
        view: ViewState,
        retention: ErrorRetention,
    ) -> Self {
        Self {
            session_id,
            files: initial_files.clone(),
            debounced_files: initial_files.clone(),
            initial_files,
            revision: 0,
            view,
            preview: PreviewResult::default(),
            last_good: None,
            retention,
        }
    }

    /// Build session state from mount options.
    pub fn from_options(session_id: SessionId, options: &SessionOptions) -> Self {
        Self::new(
            session_id,
            options.initial_files.clone(),
            ViewState::new(options.orientation, options.live),
            options.retention,
        )
    }

    /// Whether a result for `revision` may still be applied.
    pub fn is_current(&self, revision: u64) -> bool {
        revision == self.revision
    }

    pub fn overlay(&self) -> OverlayState {
        OverlayState::evaluate(&self.preview, self.view.error_overlay_toggled)
    }

    pub fn preview_view(&self) -> PreviewView {
        PreviewView::evaluate(&self.preview, self.last_good.as_ref())
    }

    pub fn attributes(&self) -> ViewAttributes {
        ViewAttributes::new(&self.view, self.overlay())
    }

    pub fn chrome(&self, appearance: &Appearance) -> Chrome {
        Chrome::project(self, appearance)
    }
}

/// Apply one event. Pure: no timers, no I/O.
pub fn reduce(mut state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::Edit(files) => {
            state.files = files;
        }
        SessionEvent::ResetInitial(files) => {
            state.initial_files = files.clone();
            state.files = files;
        }
        SessionEvent::DebounceFired(files) => {
            state.debounced_files = files;
            state.revision += 1;
        }
        SessionEvent::BuildStarted { revision } => {
            // Previous renderable and error stay up while the new build runs
            if state.is_current(revision) {
                state.preview.bundling = true;
            }
        }
        SessionEvent::BuildFinished { revision, outcome } => {
            if !state.is_current(revision) {
                return state;
            }
            state.preview = match outcome {
                Ok(renderable) => {
                    state.last_good = Some(renderable.clone());
                    PreviewResult {
                        renderable: Some(renderable),
                        error: None,
                        bundling: false,
                    }
                }
                Err(failure) => PreviewResult {
                    renderable: match state.retention {
                        ErrorRetention::DropRenderable => None,
                        ErrorRetention::KeepRenderable => state.last_good.clone(),
                    },
                    error: Some(failure),
                    bundling: false,
                },
            };
        }
        SessionEvent::Toggle(action) => {
            state.view = state.view.apply(action);
        }
    }
    state
}
