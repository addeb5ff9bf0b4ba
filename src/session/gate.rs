//! Preview Render Gate.
//!
//! Decides what the preview area shows. The last good render wins over a
//! blank screen: a keystroke-triggered rebuild (or a failed build) keeps the
//! previous output up instead of flashing "loading".

use crate::provider::{PreviewResult, Renderable};

/// Text shown while the first build is in flight.
pub const LOADING_TEXT: &str = "loading...";

/// What the preview area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewView {
    /// Bundling, and nothing was ever rendered.
    Loading,
    /// A renderable exists; shown regardless of `bundling`.
    Rendered(Renderable),
    /// Nothing to show and nothing in flight.
    Empty,
}

impl PreviewView {
    /// Gate the current result, falling back to the last known-good render.
    pub fn evaluate(result: &PreviewResult, last_good: Option<&Renderable>) -> Self {
        match (result.renderable.as_ref().or(last_good), result.bundling) {
            (Some(renderable), _) => Self::Rendered(renderable.clone()),
            (None, true) => Self::Loading,
            (None, false) => Self::Empty,
        }
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        match self {
            Self::Rendered(r) => Some(r),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Rendered(_) => "rendered",
            Self::Empty => "empty",
        }
    }
}
