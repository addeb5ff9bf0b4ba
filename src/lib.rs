//! Kitchen - a live code playground core.
//!
//! A session holds a set of editable files, debounces edits, hands each
//! quiescent file set to a [`provider::PreviewProvider`] and gates the
//! result into a preview panel with an error overlay, layout toggles and a
//! fullscreen presentation that can be portaled to another mount target.
//!
//! ```text
//! host ──edit──► Playground ──► SessionActor ──debounce──► PreviewProvider
//!                    ▲                │                          │
//!                    └── Snapshot ◄───┴──── render gate ◄────────┘
//! ```
//!
//! The `kitchen` binary drives a session from files on disk.

pub mod actor;
pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod mount;
pub mod provider;
pub mod session;
pub mod utils;

pub use crate::actor::{Playground, PlaygroundError, Snapshot};
pub use crate::core::{FileSet, InputFile, SessionId};
pub use crate::mount::{Document, Placement};
pub use crate::provider::{Failure, PreviewProvider, PreviewResult, Renderable, Resolver};
pub use crate::session::{ErrorRetention, Orientation, SessionOptions, ViewAction, ViewState};
