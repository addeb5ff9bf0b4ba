//! Core types - pure abstractions shared across the codebase.

mod file;
mod id;
mod shutdown;

pub use file::{FileSet, Fingerprint, InputFile};
pub use id::{SESSION_PREFIX, SessionId};
pub use shutdown::{is_shutdown, register_shutdown, setup_shutdown_handler};
