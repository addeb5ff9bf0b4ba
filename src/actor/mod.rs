//! Actor System for Live Preview
//!
//! One actor per mounted playground; the host talks to it through a
//! [`Playground`] handle:
//!
//! ```text
//! Playground --SessionMsg--> SessionActor --spawn--> PreviewProvider::build
//!     ^                        |   (debounce)              |
//!     +----- watch<Snapshot> --+ <------- BuildDone -------+
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message and snapshot types
//! - `debouncer` - Pure quiescence timing
//! - `session` - The per-session event loop
//! - `handle` - Spawning and talking to a session

pub mod debouncer;
pub mod handle;
pub mod messages;
pub mod session;


pub use handle::{Playground, PlaygroundError};
pub use messages::Snapshot;
