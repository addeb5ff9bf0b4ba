//! Command-line interface module.

mod args;
pub mod build;
pub mod files;
pub mod render;
pub mod watch;

pub use args::{Cli, Commands, SessionArgs};
