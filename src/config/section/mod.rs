//! Configuration section definitions.

mod playground;
mod preview;

pub use playground::PlaygroundConfig;
pub use preview::PreviewConfig;
