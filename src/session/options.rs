//! Mount-time options of a playground session.

use std::time::Duration;

use super::ErrorRetention;
use super::view::Orientation;
use crate::actor::debouncer::DEBOUNCE_MS;
use crate::core::FileSet;
use crate::provider::Resolver;

/// Presentational passthrough, never read by the state machines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Appearance {
    /// Header label.
    pub name: Option<String>,
    /// Inline style string for the root element.
    pub style: Option<String>,
    /// Extra class appended to the root class.
    pub class_name: Option<String>,
}

/// Everything a host configures when mounting a playground.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Starting (and resetting) file set.
    pub initial_files: FileSet,
    /// Handed to the provider unmodified.
    pub resolver: Resolver,
    /// Initial code panel visibility.
    pub live: bool,
    pub orientation: Orientation,
    pub appearance: Appearance,
    /// Quiescence window of the debounce buffer.
    pub debounce: Duration,
    /// Attach target for fullscreen; `None` renders in place.
    pub portal: Option<String>,
    pub retention: ErrorRetention,
}

impl SessionOptions {
    pub fn new(initial_files: impl Into<FileSet>) -> Self {
        Self {
            initial_files: initial_files.into(),
            resolver: Resolver::none(),
            live: true,
            orientation: Orientation::Horizontal,
            appearance: Appearance::default(),
            debounce: Duration::from_millis(DEBOUNCE_MS),
            portal: None,
            retention: ErrorRetention::default(),
        }
    }

    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.appearance.name = Some(name.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.appearance.style = Some(style.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.appearance.class_name = Some(class_name.into());
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn portal(mut self, target: impl Into<String>) -> Self {
        self.portal = Some(target.into());
        self
    }

    pub fn retention(mut self, retention: ErrorRetention) -> Self {
        self.retention = retention;
        self
    }
}
