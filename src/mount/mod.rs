//! Presentation Mount
//!
//! Fullscreen content is moved out of the panel into a container under a
//! shared attach target. The container lives exactly as long as its
//! [`MountHandle`]; each session owns at most one through its
//! [`Presentation`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use thiserror::Error;

use crate::core::SessionId;

/// Class carried by every portal container.
pub const PORTAL_CLASS: &str = "code-kitchen-portal";

/// Attach target every document starts with.
pub const DEFAULT_TARGET: &str = "body";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("attach target `{0}` does not exist")]
    UnknownTarget(String),
}

// =============================================================================
// Document
// =============================================================================

/// A container appended under an attach target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: u64,
    pub class: &'static str,
    pub owner: SessionId,
}

#[derive(Debug, Default)]
struct DocumentInner {
    targets: DashMap<String, Vec<Container>>,
    next_id: AtomicU64,
}

/// Shared attach targets.
///
/// Cheap to clone; the only resource shared between sessions.
#[derive(Debug, Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        let document = Self {
            inner: Arc::new(DocumentInner::default()),
        };
        document.add_target(DEFAULT_TARGET);
        document
    }

    /// Register an attach target. Existing containers are kept.
    pub fn add_target(&self, name: impl Into<String>) {
        self.inner.targets.entry(name.into()).or_default();
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.inner.targets.contains_key(name)
    }

    /// Append a fresh container under `target`.
    pub fn acquire(&self, target: &str, owner: &SessionId) -> Result<MountHandle, MountError> {
        let mut containers = self
            .inner
            .targets
            .get_mut(target)
            .ok_or_else(|| MountError::UnknownTarget(target.to_string()))?;

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        containers.push(Container {
            id,
            class: PORTAL_CLASS,
            owner: owner.clone(),
        });

        Ok(MountHandle {
            document: self.clone(),
            target: target.to_string(),
            id,
        })
    }

    /// Containers currently under `target`, in append order.
    pub fn containers(&self, target: &str) -> Vec<Container> {
        self.inner
            .targets
            .get(target)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn container_count(&self, target: &str) -> usize {
        self.inner.targets.get(target).map_or(0, |c| c.len())
    }

    fn remove(&self, target: &str, id: u64) {
        if let Some(mut containers) = self.inner.targets.get_mut(target) {
            containers.retain(|c| c.id != id);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership of one container. Dropping it removes the container.
#[derive(Debug)]
pub struct MountHandle {
    document: Document,
    target: String,
    id: u64,
}

impl MountHandle {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn container_id(&self) -> u64 {
        self.id
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.document.remove(&self.target, self.id);
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Where a session's panel currently renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    InPlace,
    Portal { target: String, container: u64 },
}

/// Per-session reconciliation of `fullscreen` with the attach target.
#[derive(Debug)]
pub struct Presentation {
    document: Document,
    target: Option<String>,
    owner: SessionId,
    handle: Option<MountHandle>,
}

impl Presentation {
    pub fn new(document: Document, target: Option<String>, owner: SessionId) -> Self {
        Self {
            document,
            target,
            owner,
            handle: None,
        }
    }

    /// Bring the mount in line with `fullscreen`. Idempotent.
    pub fn sync(&mut self, fullscreen: bool) -> Result<Placement, MountError> {
        if !fullscreen {
            self.release();
        } else if self.handle.is_none()
            && let Some(target) = &self.target
        {
            self.handle = Some(self.document.acquire(target, &self.owner)?);
        }
        Ok(self.placement())
    }

    pub fn placement(&self) -> Placement {
        match &self.handle {
            Some(handle) => Placement::Portal {
                target: handle.target().to_string(),
                container: handle.container_id(),
            },
            None => Placement::InPlace,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    /// Give the container back; content renders in place again.
    pub fn release(&mut self) {
        self.handle = None;
    }
}
