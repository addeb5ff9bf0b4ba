//! Preview Provider boundary.
//!
//! The provider turns a file set into something displayable. It is an
//! external collaborator: the session only hands it a [`BuildRequest`] and
//! waits for a [`Renderable`] or a [`Failure`].
//!
//! ```text
//! debounced files --BuildRequest--> PreviewProvider --Result<Renderable, Failure>--> session
//! ```
//!
//! - `command` - shells out to a user-supplied build command
//! - `imports` - bare import specifier scanning for resolver checks

pub mod command;
mod imports;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{FileSet, SessionId};

pub use command::CommandProvider;
pub use imports::bare_specifiers;

// =============================================================================
// Provider Trait
// =============================================================================

/// Produces a renderable unit from a file set.
///
/// Must be safe to call repeatedly with the same `session_id` (treat it as a
/// cache key) and must not block the caller: long work belongs inside the
/// returned future (or a blocking pool it awaits).
pub trait PreviewProvider: Send + Sync + 'static {
    fn build(
        &self,
        request: BuildRequest,
    ) -> impl Future<Output = Result<Renderable, Failure>> + Send;
}

/// Everything a provider gets for one build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub session_id: SessionId,
    /// Revision of the debounced file set this build is for.
    pub revision: u64,
    pub files: FileSet,
    pub resolver: Resolver,
}

// =============================================================================
// Build Output
// =============================================================================

/// Opaque displayable output of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderable {
    output: Arc<str>,
}

impl Renderable {
    pub fn new(output: impl Into<Arc<str>>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Why a build produced nothing to render.
///
/// The `Display` output is the human-readable message shown verbatim in the
/// error overlay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Bundling/transpilation failed.
    #[error("{message}")]
    Build { message: String },

    /// A module reference could not be resolved.
    #[error("Could not resolve module \"{specifier}\"")]
    Resolve { specifier: String },

    /// The provider task itself died (panicked) before reporting.
    #[error("preview provider crashed: {0}")]
    Crashed(String),
}

impl Failure {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn resolve(specifier: impl Into<String>) -> Self {
        Self::Resolve {
            specifier: specifier.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Build { .. } => "build",
            Self::Resolve { .. } => "resolve",
            Self::Crashed(_) => "crashed",
        }
    }
}

/// Provider output as the session sees it.
///
/// At steady state exactly one of `renderable` / `error` is meaningful.
/// While `bundling`, the previous values stay in place (stale-while-revalidate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewResult {
    pub renderable: Option<Renderable>,
    pub error: Option<Failure>,
    pub bundling: bool,
}

// =============================================================================
// Resolver
// =============================================================================

/// A module reference resolved to something the provider can load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedModule {
    pub specifier: String,
    /// Path, URL or inline source, meaning is up to the provider.
    pub location: String,
}

type ResolveFn = dyn Fn(&str) -> Option<ResolvedModule> + Send + Sync;

/// Maps module references to loadable modules.
///
/// Passed through to the provider unmodified; the session never calls it.
#[derive(Clone, Default)]
pub struct Resolver {
    resolve: Option<Arc<ResolveFn>>,
}

impl Resolver {
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn(&str) -> Option<ResolvedModule> + Send + Sync + 'static,
    {
        Self {
            resolve: Some(Arc::new(resolve)),
        }
    }

    /// Resolver that knows no modules.
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolver backed by a fixed specifier → location table.
    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        Self::new(move |specifier| {
            map.get(specifier).map(|location| ResolvedModule {
                specifier: specifier.to_string(),
                location: location.clone(),
            })
        })
    }

    /// Resolve or report a resolver failure.
    pub fn resolve(&self, specifier: &str) -> Result<ResolvedModule, Failure> {
        self.resolve
            .as_ref()
            .and_then(|f| f(specifier))
            .ok_or_else(|| Failure::resolve(specifier))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("configured", &self.resolve.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages_are_verbatim() {
        let failure = Failure::build("SyntaxError: Unexpected token (1:7)");
        assert_eq!(failure.to_string(), "SyntaxError: Unexpected token (1:7)");
        assert_eq!(failure.label(), "build");

        let failure = Failure::resolve("react-dom");
        assert_eq!(failure.to_string(), "Could not resolve module \"react-dom\"");
        assert_eq!(failure.label(), "resolve");
    }

    #[test]
    fn test_resolver_from_map() {
        let mut map = BTreeMap::new();
        map.insert("react".to_string(), "vendor/react.js".to_string());
        let resolver = Resolver::from_map(map);

        let module = resolver.resolve("react").unwrap();
        assert_eq!(module.location, "vendor/react.js");
        assert_eq!(resolver.resolve("vue"), Err(Failure::resolve("vue")));
    }

    #[test]
    fn test_resolver_none() {
        let resolver = Resolver::none();
        assert!(resolver.resolve("anything").is_err());
        assert_eq!(format!("{resolver:?}"), "Resolver { configured: false }");
    }

    #[test]
    fn test_preview_result_default() {
        let result = PreviewResult::default();
        assert!(result.renderable.is_none());
        assert!(result.error.is_none());
        assert!(!result.bundling);
    }
}
