//! Session identity.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Prefix shared by every generated session id.
pub const SESSION_PREFIX: &str = "code-kitchen-";

/// Length of the random suffix (lowercase hex chars of a v4 uuid).
const SUFFIX_LEN: usize = 10;

/// Opaque, stable identifier of one mounted playground session.
///
/// Generated once when the session is created and never changed afterwards.
/// Providers use it as the only cache key for build artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Generate a fresh `code-kitchen-<random>` id.
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(format!("{SESSION_PREFIX}{}", &uuid[..SUFFIX_LEN]).into())
    }

    /// Wrap an existing id (e.g. restored by a host).
    pub fn from_raw(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
