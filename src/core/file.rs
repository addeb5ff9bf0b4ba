//! Input files and ordered file sets.
//!
//! A [`FileSet`] is what the editor hands over on every edit: the complete,
//! ordered list of files (no incremental diffing). Sets are immutable and
//! cheap to clone, so the same value can sit in the debounce buffer, in the
//! session state and in an in-flight build request at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single editable source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Identity of the file within a set (e.g. `App.tsx`).
    pub path: String,
    pub content: String,
    /// Provider-specific metadata, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl InputFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Fingerprint
// =============================================================================

/// A 256-bit content fingerprint (blake3) of a whole file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint of the empty set.
    pub fn empty() -> Self {
        Self::of(&[])
    }

    /// Hash paths, contents and metadata in order.
    ///
    /// Every field is length-prefixed so `("ab", "c")` and `("a", "bc")`
    /// never collide.
    pub fn of(files: &[InputFile]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(files.len() as u64).to_le_bytes());
        for file in files {
            update_field(&mut hasher, &file.path);
            update_field(&mut hasher, &file.content);
            hasher.update(&(file.metadata.len() as u64).to_le_bytes());
            for (key, value) in &file.metadata {
                update_field(&mut hasher, key);
                update_field(&mut hasher, value);
            }
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

fn update_field(hasher: &mut blake3::Hasher, field: &str) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 16 hex chars are plenty for logs
        write!(f, "{}", &self.to_hex()[..16])
    }
}

// =============================================================================
// FileSet
// =============================================================================

/// Ordered, immutable set of input files.
///
/// Order is the editor's insertion order; it is preserved but carries no
/// meaning for the session itself.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSet {
    files: Arc<[InputFile]>,
    fingerprint: Fingerprint,
}

impl FileSet {
    pub fn new(files: Vec<InputFile>) -> Self {
        let fingerprint = Fingerprint::of(&files);
        Self {
            files: files.into(),
            fingerprint,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn as_slice(&self) -> &[InputFile] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&InputFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    /// Full replacement set with `path` set to `content`.
    ///
    /// Existing files keep their position (and metadata); unknown paths are
    /// appended. This is the shape of an editor keystroke.
    pub fn with_content(&self, path: &str, content: impl Into<String>) -> FileSet {
        let content = content.into();
        let mut files = self.files.to_vec();
        match files.iter_mut().find(|f| f.path == path) {
            Some(file) => file.content = content,
            None => files.push(InputFile::new(path, content)),
        }
        FileSet::new(files)
    }
}

impl Default for FileSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for FileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSet")
            .field("paths", &self.paths().collect::<Vec<_>>())
            .field("fingerprint", &format_args!("{}", self.fingerprint))
            .finish()
    }
}

impl From<Vec<InputFile>> for FileSet {
    fn from(files: Vec<InputFile>) -> Self {
        Self::new(files)
    }
}

impl FromIterator<InputFile> for FileSet {
    fn from_iter<I: IntoIterator<Item = InputFile>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a InputFile;
    type IntoIter = std::slice::Iter<'a, InputFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileSet {
        FileSet::new(vec![
            InputFile::new("a.tsx", "export default () => null"),
            InputFile::new("b.css", "body {}"),
        ])
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let set = sample();
        let same = sample();
        assert_eq!(set.fingerprint(), same.fingerprint());

        let edited = set.with_content("a.tsx", "export default () => 1");
        assert_ne!(set.fingerprint(), edited.fingerprint());
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        let left = FileSet::new(vec![InputFile::new("ab", "c")]);
        let right = FileSet::new(vec![InputFile::new("a", "bc")]);
        assert_ne!(left.fingerprint(), right.fingerprint());
    }

    #[test]
    fn test_fingerprint_includes_metadata() {
        let plain = FileSet::new(vec![InputFile::new("a.tsx", "x")]);
        let tagged = FileSet::new(vec![InputFile::new("a.tsx", "x").with_metadata("hidden", "true")]);
        assert_ne!(plain.fingerprint(), tagged.fingerprint());
    }

    #[test]
    fn test_with_content_keeps_order() {
        let set = sample().with_content("a.tsx", "changed");
        assert_eq!(set.paths().collect::<Vec<_>>(), ["a.tsx", "b.css"]);
        assert_eq!(set.get("a.tsx").unwrap().content, "changed");

        let set = set.with_content("c.ts", "new");
        assert_eq!(set.paths().collect::<Vec<_>>(), ["a.tsx", "b.css", "c.ts"]);
    }

    #[test]
    fn test_empty_set() {
        let set = FileSet::default();
        assert!(set.is_empty());
        assert_eq!(set.fingerprint(), Fingerprint::empty());
        assert_eq!(set.fingerprint().to_string().len(), 16);
    }
}
