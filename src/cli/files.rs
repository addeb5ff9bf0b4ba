//! Reading playground files from disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{FileSet, InputFile};
use crate::utils::path::{display_relative, normalize_path};

/// The files of one playground as they sit on disk.
#[derive(Debug, Clone)]
pub struct SourceFiles {
    /// Base the editor paths are relative to.
    base: PathBuf,
    paths: Vec<PathBuf>,
}

impl SourceFiles {
    /// Paths are kept in the given order; the first one is the entry file.
    pub fn new(paths: &[PathBuf], base: &Path) -> Self {
        let base = normalize_path(base);
        let paths = paths.iter().map(|p| normalize_path(&base.join(p))).collect();
        Self { base, paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Editor path of a file on disk (relative, forward slashes).
    pub fn editor_path(&self, path: &Path) -> String {
        display_relative(path, &self.base)
    }

    pub fn contains(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.paths.iter().any(|p| *p == path)
    }

    /// Read every file; the whole set is replaced on each change.
    pub fn read(&self) -> Result<FileSet> {
        self.paths
            .iter()
            .map(|path| {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(InputFile::new(self.editor_path(path), content))
            })
            .collect::<Result<Vec<_>>>()
            .map(FileSet::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_keeps_order_and_relative_paths() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("lib")).unwrap();
        fs::write(temp.path().join("App.tsx"), "import x from './lib/x'").unwrap();
        fs::write(temp.path().join("lib/x.ts"), "export default 1").unwrap();

        let sources = SourceFiles::new(
            &[PathBuf::from("App.tsx"), PathBuf::from("lib/x.ts")],
            temp.path(),
        );
        let files = sources.read().unwrap();
        assert_eq!(files.paths().collect::<Vec<_>>(), vec!["App.tsx", "lib/x.ts"]);
        assert_eq!(files.get("lib/x.ts").unwrap().content, "export default 1");
        assert!(sources.contains(&temp.path().join("App.tsx")));
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let sources = SourceFiles::new(&[PathBuf::from("gone.tsx")], temp.path());
        let err = sources.read().unwrap_err();
        assert!(err.to_string().contains("gone.tsx"));
    }
}
