//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! command = ["node", "render.mjs"]   # Runs in the staged file directory
//! cache_dir = "~/.cache/kitchen"     # Staging root, one subdirectory per session
//! ```
//!
//! The command receives the staged files in its working directory plus an
//! `imports.json` with resolved bare imports; stdout is the rendered output.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Program and arguments.
    pub command: Vec<String>,

    /// Staging root (tilde expanded, relative to the config file).
    pub cache_dir: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            cache_dir: PathBuf::from(".kitchen"),
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match self.command.first() {
            None => diag.error_with_hint(
                FieldPath::new("preview.command"),
                "no preview command configured",
                "e.g. command = [\"node\", \"render.mjs\"]",
            ),
            Some(program) if program.trim().is_empty() => {
                diag.error(FieldPath::new("preview.command"), "program name is empty");
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_preview_config() {
        let config = test_parse_config("[preview]\ncommand = [\"node\", \"render.mjs\"]\ncache_dir = \"tmp\"");
        assert_eq!(config.preview.command, vec!["node", "render.mjs"]);
        assert_eq!(config.preview.cache_dir, PathBuf::from("tmp"));
    }

    #[test]
    fn test_missing_command_is_error() {
        let mut diag = ConfigDiagnostics::new();
        PreviewConfig::default().validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);

        let mut diag = ConfigDiagnostics::new();
        let blank = PreviewConfig {
            command: vec![" ".into()],
            ..Default::default()
        };
        blank.validate(&mut diag);
        assert_eq!(diag.errors()[0].message, "program name is empty");
    }
}
