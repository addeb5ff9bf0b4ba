//! Playground configuration from `kitchen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [playground], [preview]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config discovery, path expansion
//! └── mod.rs         # KitchenConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                          |
//! |----------------|--------------------------------------------------|
//! | `[playground]` | Label, layout, debounce, fullscreen target       |
//! | `[preview]`    | Preview command and staging directory            |
//! | `[resolve]`    | Bare module specifier → path or URL              |

pub mod section;
pub mod types;
mod util;

use util::{expand_path, find_config_file};

pub use section::{PlaygroundConfig, PreviewConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, SessionArgs};
use crate::core::FileSet;
use crate::log;
use crate::provider::Resolver;
use crate::session::SessionOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kitchen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Absolute path to the config file; empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub playground: PlaygroundConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    /// Module specifier → location handed to the preview command
    #[serde(default)]
    pub resolve: BTreeMap<String, String>,
}

impl KitchenConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd. A missing config file is not an error as
    /// long as the result validates (nothing to build without a command).
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = crate::utils::path::normalize_path(&path);
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.finalize(&root, cli.command.session());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths and apply CLI overrides.
    fn finalize(&mut self, root: &Path, args: &SessionArgs) {
        self.root = crate::utils::path::normalize_path(root);
        self.preview.cache_dir = expand_path(&self.preview.cache_dir, &self.root);
        self.apply_session_args(args);
    }

    fn apply_session_args(&mut self, args: &SessionArgs) {
        let playground = &mut self.playground;
        if args.name.is_some() {
            playground.name = args.name.clone();
        }
        Self::update_option(&mut playground.live, args.live.as_ref());
        Self::update_option(&mut playground.orientation, args.dir.as_ref());
        Self::update_option(&mut playground.debounce_ms, args.debounce.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.playground.validate(&mut diag);
        self.preview.validate(&mut diag);
        for (specifier, location) in &self.resolve {
            if specifier.trim().is_empty() || location.trim().is_empty() {
                diag.error(
                    FieldPath::new("resolve"),
                    format!("empty entry `{specifier}` = `{location}`"),
                );
            }
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    // ========================================================================
    // session wiring
    // ========================================================================

    pub fn resolver(&self) -> Resolver {
        if self.resolve.is_empty() {
            Resolver::none()
        } else {
            Resolver::from_map(self.resolve.clone())
        }
    }

    /// Mount options for a session over `files`.
    pub fn session_options(&self, files: FileSet) -> SessionOptions {
        let playground = &self.playground;
        let mut options = SessionOptions::new(files)
            .resolver(self.resolver())
            .live(playground.live)
            .orientation(playground.orientation)
            .debounce(Duration::from_millis(playground.debounce_ms))
            .retention(playground.error_retention);

        if let Some(name) = &playground.name {
            options = options.name(name);
        }
        if let Some(class_name) = &playground.class_name {
            options = options.class_name(class_name);
        }
        if let Some(style) = &playground.style {
            options = options.style(style);
        }
        if let Some(target) = playground.portal_target() {
            options = options.portal(target);
        }
        options
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KitchenConfig {
    let (parsed, ignored) = KitchenConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
