//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::session::Orientation;

/// Live component playground: edit files, watch the preview follow
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kitchen.toml)
    #[arg(short = 'C', long, global = true, default_value = "kitchen.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output (session and build details)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open an interactive session that rebuilds as the files change
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Build the preview once and print the result
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        session: SessionArgs,
    },
}

impl Commands {
    pub fn session(&self) -> &SessionArgs {
        match self {
            Self::Watch { session } | Self::Build { session } => session,
        }
    }
}

/// Shared session arguments for Watch and Build commands
#[derive(clap::Args, Debug, Clone)]
pub struct SessionArgs {
    /// Source files of the playground (first one is the entry)
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Label shown in the panel header
    #[arg(short, long)]
    pub name: Option<String>,

    /// Start with the code panel visible
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub live: Option<bool>,

    /// Split direction between preview and code (h or v)
    #[arg(short, long)]
    pub dir: Option<Orientation>,

    /// Quiescence window in milliseconds before a rebuild
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from(["kitchen", "-v", "watch", "App.tsx", "util.ts", "-d", "v"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("kitchen.toml"));

        let Commands::Watch { session } = &cli.command else {
            panic!("expected watch");
        };
        assert_eq!(session.files.len(), 2);
        assert_eq!(session.dir, Some(Orientation::Vertical));
        assert_eq!(session.live, None);
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "kitchen", "b", "App.tsx", "--live", "false", "--debounce", "250", "-C", "other.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        let session = cli.command.session();
        assert_eq!(session.live, Some(false));
        assert_eq!(session.debounce, Some(250));
        assert!(matches!(cli.command, Commands::Build { .. }));
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["kitchen", "watch"]).is_err());
    }
}
