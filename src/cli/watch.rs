//! `kitchen watch`: interactive session over files on disk.
//!
//! ```text
//! notify ──► re-read all files ──► Playground::edit
//! stdin keys ──► toggle / reset / quit
//! snapshots ──► status block
//! Ctrl+C ──► crossbeam ──► shutdown
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use tokio::sync::mpsc;

use super::SessionArgs;
use super::files::SourceFiles;
use super::render::render;
use crate::actor::{Playground, Snapshot};
use crate::config::KitchenConfig;
use crate::core::FileSet;
use crate::log;
use crate::mount::Document;
use crate::provider::CommandProvider;
use crate::session::ViewAction;

/// How often the Ctrl+C channel is polled.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// What a key press in watch mode does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Toggle(ViewAction),
    Reset,
    Quit,
}

impl Key {
    pub fn parse(c: char) -> Option<Self> {
        Some(match c.to_ascii_lowercase() {
            'l' => Self::Toggle(ViewAction::ToggleLayout),
            'c' => Self::Toggle(ViewAction::ToggleCodePanel),
            'f' => Self::Toggle(ViewAction::ToggleFullscreen),
            'e' => Self::Toggle(ViewAction::ToggleErrorOverlay),
            'r' => Self::Reset,
            'q' => Self::Quit,
            _ => return None,
        })
    }
}

/// Run the interactive session until `q` or Ctrl+C.
pub async fn run_watch(
    config: &KitchenConfig,
    args: &SessionArgs,
    cwd: &Path,
    shutdown_rx: Receiver<()>,
) -> Result<()> {
    let sources = SourceFiles::new(&args.files, cwd);
    let files = sources.read()?;

    let provider = Arc::new(CommandProvider::new(
        config.preview.command.clone(),
        &config.preview.cache_dir,
    ));
    let document = Document::new();
    if let Some(target) = config.playground.portal_target() {
        document.add_target(target);
    }
    let playground = Playground::spawn(
        config.session_options(files),
        Arc::clone(&provider),
        document,
    );
    let session_id = playground.session_id().clone();

    // Watcher-first: changes during the initial build are not lost
    let (fs_tx, mut fs_rx) = mpsc::channel::<PathBuf>(64);
    let _watcher = watch_files(&sources, fs_tx)?;
    let mut keys = spawn_key_reader();
    let mut snapshots = playground.subscribe();
    let mut shutdown_poll = tokio::time::interval(SHUTDOWN_POLL);

    log!(
        "watch";
        "watching {} files (l layout, c code, f fullscreen, e errors, r reset, q quit)",
        sources.paths().len()
    );

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                report(&snapshot);
            }
            Some(path) = fs_rx.recv() => {
                crate::debug!("watch"; "changed: {}", sources.editor_path(&path));
                if let Some(files) = read_files(&sources) {
                    playground.edit(files).await?;
                }
            }
            Some(key) = keys.recv() => match key {
                Key::Quit => break,
                Key::Reset => {
                    if let Some(files) = read_files(&sources) {
                        playground.reset_initial(files).await?;
                    }
                }
                Key::Toggle(action) => {
                    if offers(&playground.snapshot(), action) {
                        playground.toggle(action).await?;
                    } else {
                        crate::debug!("watch"; "{} is not offered", action.label());
                    }
                }
            },
            _ = shutdown_poll.tick() => {
                if shutdown_rx.try_recv().is_ok() || crate::core::is_shutdown() {
                    break;
                }
            }
        }
    }

    playground.shutdown().await?;
    provider.forget(&session_id);
    Ok(())
}

/// Re-read the files from disk. A file caught mid-save (briefly missing)
/// is logged and skipped; the next event or key press reads again.
fn read_files(sources: &SourceFiles) -> Option<FileSet> {
    sources
        .read()
        .map_err(|e| crate::debug!("watch"; "{:#}", e))
        .ok()
}

/// Keys only act on controls the panel currently shows.
fn offers(snapshot: &Snapshot, action: ViewAction) -> bool {
    snapshot.chrome.control(action).is_some()
}

/// Print the snapshot as the single status block.
fn report(snapshot: &Snapshot) {
    let panel = render(snapshot);
    if snapshot.bundling {
        crate::logger::status_block(&panel);
    } else if snapshot.error.is_some() {
        crate::logger::status_error(&format!("build #{} failed", snapshot.revision), &panel);
    } else {
        crate::logger::status_success(&format!("build #{}\n{}", snapshot.revision, panel));
    }
}

/// Watch the parent directory of every file: editors often save by
/// replacing the file, which drops a watch placed on the file itself.
fn watch_files(sources: &SourceFiles, tx: mpsc::Sender<PathBuf>) -> Result<RecommendedWatcher> {
    let filter = sources.clone();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) if !event.kind.is_access() && !event.kind.is_other() => {
                for path in event.paths.into_iter().filter(|p| filter.contains(p)) {
                    // Full: a re-read is already queued
                    let _ = tx.try_send(path);
                }
            }
            Ok(_) => {}
            Err(e) => log!("watch"; "notify error: {}", e),
        }
    })
    .context("failed to create file watcher")?;

    let dirs: FxHashSet<&Path> = sources.paths().iter().filter_map(|p| p.parent()).collect();
    for dir in dirs {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
    }
    Ok(watcher)
}

/// Keys arrive line-buffered from stdin; every character counts.
fn spawn_key_reader() -> mpsc::Receiver<Key> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        while stdin.read_line(&mut line).is_ok_and(|n| n > 0) {
            for key in line.chars().filter_map(Key::parse) {
                if tx.blocking_send(key).is_err() {
                    return;
                }
            }
            line.clear();
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse('l'), Some(Key::Toggle(ViewAction::ToggleLayout)));
        assert_eq!(Key::parse('C'), Some(Key::Toggle(ViewAction::ToggleCodePanel)));
        assert_eq!(Key::parse('f'), Some(Key::Toggle(ViewAction::ToggleFullscreen)));
        assert_eq!(Key::parse('e'), Some(Key::Toggle(ViewAction::ToggleErrorOverlay)));
        assert_eq!(Key::parse('r'), Some(Key::Reset));
        assert_eq!(Key::parse('q'), Some(Key::Quit));
        assert_eq!(Key::parse('\n'), None);
        assert_eq!(Key::parse('x'), None);
    }

    #[test]
    fn test_read_files_skips_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let sources = SourceFiles::new(&[PathBuf::from("App.tsx")], temp.path());
        assert!(read_files(&sources).is_none());

        std::fs::write(temp.path().join("App.tsx"), "v1").unwrap();
        let files = read_files(&sources).unwrap();
        assert_eq!(files.get("App.tsx").unwrap().content, "v1");
    }

    #[test]
    fn test_error_key_needs_indicator() {
        use crate::core::SessionId;
        use crate::mount::Placement;
        use crate::provider::Failure;
        use crate::session::{reduce, SessionEvent, SessionOptions, SessionState};

        let options = SessionOptions::new(FileSet::empty());
        let state = SessionState::from_options(SessionId::from_raw("code-kitchen-keys"), &options);
        let snapshot_of = |state: &SessionState| {
            Snapshot::new(state, state.chrome(&options.appearance), Placement::InPlace)
        };

        let clean = snapshot_of(&state);
        assert!(!offers(&clean, ViewAction::ToggleErrorOverlay));
        assert!(offers(&clean, ViewAction::ToggleCodePanel));
        assert!(offers(&clean, ViewAction::ToggleFullscreen));

        let state = reduce(state, SessionEvent::DebounceFired(FileSet::empty()));
        let state = reduce(
            state,
            SessionEvent::BuildFinished { revision: 1, outcome: Err(Failure::build("boom")) },
        );
        assert!(offers(&snapshot_of(&state), ViewAction::ToggleErrorOverlay));
    }

    #[test]
    fn test_keys_match_render_hints() {
        for action in [
            ViewAction::ToggleLayout,
            ViewAction::ToggleCodePanel,
            ViewAction::ToggleFullscreen,
            ViewAction::ToggleErrorOverlay,
        ] {
            let key = super::super::render::key_for(action);
            assert_eq!(Key::parse(key), Some(Key::Toggle(action)));
        }
    }
}
