//! `kitchen build`: one preview build, printed to stdout.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};

use super::SessionArgs;
use super::files::SourceFiles;
use crate::actor::{Playground, Snapshot};
use crate::config::KitchenConfig;
use crate::mount::Document;
use crate::provider::CommandProvider;

/// Build once and print the rendered output.
///
/// Exits non-zero (via the returned error) when the build fails.
pub async fn run_build(config: &KitchenConfig, args: &SessionArgs, cwd: &Path) -> Result<()> {
    let sources = SourceFiles::new(&args.files, cwd);
    let files = sources.read()?;
    crate::debug!("preview"; "building {} files", files.len());

    let provider = Arc::new(CommandProvider::new(
        config.preview.command.clone(),
        &config.preview.cache_dir,
    ));
    let playground = Playground::spawn(
        config.session_options(files),
        Arc::clone(&provider),
        Document::new(),
    );
    let session_id = playground.session_id().clone();

    let snapshot = first_result(&playground).await;
    playground.shutdown().await?;
    provider.forget(&session_id);

    let snapshot = snapshot?;
    if let Some(failure) = &snapshot.error {
        bail!("{}", failure);
    }
    match snapshot.preview.renderable() {
        Some(renderable) => println!("{}", renderable.output()),
        None => crate::debug!("preview"; "build produced no output"),
    }
    Ok(())
}

async fn first_result(playground: &Playground) -> Result<Snapshot> {
    let mut rx = playground.subscribe();
    let snapshot = rx
        .wait_for(|s| s.revision >= 1 && !s.bundling)
        .await
        .map_err(|_| anyhow!("session closed before the first build finished"))?
        .clone();
    Ok(snapshot)
}
