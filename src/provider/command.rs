//! Command-backed preview provider.
//!
//! Stages the file set under `<cache_dir>/<session_id>/<revision>/`, checks
//! every bare import against the resolver, writes the resolution table to
//! `imports.json` and runs the configured command inside the stage:
//!
//! - exit 0: stdout is the renderable output
//! - non-zero exit: stderr (or stdout) is the build failure, verbatim
//!
//! Successful builds are memoized per session on the file-set fingerprint:
//! unchanged content is answered from the memo, a failure is retried.

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use super::{BuildRequest, Failure, PreviewProvider, Renderable, ResolvedModule, bare_specifiers};
use crate::core::{FileSet, Fingerprint, SessionId};
use crate::utils::exec::{Cmd, failure_text};
use crate::utils::path::contained_relative;

/// Resolution table written next to the staged files.
pub const IMPORTS_FILE: &str = "imports.json";
/// Environment variable carrying the session id.
pub const SESSION_ENV: &str = "KITCHEN_SESSION";
/// Environment variable carrying the build revision.
pub const REVISION_ENV: &str = "KITCHEN_REVISION";

/// Runs a shell command per build.
pub struct CommandProvider {
    command: Vec<String>,
    cache_dir: PathBuf,
    /// Session → last successful (fingerprint, output).
    memo: DashMap<SessionId, (Fingerprint, Renderable)>,
}

impl CommandProvider {
    pub fn new(command: Vec<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            cache_dir: cache_dir.into(),
            memo: DashMap::new(),
        }
    }

    /// Directory namespacing all builds of one session.
    pub fn session_dir(&self, session: &SessionId) -> PathBuf {
        self.cache_dir.join(session.as_str())
    }

    /// Drop everything cached for a session (called on teardown).
    pub fn forget(&self, session: &SessionId) {
        self.memo.remove(session);
        let _ = fs::remove_dir_all(self.session_dir(session));
    }

    fn cached(&self, session: &SessionId, fingerprint: Fingerprint) -> Option<Renderable> {
        self.memo
            .get(session)
            .filter(|entry| entry.0 == fingerprint)
            .map(|entry| entry.1.clone())
    }
}

impl PreviewProvider for CommandProvider {
    async fn build(&self, request: BuildRequest) -> Result<Renderable, Failure> {
        if self.command.is_empty() {
            return Err(Failure::build("no preview command configured"));
        }

        let fingerprint = request.files.fingerprint();
        if let Some(hit) = self.cached(&request.session_id, fingerprint) {
            crate::debug!("preview"; "cache hit {} @{}", request.session_id, fingerprint);
            return Ok(hit);
        }

        // Resolver failures are build failures
        let modules = bare_specifiers(&request.files)
            .iter()
            .map(|specifier| request.resolver.resolve(specifier))
            .collect::<Result<Vec<_>, _>>()?;

        let stage = self
            .session_dir(&request.session_id)
            .join(request.revision.to_string());
        let job = StagedBuild {
            command: self.command.clone(),
            stage,
            files: request.files.clone(),
            modules,
            session: request.session_id.clone(),
            revision: request.revision,
        };

        let renderable = tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| Failure::Crashed(e.to_string()))??;

        self.memo
            .insert(request.session_id, (fingerprint, renderable.clone()));
        Ok(renderable)
    }
}

// =============================================================================
// Staged Build
// =============================================================================

/// One build, owned by a blocking worker.
struct StagedBuild {
    command: Vec<String>,
    stage: PathBuf,
    files: FileSet,
    modules: Vec<ResolvedModule>,
    session: SessionId,
    revision: u64,
}

impl StagedBuild {
    fn run(self) -> Result<Renderable, Failure> {
        let result = self.stage_files().and_then(|()| self.execute());
        // Stage is per revision; nothing reads it after the command exits
        let _ = fs::remove_dir_all(&self.stage);
        result
    }

    fn stage_files(&self) -> Result<(), Failure> {
        let _ = fs::remove_dir_all(&self.stage);
        fs::create_dir_all(&self.stage).map_err(|e| io_failure("create", &self.stage, e))?;

        for file in &self.files {
            let relative = contained_relative(&file.path)
                .ok_or_else(|| Failure::build(format!("invalid file path `{}`", file.path)))?;
            let target = self.stage.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| io_failure("create", parent, e))?;
            }
            fs::write(&target, &file.content).map_err(|e| io_failure("write", &target, e))?;
        }

        let imports = self.stage.join(IMPORTS_FILE);
        let table = serde_json::to_string_pretty(&self.modules)
            .map_err(|e| Failure::build(format!("failed to encode {IMPORTS_FILE}: {e}")))?;
        fs::write(&imports, table).map_err(|e| io_failure("write", &imports, e))
    }

    fn execute(&self) -> Result<Renderable, Failure> {
        let cmd = Cmd::from_slice(self.command.as_slice())
            .cwd(&self.stage)
            .envs([
                (SESSION_ENV, self.session.to_string()),
                (REVISION_ENV, self.revision.to_string()),
            ]);
        let name = cmd.program_name();

        let output = cmd
            .output()
            .map_err(|e| Failure::build(format!("failed to run `{name}`: {e}")))?;

        if output.status.success() {
            Ok(Renderable::new(
                String::from_utf8_lossy(&output.stdout).into_owned(),
            ))
        } else {
            Err(Failure::build(failure_text(&name, &output)))
        }
    }
}

fn io_failure(action: &str, path: &Path, err: std::io::Error) -> Failure {
    Failure::build(format!("failed to {action} `{}`: {err}", path.display()))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::InputFile;
    use crate::provider::Resolver;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    fn request(session: &SessionId, revision: u64, files: FileSet) -> BuildRequest {
        BuildRequest {
            session_id: session.clone(),
            revision,
            files,
            resolver: Resolver::none(),
        }
    }

    fn app(content: &str) -> FileSet {
        FileSet::new(vec![InputFile::new("a.tsx", content)])
    }

    #[tokio::test]
    async fn test_stdout_becomes_renderable() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("cat a.tsx"), cache.path());
        let session = SessionId::generate();

        let out = provider
            .build(request(&session, 1, app("export default () => null")))
            .await
            .unwrap();
        assert_eq!(out.output(), "export default () => null");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_build_failure() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("echo 'Unexpected token (1:7)' >&2; exit 1"), cache.path());
        let session = SessionId::generate();

        let err = provider.build(request(&session, 1, app("x"))).await.unwrap_err();
        assert_eq!(err, Failure::build("Unexpected token (1:7)"));
    }

    #[tokio::test]
    async fn test_unresolved_import_is_resolve_failure() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("true"), cache.path());
        let session = SessionId::generate();

        let err = provider
            .build(request(&session, 1, app(r#"import React from "react";"#)))
            .await
            .unwrap_err();
        assert_eq!(err, Failure::resolve("react"));
    }

    #[tokio::test]
    async fn test_imports_table_written() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("cat imports.json"), cache.path());
        let session = SessionId::generate();

        let mut map = BTreeMap::new();
        map.insert("react".to_string(), "vendor/react.js".to_string());
        let mut req = request(&session, 1, app(r#"import React from "react";"#));
        req.resolver = Resolver::from_map(map);

        let out = provider.build(req).await.unwrap();
        let table: Vec<ResolvedModule> = serde_json::from_str(out.output()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].location, "vendor/react.js");
    }

    #[tokio::test]
    async fn test_memoized_per_session() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("printf \"$KITCHEN_REVISION\""), cache.path());
        let session = SessionId::generate();

        let first = provider.build(request(&session, 1, app("x"))).await.unwrap();
        let again = provider.build(request(&session, 2, app("x"))).await.unwrap();
        assert_eq!(first.output(), "1");
        assert_eq!(again.output(), "1");

        let changed = provider.build(request(&session, 3, app("y"))).await.unwrap();
        assert_eq!(changed.output(), "3");

        // Another session never sees this session's memo
        let other = SessionId::generate();
        let fresh = provider.build(request(&other, 7, app("y"))).await.unwrap();
        assert_eq!(fresh.output(), "7");
    }

    #[tokio::test]
    async fn test_path_escape_rejected() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("true"), cache.path());
        let session = SessionId::generate();
        let files = FileSet::new(vec![InputFile::new("../escape.tsx", "x")]);

        let err = provider.build(request(&session, 1, files)).await.unwrap_err();
        assert_eq!(err, Failure::build("invalid file path `../escape.tsx`"));
    }

    #[tokio::test]
    async fn test_stage_removed_after_build() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(sh("true"), cache.path());
        let session = SessionId::generate();

        provider.build(request(&session, 1, app("x"))).await.unwrap();
        assert!(!provider.session_dir(&session).join("1").exists());

        provider.forget(&session);
        assert!(!provider.session_dir(&session).exists());
    }

    #[tokio::test]
    async fn test_empty_command() {
        let cache = TempDir::new().unwrap();
        let provider = CommandProvider::new(Vec::new(), cache.path());
        let err = provider
            .build(request(&SessionId::generate(), 1, app("x")))
            .await
            .unwrap_err();
        assert_eq!(err.label(), "build");
    }
}
