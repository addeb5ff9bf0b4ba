//! Session Actor
//!
//! Owns one playground session. Every state transition happens here, in
//! response to one of three event sources:
//!
//! ```text
//! SessionMsg (edit / reset / action) ─┐
//! Debouncer deadline ─────────────────┼─► reduce ─► publish Snapshot
//! BuildDone (JoinSet) ────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, sleep};

use super::debouncer::Debouncer;
use super::messages::{BuildDone, SessionMsg, Snapshot};
use crate::core::FileSet;
use crate::mount::Presentation;
use crate::provider::{BuildRequest, Failure, PreviewProvider, Resolver};
use crate::session::{Appearance, SessionEvent, SessionState, reduce};

/// Session Actor - drives one playground
pub struct SessionActor<P: PreviewProvider> {
    /// Session state; replaced wholesale by `reduce`
    state: SessionState,
    appearance: Appearance,
    resolver: Resolver,
    provider: Arc<P>,
    /// Edits waiting for quiescence
    debouncer: Debouncer<FileSet>,
    /// Fullscreen container ownership
    presentation: Presentation,
    rx: mpsc::Receiver<SessionMsg>,
    snapshot_tx: watch::Sender<Snapshot>,
    /// In-flight provider calls
    builds: JoinSet<BuildDone>,
}

impl<P: PreviewProvider> SessionActor<P> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: SessionState,
        appearance: Appearance,
        resolver: Resolver,
        provider: Arc<P>,
        debouncer: Debouncer<FileSet>,
        presentation: Presentation,
        rx: mpsc::Receiver<SessionMsg>,
        snapshot_tx: watch::Sender<Snapshot>,
    ) -> Self {
        Self {
            state,
            appearance,
            resolver,
            provider,
            debouncer,
            presentation,
            rx,
            snapshot_tx,
            builds: JoinSet::new(),
        }
    }

    /// Run the actor event loop until shutdown or until every handle is gone.
    pub async fn run(mut self) {
        // Initial build of the starting files
        let initial = self.state.files.clone();
        self.start_build(initial);
        self.publish();

        loop {
            let wait = self.debouncer.sleep_duration(Instant::now());
            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(SessionMsg::Shutdown) | None => break,
                    Some(msg) => self.handle(msg),
                },
                Some(joined) = self.builds.join_next(), if !self.builds.is_empty() => {
                    // Outer tasks only fail when aborted
                    if let Ok(done) = joined {
                        self.finish_build(done);
                    }
                }
                _ = sleep(wait) => {
                    if let Some(files) = self.debouncer.take_if_ready(Instant::now()) {
                        self.start_build(files);
                        self.publish();
                    }
                }
            }
        }

        self.teardown();
    }

    fn handle(&mut self, msg: SessionMsg) {
        match msg {
            SessionMsg::Edit(files) => {
                self.debouncer.push(files.clone(), Instant::now());
                self.apply(SessionEvent::Edit(files));
            }
            SessionMsg::ResetInitial(files) => {
                // Pending edits belong to the old baseline
                if self.debouncer.cancel().is_some() {
                    crate::debug!("preview"; "reset dropped a pending edit");
                }
                self.debouncer.push(files.clone(), Instant::now());
                self.apply(SessionEvent::ResetInitial(files));
            }
            SessionMsg::Action(action) => {
                crate::debug!("preview"; "toggle {}", action.label());
                self.apply(SessionEvent::Toggle(action));
                if let Err(e) = self.presentation.sync(self.state.view.fullscreen) {
                    crate::log!("mount"; "{}", e);
                }
            }
            // Handled by the run loop
            SessionMsg::Shutdown => return,
        }
        self.publish();
    }

    /// Hand a quiescent file set to the provider.
    ///
    /// Unchanged content still gets a new revision: a failed build is retried
    /// by saving again, and dedup of successes is the provider's memo.
    fn start_build(&mut self, files: FileSet) {
        self.apply(SessionEvent::DebounceFired(files.clone()));
        let revision = self.state.revision;
        self.apply(SessionEvent::BuildStarted { revision });
        crate::debug!(
            "preview";
            "build #{} started ({} files @{})",
            revision,
            files.len(),
            files.fingerprint()
        );

        let request = BuildRequest {
            session_id: self.state.session_id.clone(),
            revision,
            files,
            resolver: self.resolver.clone(),
        };
        let provider = Arc::clone(&self.provider);
        self.builds.spawn(async move {
            // Inner task turns a provider panic into a failure for this revision
            let mut task = AbortOnDrop(tokio::spawn(async move { provider.build(request).await }));
            let outcome = match (&mut task.0).await {
                Ok(outcome) => outcome,
                Err(e) => Err(Failure::Crashed(e.to_string())),
            };
            BuildDone { revision, outcome }
        });
    }

    fn finish_build(&mut self, done: BuildDone) {
        if !self.state.is_current(done.revision) {
            crate::debug!(
                "preview";
                "discarding stale build #{} (current #{})",
                done.revision,
                self.state.revision
            );
            return;
        }

        match &done.outcome {
            Ok(_) => crate::debug!("preview"; "build #{} rendered", done.revision),
            Err(e) => crate::debug!("preview"; "build #{} failed: {}", done.revision, e.label()),
        }
        self.apply(SessionEvent::BuildFinished {
            revision: done.revision,
            outcome: done.outcome,
        });
        self.publish();
    }

    fn apply(&mut self, event: SessionEvent) {
        self.state = reduce(self.state.clone(), event);
    }

    fn publish(&self) {
        let chrome = self.state.chrome(&self.appearance);
        let snapshot = Snapshot::new(&self.state, chrome, self.presentation.placement());
        self.snapshot_tx.send_replace(snapshot);
    }

    /// Dispose: nothing pending fires, no build result lands, no container
    /// outlives the session.
    fn teardown(mut self) {
        self.debouncer.cancel();
        self.builds.abort_all();
        self.presentation.release();

        let chrome = self.state.chrome(&self.appearance);
        let mut snapshot = Snapshot::new(&self.state, chrome, self.presentation.placement());
        snapshot.closed = true;
        self.snapshot_tx.send_replace(snapshot);
        crate::debug!("preview"; "session {} closed", self.state.session_id);
    }
}

/// Aborts the provider task when the owning build is aborted.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
