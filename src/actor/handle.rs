//! Playground handle: the host-facing side of a session actor.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::debouncer::Debouncer;
use super::messages::{SessionMsg, Snapshot};
use super::session::SessionActor;
use crate::core::{FileSet, SessionId};
use crate::mount::{Document, Presentation};
use crate::provider::PreviewProvider;
use crate::session::{SessionOptions, SessionState, ViewAction};

/// Command channel capacity; edits are coalesced by the debouncer anyway.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlaygroundError {
    #[error("playground session is closed")]
    Closed,
}

/// A mounted playground.
///
/// Dropping the handle disposes the session, same as [`Playground::shutdown`]
/// without waiting.
#[derive(Debug)]
pub struct Playground {
    session_id: SessionId,
    tx: mpsc::Sender<SessionMsg>,
    snapshot_rx: watch::Receiver<Snapshot>,
    /// Files as last sent; snapshots catch up once the actor has run.
    files: Mutex<FileSet>,
    task: JoinHandle<()>,
}

impl Playground {
    /// Mount a new session and start its first build. Needs a tokio runtime.
    pub fn spawn<P: PreviewProvider>(
        options: SessionOptions,
        provider: Arc<P>,
        document: Document,
    ) -> Self {
        let session_id = SessionId::generate();
        let state = SessionState::from_options(session_id.clone(), &options);
        let presentation = Presentation::new(document, options.portal.clone(), session_id.clone());

        let files = Mutex::new(options.initial_files.clone());
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let initial = Snapshot::new(
            &state,
            state.chrome(&options.appearance),
            presentation.placement(),
        );
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let actor = SessionActor::new(
            state,
            options.appearance,
            options.resolver,
            provider,
            Debouncer::new(options.debounce),
            presentation,
            rx,
            snapshot_tx,
        );
        let task = tokio::spawn(actor.run());

        crate::debug!("preview"; "session {} mounted", session_id);
        Self {
            session_id,
            tx,
            snapshot_rx,
            files,
            task,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Replace the whole file set (editor change).
    pub async fn edit(&self, files: impl Into<FileSet>) -> Result<(), PlaygroundError> {
        let files = files.into();
        self.send(SessionMsg::Edit(files.clone())).await?;
        *self.files.lock() = files;
        Ok(())
    }

    /// Push new initial files from the host.
    pub async fn reset_initial(&self, files: impl Into<FileSet>) -> Result<(), PlaygroundError> {
        let files = files.into();
        self.send(SessionMsg::ResetInitial(files.clone())).await?;
        *self.files.lock() = files;
        Ok(())
    }

    pub async fn toggle(&self, action: ViewAction) -> Result<(), PlaygroundError> {
        self.send(SessionMsg::Action(action)).await
    }

    /// Current file set, including an edit the actor has not applied yet.
    pub fn files(&self) -> FileSet {
        self.files.lock().clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Dispose the session and wait until teardown has finished.
    pub async fn shutdown(self) -> Result<(), PlaygroundError> {
        // Already gone is fine: the task is finishing or finished
        let _ = self.tx.send(SessionMsg::Shutdown).await;
        self.task.await.map_err(|_| PlaygroundError::Closed)
    }

    async fn send(&self, msg: SessionMsg) -> Result<(), PlaygroundError> {
        self.tx.send(msg).await.map_err(|_| PlaygroundError::Closed)
    }
}
