//! Process-wide shutdown state.
//!
//! Ctrl+C sets `SHUTDOWN` and, once a session is running, notifies it through
//! the registered channel so it can tear down (cache dir, mount, pending
//! builds) instead of dying mid-build.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the running session
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `register_shutdown()`: exit immediately, nothing to clean up
/// - After: notify the session loop and let it finish
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        match SHUTDOWN_TX.get() {
            Some(tx) => {
                crate::log!("watch"; "shutting down...");
                let _ = tx.send(());
            }
            None => std::process::exit(130),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the channel Ctrl+C is delivered on.
///
/// Returns false if one was already registered.
pub fn register_shutdown(shutdown_tx: crossbeam::channel::Sender<()>) -> bool {
    SHUTDOWN_TX.set(shutdown_tx).is_ok()
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
