//! The single wall-build session held by a server process.
//!
//! All requests go through one `tokio::sync::RwLock`, which is the only
//! serialization point. Initialize builds the new sequencer before taking
//! the lock, so a failed Initialize leaves the previous session untouched
//! and a successful one replaces it wholesale. Generation and partitioning
//! run on the blocking pool.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::{ReachEnvelope, WallConfig};
use crate::error::{Result, WallError};
use crate::sequencer::{AdvanceOutcome, BuildProgress, BuildSequencer};
use crate::wall::WallSnapshot;

/// Shared slot for the active sequencer; `None` until the first Initialize
pub type WallSessionStore = Arc<RwLock<Option<BuildSequencer>>>;

/// Create an empty session store
pub fn new_wall_session_store() -> WallSessionStore {
    Arc::new(RwLock::new(None))
}

/// Handle to the session, cheap to clone into request handlers.
#[derive(Clone)]
pub struct WallSession {
    store: WallSessionStore,
    reach: ReachEnvelope,
}

impl WallSession {
    pub fn new(reach: ReachEnvelope) -> Self {
        Self {
            store: new_wall_session_store(),
            reach,
        }
    }

    pub fn reach(&self) -> ReachEnvelope {
        self.reach
    }

    /// Start a new session, discarding any previous one.
    pub async fn initialize(&self, config: WallConfig) -> Result<WallSnapshot> {
        let reach = self.reach;
        let sequencer = off_runtime(move || BuildSequencer::init(config, reach)).await?;
        let snapshot = sequencer.snapshot();

        let previous = self.store.write().await.replace(sequencer);
        if let Some(previous) = previous {
            info!(session_id = %previous.session_id(), "Replaced wall session");
        }
        Ok(snapshot)
    }

    pub async fn advance(&self) -> Result<AdvanceOutcome> {
        let mut store = self.store.write().await;
        let sequencer = store.as_mut().ok_or(WallError::NotInitialized)?;
        sequencer.advance()
    }

    /// Start the current configuration over from the first brick.
    pub async fn reset(&self) -> Result<WallSnapshot> {
        let mut store = self.store.write().await;
        let current = store.as_ref().ok_or(WallError::NotInitialized)?.clone();
        let replaced = current.session_id();
        let fresh = off_runtime(move || current.reset()).await?;
        info!(
            session_id = %fresh.session_id(),
            %replaced,
            "Reset wall session"
        );
        let snapshot = fresh.snapshot();
        *store = Some(fresh);
        Ok(snapshot)
    }

    pub async fn progress(&self) -> Result<(BuildProgress, WallSnapshot)> {
        let store = self.store.read().await;
        let sequencer = store.as_ref().ok_or(WallError::NotInitialized)?;
        Ok((sequencer.progress(), sequencer.snapshot()))
    }

    pub async fn is_initialized(&self) -> bool {
        self.store.read().await.is_some()
    }
}

/// Run a sequencer build on the blocking pool.
async fn off_runtime<F>(build: F) -> Result<BuildSequencer>
where
    F: FnOnce() -> Result<BuildSequencer> + Send + 'static,
{
    tokio::task::spawn_blocking(build)
        .await
        .map_err(|e| WallError::Internal(format!("wall build task failed: {e}")))?
}
