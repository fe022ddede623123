//! Timer-driven draft autosave.
//!
//! [`AutosavePump`] runs as a background task while the wizard is open,
//! snapshotting the draft on a fixed interval and handing it to the
//! [`DraftStore`]. Tick failures are logged and otherwise silent — no
//! retry, the next tick simply sends fresher data. A manual
//! [`save_now`](AutosavePump::save_now) shares the same path but returns
//! its result so explicit user actions can surface errors.
//!
//! Overlapping saves (a tick racing a manual save) are not serialized;
//! the store applies last-write-wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use relance_client::{ClientError, DraftStore};
use relance_core::types::Timestamp;

use crate::controller::WizardController;

/// How often the pump persists the draft.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Background service persisting the wizard draft on a periodic basis.
pub struct AutosavePump {
    controller: Arc<Mutex<WizardController>>,
    store: Arc<dyn DraftStore>,
    interval: Duration,
    last_saved: Mutex<Option<Timestamp>>,
}

impl AutosavePump {
    /// Create a pump observing the given controller.
    pub fn new(
        controller: Arc<Mutex<WizardController>>,
        store: Arc<dyn DraftStore>,
        interval: Duration,
    ) -> Self {
        Self {
            controller,
            store,
            interval,
            last_saved: Mutex::new(None),
        }
    }

    /// Run the autosave loop.
    ///
    /// The first save happens one full interval after start (a freshly
    /// mounted wizard has nothing worth saving). The loop exits when the
    /// provided [`CancellationToken`] is cancelled; an in-flight save is
    /// allowed to finish or be dropped with the task.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        // interval fires immediately; consume the first tick.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Autosave pump cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.persist().await {
                        // Silent for the user: only the last-saved
                        // timestamp fails to move forward.
                        tracing::warn!(error = %e, "Autosave failed");
                    }
                }
            }
        }
    }

    /// Persist the draft immediately, outside the timer schedule.
    ///
    /// Same fire-and-forget semantics as a tick, but the result is
    /// returned so the caller can show an explicit error.
    pub async fn save_now(&self) -> Result<Timestamp, ClientError> {
        self.persist().await
    }

    /// When the last successful save completed, if any.
    pub async fn last_saved(&self) -> Option<Timestamp> {
        *self.last_saved.lock().await
    }

    /// Snapshot the draft and hand it to the store. The controller lock is
    /// held only for the clone, never across the network call.
    async fn persist(&self) -> Result<Timestamp, ClientError> {
        let (draft, draft_id) = {
            let controller = self.controller.lock().await;
            (controller.draft().clone(), controller.draft_id())
        };

        let saved_id = self.store.save(&draft, draft_id).await?;

        {
            let mut controller = self.controller.lock().await;
            controller.set_draft_id(Some(saved_id));
        }

        let now = Utc::now();
        *self.last_saved.lock().await = Some(now);
        tracing::debug!(draft_id = saved_id, "Draft autosaved");
        Ok(now)
    }
}
