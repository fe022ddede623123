//! Generation-guarded recipient count refresh.
//!
//! Every filter change makes the live count stale; [`CountTracker`]
//! requests a fresh count from the [`RecipientCounter`] collaborator and
//! applies the response only if no newer request was issued in the
//! meantime. Responses arriving out of order (or after the wizard moved
//! on) are discarded rather than applied.
//!
//! Counting is fail-closed: a failed request leaves the count in
//! [`RecipientCount::Failed`], which blocks the Recipients step.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use relance_client::RecipientCounter;
use relance_core::wizard_step::RecipientCount;

use crate::controller::WizardController;

/// Refreshes the controller's recipient count from the counting
/// collaborator. Cheap to clone; clones share the generation counter.
#[derive(Clone)]
pub struct CountTracker {
    controller: Arc<Mutex<WizardController>>,
    counter: Arc<dyn RecipientCounter>,
    generation: Arc<AtomicU64>,
}

impl CountTracker {
    pub fn new(
        controller: Arc<Mutex<WizardController>>,
        counter: Arc<dyn RecipientCounter>,
    ) -> Self {
        Self {
            controller,
            counter,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Mark any in-flight request as stale without issuing a new one.
    ///
    /// Call this when the filters change, while the controller lock is
    /// still held: a response for the old filters must not be applied in
    /// the window before the next [`refresh`](Self::refresh) starts.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Request a fresh count for the draft's current filters and apply it
    /// to the controller, unless a newer request superseded this one.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let filters = {
            let mut controller = self.controller.lock().await;
            controller.set_count(RecipientCount::Pending);
            controller.draft().filters.clone()
        };

        let result = self.counter.count(&filters).await;

        let mut controller = self.controller.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding stale recipient count response");
            return;
        }

        match result {
            Ok(count) => {
                tracing::debug!(count, "Recipient count resolved");
                controller.set_count(RecipientCount::Resolved(count));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recipient count failed");
                controller.set_count(RecipientCount::Failed);
            }
        }
    }
}
