//! Wizard session: wiring of controller, autosave pump, and count
//! tracking for a host application.
//!
//! A session owns one controller for its whole lifetime. Collaborator
//! calls happen outside the controller lock; a failed collaborator call
//! never poisons the wizard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use relance_client::{CampaignSubmitter, DraftStore, RecipientCounter, SubmitReceipt};
use relance_core::draft::UpdateDraft;
use relance_core::types::{DbId, Timestamp};
use relance_core::wizard_step::WizardStep;

use crate::autosave::AutosavePump;
use crate::controller::WizardController;
use crate::count::CountTracker;
use crate::error::WizardError;
use crate::view::StepView;

/// One open campaign wizard.
///
/// Dropping the session without calling [`shutdown`](Self::shutdown)
/// leaves the autosave task running until its next cancellation check;
/// call `shutdown` to stop it deterministically.
pub struct WizardSession {
    controller: Arc<Mutex<WizardController>>,
    pump: Arc<AutosavePump>,
    tracker: CountTracker,
    submitter: Arc<dyn CampaignSubmitter>,
    cancel: CancellationToken,
    pump_handle: JoinHandle<()>,
}

impl WizardSession {
    /// Open a fresh wizard with an empty draft and start the autosave
    /// pump on the given interval.
    pub fn start(
        store: Arc<dyn DraftStore>,
        counter: Arc<dyn RecipientCounter>,
        submitter: Arc<dyn CampaignSubmitter>,
        autosave_interval: Duration,
    ) -> Self {
        Self::with_controller(
            WizardController::new(),
            store,
            counter,
            submitter,
            autosave_interval,
        )
    }

    /// Reopen a previously saved draft.
    pub async fn resume(
        store: Arc<dyn DraftStore>,
        counter: Arc<dyn RecipientCounter>,
        submitter: Arc<dyn CampaignSubmitter>,
        autosave_interval: Duration,
        draft_id: DbId,
    ) -> Result<Self, WizardError> {
        let draft = store.load(draft_id).await?;
        Ok(Self::with_controller(
            WizardController::resume(draft, draft_id),
            store,
            counter,
            submitter,
            autosave_interval,
        ))
    }

    fn with_controller(
        controller: WizardController,
        store: Arc<dyn DraftStore>,
        counter: Arc<dyn RecipientCounter>,
        submitter: Arc<dyn CampaignSubmitter>,
        autosave_interval: Duration,
    ) -> Self {
        let controller = Arc::new(Mutex::new(controller));
        let pump = Arc::new(AutosavePump::new(
            controller.clone(),
            store,
            autosave_interval,
        ));
        let tracker = CountTracker::new(controller.clone(), counter);

        let cancel = CancellationToken::new();
        let pump_handle = tokio::spawn({
            let pump = pump.clone();
            let cancel = cancel.clone();
            async move { pump.run(cancel).await }
        });

        Self {
            controller,
            pump,
            tracker,
            submitter,
            cancel,
            pump_handle,
        }
    }

    // -- draft -------------------------------------------------------------

    /// Merge a partial update into the draft. When a recipient filter
    /// changed, a count refresh is kicked off in the background; the
    /// count stays unresolved (blocking step 2) until it lands.
    pub async fn update(&self, update: UpdateDraft) {
        let filters_changed = {
            let mut controller = self.controller.lock().await;
            let changed = controller.update(update);
            if changed {
                // While the lock is held, so an in-flight response for
                // the old filters can no longer be applied.
                self.tracker.invalidate();
            }
            changed
        };
        if filters_changed {
            let tracker = self.tracker.clone();
            tokio::spawn(async move { tracker.refresh().await });
        }
    }

    /// Request a fresh recipient count and wait for it to resolve.
    pub async fn refresh_count(&self) {
        self.tracker.refresh().await;
    }

    // -- navigation --------------------------------------------------------

    /// Move one step forward, if the current step's gate allows it.
    pub async fn advance(&self) -> Result<WizardStep, WizardError> {
        let mut controller = self.controller.lock().await;
        controller.advance()?;
        Ok(controller.step())
    }

    /// Move one step backward. Always succeeds.
    pub async fn retreat(&self) -> WizardStep {
        let mut controller = self.controller.lock().await;
        controller.retreat();
        controller.step()
    }

    /// Build the view model for the current step.
    pub async fn render(&self) -> StepView {
        StepView::for_controller(&*self.controller.lock().await)
    }

    // -- persistence -------------------------------------------------------

    /// Save the draft immediately, returning the save timestamp.
    pub async fn save_now(&self) -> Result<Timestamp, WizardError> {
        Ok(self.pump.save_now().await?)
    }

    /// When the draft was last successfully saved, if ever.
    pub async fn last_saved(&self) -> Option<Timestamp> {
        self.pump.last_saved().await
    }

    /// The persisted draft id, once the first save allocated one.
    pub async fn draft_id(&self) -> Option<DbId> {
        self.controller.lock().await.draft_id()
    }

    // -- terminal actions --------------------------------------------------

    /// Send a test e-mail of the draft to a single address.
    pub async fn send_test(&self, to: &str) -> Result<(), WizardError> {
        let draft = self.controller.lock().await.draft().clone();
        Ok(self.submitter.send_test(&draft, to).await?)
    }

    /// Hand the complete draft to the submission collaborator.
    ///
    /// Only available from the summary step, with a draft that passes
    /// field validation. The wizard state is unchanged on failure so the
    /// user can retry.
    pub async fn submit(&self) -> Result<SubmitReceipt, WizardError> {
        let draft = {
            let controller = self.controller.lock().await;
            controller.ensure_submittable()?;
            controller.draft().clone()
        };
        Ok(self.submitter.submit(&draft).await?)
    }

    // -- lifecycle ---------------------------------------------------------

    /// Stop the autosave pump and wait for its task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.pump_handle.await;
    }
}
