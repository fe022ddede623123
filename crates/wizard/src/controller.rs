//! The wizard controller: draft ownership and step sequencing.
//!
//! One controller instance exists per wizard session and exclusively owns
//! the [`CampaignDraft`] for that session's lifetime. Background tasks
//! share it behind `Arc<tokio::sync::Mutex<_>>`; the controller itself has
//! no interior mutability and no side effects beyond its own state.

use validator::Validate;

use relance_core::draft::{CampaignDraft, UpdateDraft};
use relance_core::error::CoreError;
use relance_core::types::DbId;
use relance_core::wizard_step::{self, RecipientCount, WizardStep};

use crate::error::WizardError;

/// Owns the campaign draft, the current step, the latest recipient count,
/// and the persisted draft id (allocated by the store on first save).
#[derive(Debug)]
pub struct WizardController {
    draft: CampaignDraft,
    step: WizardStep,
    count: RecipientCount,
    draft_id: Option<DbId>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Start a fresh wizard with an empty draft at the first step.
    pub fn new() -> Self {
        Self {
            draft: CampaignDraft::default(),
            step: WizardStep::BasicInfo,
            count: RecipientCount::Unknown,
            draft_id: None,
        }
    }

    /// Resume from a previously saved draft. The wizard restarts at the
    /// first step with the loaded data; the recipient count is unknown
    /// until re-requested.
    pub fn resume(draft: CampaignDraft, draft_id: DbId) -> Self {
        Self {
            draft,
            step: WizardStep::BasicInfo,
            count: RecipientCount::Unknown,
            draft_id: Some(draft_id),
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn count(&self) -> RecipientCount {
        self.count
    }

    pub fn draft_id(&self) -> Option<DbId> {
        self.draft_id
    }

    /// Record the id allocated by the draft store.
    pub fn set_draft_id(&mut self, id: Option<DbId>) {
        self.draft_id = id;
    }

    /// Record a resolved (or failed) recipient count.
    pub fn set_count(&mut self, count: RecipientCount) {
        self.count = count;
    }

    // -- gating ------------------------------------------------------------

    /// Why the current step cannot be left, or `None` if it can.
    pub fn blocked_reason(&self) -> Option<String> {
        wizard_step::blocked_reason(self.step, &self.draft, self.count)
    }

    /// Whether the current step's gate allows advancement.
    pub fn can_advance(&self) -> bool {
        self.blocked_reason().is_none()
    }

    // -- transitions -------------------------------------------------------

    /// Move one step forward if the current step's gate allows it.
    ///
    /// A no-op `Ok` at the last step (there is nothing after the summary).
    pub fn advance(&mut self) -> Result<(), WizardError> {
        let Some(next) = self.step.next() else {
            return Ok(());
        };
        if let Some(reason) = self.blocked_reason() {
            return Err(WizardError::StepBlocked {
                step: self.step,
                reason,
            });
        }
        self.step = next;
        Ok(())
    }

    /// Move one step backward. Always allowed; never touches the draft.
    /// A no-op at the first step.
    pub fn retreat(&mut self) {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
    }

    // -- mutation ----------------------------------------------------------

    /// Merge a partial update into the draft. No validation happens here;
    /// the gates re-derive validity lazily.
    ///
    /// When any recipient filter changed, the live count is reset to
    /// [`RecipientCount::Unknown`] (fail-closed until a fresh count
    /// resolves) and `true` is returned so the caller can request one.
    pub fn update(&mut self, update: UpdateDraft) -> bool {
        let filters_changed = self.draft.apply(update);
        if filters_changed {
            self.count = RecipientCount::Unknown;
        }
        filters_changed
    }

    // -- submission --------------------------------------------------------

    /// Check that the wizard is at the summary step and the whole draft
    /// passes field validation, without submitting anything.
    pub fn ensure_submittable(&self) -> Result<(), WizardError> {
        if self.step != WizardStep::Summary {
            return Err(WizardError::NotOnSummary { step: self.step });
        }
        self.draft
            .validate()
            .map_err(|e| WizardError::Core(CoreError::Validation(e.to_string())))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
