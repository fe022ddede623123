use relance_client::ClientError;
use relance_core::error::CoreError;
use relance_core::wizard_step::WizardStep;

/// Errors surfaced by the wizard engine.
///
/// Collaborator failures are wrapped, never panicked on; the wizard stays
/// usable after any of these.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// The current step's gate rejected advancement.
    #[error("Step {step} is blocked: {reason}")]
    StepBlocked { step: WizardStep, reason: String },

    /// Submission was attempted before reaching the summary step.
    #[error("Cannot submit from step {step}: the summary step must be reached first")]
    NotOnSummary { step: WizardStep },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
