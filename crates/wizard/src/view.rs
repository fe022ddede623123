//! Per-step view models.
//!
//! [`StepView`] is a pure mapping from controller state to the data each
//! step's form needs — nothing more. Rendering (terminal, web, ...) is the
//! host application's concern.

use serde::Serialize;

use relance_core::draft::{CampaignDraft, EmailProvider, RecipientFilterSet};
use relance_core::types::DbId;
use relance_core::wizard_step::{RecipientCount, WizardStep, TOTAL_STEPS};

use crate::controller::WizardController;

/// Snapshot of the wizard UI state for the current step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    /// 1-based step number.
    pub step_number: u8,
    /// Total number of steps, for "step x of y" chrome.
    pub total_steps: u8,
    /// User-facing step label.
    pub label: &'static str,
    /// Whether the next button is enabled.
    pub can_advance: bool,
    /// Why the next button is disabled, when it is.
    pub blocked_reason: Option<String>,
    /// Step-specific form data.
    pub body: StepBody,
}

/// Step-specific view data; each variant carries only what its form needs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepBody {
    BasicInfo {
        name: String,
        description: Option<String>,
        product_id: Option<DbId>,
        template_id: Option<DbId>,
    },
    Recipients {
        filters: RecipientFilterSet,
        count: RecipientCount,
        /// User-facing count summary, e.g. "42 destinataires".
        count_label: String,
        /// Ids present in both the include and exclude lists, surfaced as
        /// a warning without blocking.
        overlapping_ids: Vec<DbId>,
    },
    Configuration {
        batch_size: u32,
        batch_delay_secs: u32,
        sender_name: String,
        sender_email: String,
        provider: EmailProvider,
    },
    Summary {
        draft: CampaignDraft,
    },
}

impl StepView {
    /// Build the view for the controller's current step.
    pub fn for_controller(controller: &WizardController) -> Self {
        let step = controller.step();
        let draft = controller.draft();
        let blocked_reason = controller.blocked_reason();

        let body = match step {
            WizardStep::BasicInfo => StepBody::BasicInfo {
                name: draft.name.clone(),
                description: draft.description.clone(),
                product_id: draft.product_id,
                template_id: draft.template_id,
            },
            WizardStep::Recipients => StepBody::Recipients {
                filters: draft.filters.clone(),
                count: controller.count(),
                count_label: count_label(controller.count()),
                overlapping_ids: draft.filters.overlapping_ids(),
            },
            WizardStep::Configuration => StepBody::Configuration {
                batch_size: draft.batch_size,
                batch_delay_secs: draft.batch_delay_secs,
                sender_name: draft.sender_name.clone(),
                sender_email: draft.sender_email.clone(),
                provider: draft.provider,
            },
            WizardStep::Summary => StepBody::Summary {
                draft: draft.clone(),
            },
        };

        Self {
            step_number: step.to_number(),
            total_steps: TOTAL_STEPS,
            label: step.label(),
            can_advance: blocked_reason.is_none(),
            blocked_reason,
            body,
        }
    }
}

/// User-facing summary of the recipient count state.
pub fn count_label(count: RecipientCount) -> String {
    match count {
        RecipientCount::Resolved(1) => "1 destinataire".to_string(),
        RecipientCount::Resolved(n) if n > 0 => format!("{n} destinataires"),
        RecipientCount::Resolved(_) => "Aucun destinataire".to_string(),
        RecipientCount::Pending => "Comptage en cours…".to_string(),
        RecipientCount::Unknown | RecipientCount::Failed => {
            "Nombre de destinataires inconnu".to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
