//! Wizard step ordering, transition rules, and advancement gates.
//!
//! The campaign wizard is a linear four-step sequence with no skipping and
//! no branching. Moving forward is gated by a per-step predicate over the
//! draft; moving backward is always allowed and never loses data.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::draft::CampaignDraft;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The four steps of the campaign wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    Recipients,
    Configuration,
    Summary,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 4;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 4;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::BasicInfo),
            2 => Ok(Self::Recipients),
            3 => Ok(Self::Configuration),
            4 => Ok(Self::Summary),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Recipients => 2,
            Self::Configuration => 3,
            Self::Summary => 4,
        }
    }

    /// User-facing label for the step (the product UI is French).
    pub fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "Informations",
            Self::Recipients => "Destinataires",
            Self::Configuration => "Configuration",
            Self::Summary => "Récapitulatif",
        }
    }

    /// The following step, or `None` at [`Summary`](Self::Summary).
    pub fn next(self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::Recipients),
            Self::Recipients => Some(Self::Configuration),
            Self::Configuration => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// The preceding step, or `None` at [`BasicInfo`](Self::BasicInfo).
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::BasicInfo => None,
            Self::Recipients => Some(Self::BasicInfo),
            Self::Configuration => Some(Self::Recipients),
            Self::Summary => Some(Self::Configuration),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.label(), self.to_number(), TOTAL_STEPS)
    }
}

/// Validate a step transition.
///
/// A transition is valid if the next step is exactly one step forward or
/// one step backward from the current step. Jumping more than one step in
/// either direction is not allowed.
pub fn validate_step_transition(current: WizardStep, next: WizardStep) -> Result<(), CoreError> {
    let diff = (next.to_number() as i16) - (current.to_number() as i16);
    if diff != 1 && diff != -1 {
        return Err(CoreError::Validation(format!(
            "Cannot transition from step {} to step {}. \
             Must advance or go back exactly one step.",
            current.to_number(),
            next.to_number()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recipient count state
// ---------------------------------------------------------------------------

/// The live recipient count used by the Recipients step gate.
///
/// The count is fail-closed: only a resolved, strictly positive count
/// permits leaving the Recipients step. A pending, failed, or never
/// requested count blocks advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "count", rename_all = "snake_case")]
pub enum RecipientCount {
    /// No count has been requested for the current filters.
    Unknown,
    /// A count request is in flight.
    Pending,
    /// The backend resolved the count for the current filters.
    Resolved(u64),
    /// The last count request failed.
    Failed,
}

impl RecipientCount {
    /// The resolved count, if any.
    pub fn resolved(&self) -> Option<u64> {
        match self {
            Self::Resolved(n) => Some(*n),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Advancement gates
// ---------------------------------------------------------------------------

/// Why the current step cannot be left, or `None` when advancement is
/// allowed.
///
/// Gates per step:
/// - `BasicInfo` — the campaign name must be non-empty (ignoring
///   surrounding whitespace).
/// - `Recipients` — the recipient count must be resolved and strictly
///   positive.
/// - `Configuration` — sender name and sender e-mail must be non-empty,
///   and the e-mail must have a valid shape.
/// - `Summary` — never blocked (terminal step).
pub fn blocked_reason(
    step: WizardStep,
    draft: &CampaignDraft,
    count: RecipientCount,
) -> Option<String> {
    match step {
        WizardStep::BasicInfo => {
            if draft.name.trim().is_empty() {
                Some("Le nom de la campagne est requis".to_string())
            } else {
                None
            }
        }
        WizardStep::Recipients => match count {
            RecipientCount::Resolved(n) if n > 0 => None,
            RecipientCount::Resolved(_) => {
                Some("Aucun destinataire ne correspond aux filtres".to_string())
            }
            RecipientCount::Pending => Some("Comptage des destinataires en cours…".to_string()),
            RecipientCount::Unknown | RecipientCount::Failed => {
                Some("Nombre de destinataires inconnu".to_string())
            }
        },
        WizardStep::Configuration => {
            if draft.sender_name.trim().is_empty() {
                Some("Le nom de l'expéditeur est requis".to_string())
            } else if draft.sender_email.trim().is_empty() {
                Some("L'adresse e-mail de l'expéditeur est requise".to_string())
            } else if !draft.sender_email.validate_email() {
                Some("L'adresse e-mail de l'expéditeur est invalide".to_string())
            } else {
                None
            }
        }
        WizardStep::Summary => None,
    }
}

/// Check whether the given step can be advanced with the current draft
/// and recipient count.
pub fn can_advance(step: WizardStep, draft: &CampaignDraft, count: RecipientCount) -> bool {
    blocked_reason(step, draft, count).is_none()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
