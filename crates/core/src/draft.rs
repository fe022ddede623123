//! Campaign draft aggregate and recipient filter set.
//!
//! [`CampaignDraft`] is the whole form state of the campaign wizard: it is
//! created empty (or hydrated from a previously saved draft), mutated in
//! place through [`UpdateDraft`] merges, and handed whole to the submission
//! collaborator when the user completes the last step.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

/// Default number of recipients per send batch.
pub const DEFAULT_BATCH_SIZE: u32 = 50;

/// Default pause between batches, in seconds.
pub const DEFAULT_BATCH_DELAY_SECS: u32 = 60;

// ---------------------------------------------------------------------------
// Target type
// ---------------------------------------------------------------------------

/// What kind of CRM entity a campaign targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Organisations,
    Contacts,
}

impl TargetType {
    /// Parse a target type string from the backend.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "organisations" => Ok(Self::Organisations),
            "contacts" => Ok(Self::Contacts),
            _ => Err(CoreError::Validation(format!(
                "Invalid target type '{s}'. Must be one of: organisations, contacts"
            ))),
        }
    }

    /// Convert to a backend-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organisations => "organisations",
            Self::Contacts => "contacts",
        }
    }
}

// ---------------------------------------------------------------------------
// Email provider
// ---------------------------------------------------------------------------

/// Supported outbound e-mail providers.
///
/// Actual dispatch happens in the backend; the wizard only records the
/// user's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailProvider {
    Smtp,
    Sendgrid,
    Mailjet,
    Brevo,
}

impl EmailProvider {
    /// Parse a provider string from the backend.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "smtp" => Ok(Self::Smtp),
            "sendgrid" => Ok(Self::Sendgrid),
            "mailjet" => Ok(Self::Mailjet),
            "brevo" => Ok(Self::Brevo),
            _ => Err(CoreError::Validation(format!(
                "Invalid email provider '{s}'. Must be one of: smtp, sendgrid, mailjet, brevo"
            ))),
        }
    }

    /// Convert to a backend-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Sendgrid => "sendgrid",
            Self::Mailjet => "mailjet",
            Self::Brevo => "brevo",
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient filter set
// ---------------------------------------------------------------------------

/// The recipient selection criteria, mutated exclusively by the Recipients
/// step and evaluated by the backend counting collaborator.
///
/// `include_ids` and `exclude_ids` are explicit per-entity overrides on top
/// of the attribute filters. They are not required to be disjoint; use
/// [`overlapping_ids`](Self::overlapping_ids) to surface a warning when
/// they are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientFilterSet {
    pub target: TargetType,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub include_ids: Vec<DbId>,
    pub exclude_ids: Vec<DbId>,
}

impl Default for RecipientFilterSet {
    fn default() -> Self {
        Self {
            target: TargetType::Organisations,
            languages: Vec::new(),
            countries: Vec::new(),
            categories: Vec::new(),
            include_ids: Vec::new(),
            exclude_ids: Vec::new(),
        }
    }
}

impl RecipientFilterSet {
    /// Ids present in both the include and the exclude lists.
    ///
    /// The wizard does not reject overlapping lists (the backend resolves
    /// exclusion last), but views surface the overlap as a warning.
    pub fn overlapping_ids(&self) -> Vec<DbId> {
        let mut overlap: Vec<DbId> = self
            .include_ids
            .iter()
            .filter(|id| self.exclude_ids.contains(id))
            .copied()
            .collect();
        overlap.sort_unstable();
        overlap.dedup();
        overlap
    }
}

// ---------------------------------------------------------------------------
// Campaign draft
// ---------------------------------------------------------------------------

/// An in-progress, not-yet-submitted campaign configuration.
///
/// Field-shape validation (`validator` derive) is applied when the whole
/// draft is submitted; the per-step advancement gates in
/// [`wizard_step`](crate::wizard_step) are evaluated lazily and never
/// reject a merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CampaignDraft {
    #[validate(length(min = 1, message = "campaign name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub product_id: Option<DbId>,
    pub template_id: Option<DbId>,
    pub filters: RecipientFilterSet,
    #[validate(range(min = 1, message = "batch size must be positive"))]
    pub batch_size: u32,
    pub batch_delay_secs: u32,
    #[validate(length(min = 1, message = "sender name is required"))]
    pub sender_name: String,
    #[validate(email(message = "sender email is not a valid address"))]
    pub sender_email: String,
    pub provider: EmailProvider,
}

impl Default for CampaignDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            product_id: None,
            template_id: None,
            filters: RecipientFilterSet::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay_secs: DEFAULT_BATCH_DELAY_SECS,
            sender_name: String::new(),
            sender_email: String::new(),
            provider: EmailProvider::Smtp,
        }
    }
}

impl CampaignDraft {
    /// Merge a partial update into the draft.
    ///
    /// Absent (`None`) fields are left untouched. No validation happens
    /// here; the step gates re-derive validity lazily.
    ///
    /// Returns `true` when any recipient filter field changed, so the
    /// caller knows the live recipient count is stale.
    pub fn apply(&mut self, update: UpdateDraft) -> bool {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(product_id) = update.product_id {
            self.product_id = Some(product_id);
        }
        if let Some(template_id) = update.template_id {
            self.template_id = Some(template_id);
        }
        if let Some(batch_size) = update.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(batch_delay_secs) = update.batch_delay_secs {
            self.batch_delay_secs = batch_delay_secs;
        }
        if let Some(sender_name) = update.sender_name {
            self.sender_name = sender_name;
        }
        if let Some(sender_email) = update.sender_email {
            self.sender_email = sender_email;
        }
        if let Some(provider) = update.provider {
            self.provider = provider;
        }

        let before = self.filters.clone();
        if let Some(target) = update.target {
            self.filters.target = target;
        }
        if let Some(languages) = update.languages {
            self.filters.languages = languages;
        }
        if let Some(countries) = update.countries {
            self.filters.countries = countries;
        }
        if let Some(categories) = update.categories {
            self.filters.categories = categories;
        }
        if let Some(include_ids) = update.include_ids {
            self.filters.include_ids = include_ids;
        }
        if let Some(exclude_ids) = update.exclude_ids {
            self.filters.exclude_ids = exclude_ids;
        }
        self.filters != before
    }
}

// ---------------------------------------------------------------------------
// Partial update DTO
// ---------------------------------------------------------------------------

/// Partial update for a [`CampaignDraft`]. Every field is optional; absent
/// fields leave the draft untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub product_id: Option<DbId>,
    pub template_id: Option<DbId>,
    pub batch_size: Option<u32>,
    pub batch_delay_secs: Option<u32>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub provider: Option<EmailProvider>,
    pub target: Option<TargetType>,
    pub languages: Option<Vec<String>>,
    pub countries: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub include_ids: Option<Vec<DbId>>,
    pub exclude_ids: Option<Vec<DbId>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> CampaignDraft {
        CampaignDraft {
            name: "Campagne Q1".to_string(),
            description: Some("Relance trimestrielle".to_string()),
            product_id: Some(3),
            template_id: Some(7),
            filters: RecipientFilterSet {
                target: TargetType::Contacts,
                languages: vec!["fr".to_string()],
                countries: vec!["FR".to_string(), "BE".to_string()],
                categories: vec!["client".to_string()],
                include_ids: vec![10, 11],
                exclude_ids: vec![42],
            },
            batch_size: 100,
            batch_delay_secs: 30,
            sender_name: "Equipe Relance".to_string(),
            sender_email: "contact@relance.example".to_string(),
            provider: EmailProvider::Mailjet,
        }
    }

    // -- TargetType / EmailProvider --

    #[test]
    fn target_type_roundtrip() {
        for target in [TargetType::Organisations, TargetType::Contacts] {
            assert_eq!(TargetType::from_str_db(target.as_str()).unwrap(), target);
        }
    }

    #[test]
    fn target_type_invalid() {
        assert!(TargetType::from_str_db("companies").is_err());
        assert!(TargetType::from_str_db("").is_err());
    }

    #[test]
    fn provider_roundtrip() {
        for provider in [
            EmailProvider::Smtp,
            EmailProvider::Sendgrid,
            EmailProvider::Mailjet,
            EmailProvider::Brevo,
        ] {
            assert_eq!(
                EmailProvider::from_str_db(provider.as_str()).unwrap(),
                provider
            );
        }
    }

    #[test]
    fn provider_invalid() {
        assert!(EmailProvider::from_str_db("pigeon").is_err());
    }

    // -- RecipientFilterSet --

    #[test]
    fn overlapping_ids_empty_when_disjoint() {
        let filters = RecipientFilterSet {
            include_ids: vec![1, 2, 3],
            exclude_ids: vec![4, 5],
            ..Default::default()
        };
        assert!(filters.overlapping_ids().is_empty());
    }

    #[test]
    fn overlapping_ids_reports_sorted_intersection() {
        let filters = RecipientFilterSet {
            include_ids: vec![5, 1, 3, 5],
            exclude_ids: vec![3, 5, 9],
            ..Default::default()
        };
        assert_eq!(filters.overlapping_ids(), vec![3, 5]);
    }

    // -- apply --

    #[test]
    fn apply_merges_only_present_fields() {
        let mut draft = complete_draft();
        let changed = draft.apply(UpdateDraft {
            name: Some("Campagne Q2".to_string()),
            ..Default::default()
        });

        assert!(!changed, "non-filter update must not report filter change");
        assert_eq!(draft.name, "Campagne Q2");
        // Everything else untouched.
        assert_eq!(draft.sender_email, "contact@relance.example");
        assert_eq!(draft.batch_size, 100);
    }

    #[test]
    fn apply_reports_filter_change() {
        let mut draft = complete_draft();
        let changed = draft.apply(UpdateDraft {
            countries: Some(vec!["CH".to_string()]),
            ..Default::default()
        });
        assert!(changed);
        assert_eq!(draft.filters.countries, vec!["CH".to_string()]);
    }

    #[test]
    fn apply_identical_filter_value_is_not_a_change() {
        let mut draft = complete_draft();
        let changed = draft.apply(UpdateDraft {
            target: Some(TargetType::Contacts),
            ..Default::default()
        });
        assert!(!changed, "re-setting the same value leaves the count fresh");
    }

    #[test]
    fn apply_empty_update_is_noop() {
        let mut draft = complete_draft();
        let before = draft.clone();
        let changed = draft.apply(UpdateDraft::default());
        assert!(!changed);
        assert_eq!(draft, before);
    }

    // -- validation --

    #[test]
    fn complete_draft_validates() {
        use validator::Validate;
        assert!(complete_draft().validate().is_ok());
    }

    #[test]
    fn empty_name_fails_validation() {
        use validator::Validate;
        let mut draft = complete_draft();
        draft.name = String::new();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn malformed_sender_email_fails_validation() {
        use validator::Validate;
        let mut draft = complete_draft();
        draft.sender_email = "not-an-address".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn zero_batch_size_fails_validation() {
        use validator::Validate;
        let mut draft = complete_draft();
        draft.batch_size = 0;
        assert!(draft.validate().is_err());
    }

    // -- serde round-trip --

    #[test]
    fn draft_serde_roundtrip() {
        let draft = complete_draft();
        let json = serde_json::to_string(&draft).unwrap();
        let back: CampaignDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn default_draft_serde_roundtrip() {
        let draft = CampaignDraft::default();
        let json = serde_json::to_value(&draft).unwrap();
        let back: CampaignDraft = serde_json::from_value(json).unwrap();
        assert_eq!(back, draft);
    }
}
