//! Relance domain types and the campaign wizard step machine.
//!
//! This crate is pure domain logic with no I/O:
//!
//! - [`draft`] — the [`CampaignDraft`](draft::CampaignDraft) aggregate,
//!   its recipient filter set, and the partial-update merge type.
//! - [`wizard_step`] — the four-step wizard ordering, transition rules,
//!   and the per-step advancement gates.
//! - [`error`] — the shared [`CoreError`](error::CoreError) type.

pub mod draft;
pub mod error;
pub mod types;
pub mod wizard_step;

pub use draft::{CampaignDraft, EmailProvider, RecipientFilterSet, TargetType, UpdateDraft};
pub use error::CoreError;
pub use wizard_step::{RecipientCount, WizardStep};
