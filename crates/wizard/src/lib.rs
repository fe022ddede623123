//! The Relance campaign wizard engine.
//!
//! Building blocks:
//!
//! - [`WizardController`] — owns the draft, the current step, and the
//!   per-step advancement gates.
//! - [`StepView`] — pure mapping from controller state to a per-step view
//!   model.
//! - [`AutosavePump`] — background task that periodically persists the
//!   draft through a [`DraftStore`](relance_client::DraftStore).
//! - [`CountTracker`] — generation-guarded recipient count refresh.
//! - [`WizardSession`] — glue that wires the pieces together for a host
//!   application.

pub mod autosave;
pub mod controller;
pub mod count;
pub mod error;
pub mod session;
pub mod view;

pub use autosave::{AutosavePump, AUTOSAVE_INTERVAL};
pub use controller::WizardController;
pub use count::CountTracker;
pub use error::WizardError;
pub use session::WizardSession;
pub use view::{StepBody, StepView};
