//! Collaborator ports and the HTTP client for the Relance backend.
//!
//! The wizard engine never talks to the network directly; it depends on
//! the async traits in [`ports`] (draft persistence, recipient counting,
//! submission, reference data). [`ApiClient`] is the production
//! implementation of all of them against the CRM REST API.

pub mod error;
pub mod http;
pub mod ports;

pub use error::ClientError;
pub use http::ApiClient;
pub use ports::{
    CampaignSubmitter, DraftStore, KeyValueStore, MemoryStore, RecipientCounter, RefItem,
    ReferenceData, SubmitReceipt, KEY_AUTH_TOKEN, KEY_THEME,
};
