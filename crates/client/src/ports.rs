//! Collaborator ports consumed by the wizard engine.
//!
//! Each port is an async trait with a single concern, so the engine can be
//! tested against in-memory doubles and wired to [`ApiClient`]
//! (crate::ApiClient) in production. The backend's internal behavior
//! (delivery, batching, provider dispatch) is out of scope on this side.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use relance_core::draft::{CampaignDraft, RecipientFilterSet};
use relance_core::types::{DbId, Timestamp};

use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Draft persistence
// ---------------------------------------------------------------------------

/// Persists campaign drafts between sessions.
///
/// A draft has no persistence identity until the first save; `save` with
/// `id == None` allocates one, later saves update it in place.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Save a draft snapshot, returning its (possibly newly allocated) id.
    async fn save(&self, draft: &CampaignDraft, id: Option<DbId>) -> Result<DbId, ClientError>;

    /// Load a previously saved draft.
    async fn load(&self, id: DbId) -> Result<CampaignDraft, ClientError>;
}

// ---------------------------------------------------------------------------
// Recipient counting
// ---------------------------------------------------------------------------

/// Resolves how many recipients match a filter set.
#[async_trait]
pub trait RecipientCounter: Send + Sync {
    async fn count(&self, filters: &RecipientFilterSet) -> Result<u64, ClientError>;
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Opaque acknowledgement returned by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub campaign_id: DbId,
    pub accepted_at: Timestamp,
}

/// Hands a complete draft to the backend for sending.
#[async_trait]
pub trait CampaignSubmitter: Send + Sync {
    /// Submit the campaign. Sending, batching, and provider dispatch all
    /// happen behind this call.
    async fn submit(&self, draft: &CampaignDraft) -> Result<SubmitReceipt, ClientError>;

    /// Send a one-off test e-mail of the campaign to a single address.
    async fn send_test(&self, draft: &CampaignDraft, to: &str) -> Result<(), ClientError>;
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// An `{id, label}` record from a read-only lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefItem {
    pub id: DbId,
    pub label: String,
}

/// Read-only lookups used to populate the wizard's selection inputs.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn products(&self) -> Result<Vec<RefItem>, ClientError>;
    async fn templates(&self) -> Result<Vec<RefItem>, ClientError>;
    async fn providers(&self) -> Result<Vec<RefItem>, ClientError>;
    async fn countries(&self) -> Result<Vec<RefItem>, ClientError>;
}

// ---------------------------------------------------------------------------
// Key-value platform storage
// ---------------------------------------------------------------------------

/// Storage key for the backend bearer token.
pub const KEY_AUTH_TOKEN: &str = "auth_token";

/// Storage key for the persisted UI theme.
pub const KEY_THEME: &str = "theme";

/// Small synchronous port over platform key-value storage (auth token,
/// persisted theme), so the host platform's storage can be swapped in.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`], used by the terminal app and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::default();
        assert_eq!(store.get(KEY_AUTH_TOKEN), None);

        store.set(KEY_AUTH_TOKEN, "secret");
        assert_eq!(store.get(KEY_AUTH_TOKEN), Some("secret".to_string()));

        store.set(KEY_AUTH_TOKEN, "rotated");
        assert_eq!(store.get(KEY_AUTH_TOKEN), Some("rotated".to_string()));

        store.remove(KEY_AUTH_TOKEN);
        assert_eq!(store.get(KEY_AUTH_TOKEN), None);
    }

    #[test]
    fn memory_store_keys_are_independent() {
        let store = MemoryStore::default();
        store.set(KEY_AUTH_TOKEN, "secret");
        store.set(KEY_THEME, "dark");

        store.remove(KEY_AUTH_TOKEN);
        assert_eq!(store.get(KEY_THEME), Some("dark".to_string()));
    }
}
