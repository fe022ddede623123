//! In-memory collaborator doubles for wizard engine tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use relance_client::{
    CampaignSubmitter, ClientError, DraftStore, RecipientCounter, SubmitReceipt,
};
use relance_core::draft::{CampaignDraft, RecipientFilterSet};
use relance_core::types::DbId;

// ---------------------------------------------------------------------------
// Draft store double
// ---------------------------------------------------------------------------

/// In-memory [`DraftStore`] with optional per-call latency and a failure
/// switch.
#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: Mutex<HashMap<DbId, CampaignDraft>>,
    next_id: AtomicI64,
    save_count: AtomicU64,
    /// Per-call artificial latency, popped front on each save.
    delays: Mutex<VecDeque<Duration>>,
    /// Completion order of the delays used, for overlap assertions.
    completed: Mutex<Vec<Duration>>,
    failing: AtomicBool,
}

impl MemoryDraftStore {
    /// Queue artificial latencies for the next saves, in call order.
    pub fn with_delays(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: Mutex::new(delays.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Make every subsequent save fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The latency of each completed save, in completion order.
    pub fn completion_order(&self) -> Vec<Duration> {
        self.completed.lock().unwrap().clone()
    }

    pub fn saved_draft(&self, id: DbId) -> Option<CampaignDraft> {
        self.drafts.lock().unwrap().get(&id).cloned()
    }

    pub fn insert(&self, id: DbId, draft: CampaignDraft) {
        self.drafts.lock().unwrap().insert(id, draft);
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, draft: &CampaignDraft, id: Option<DbId>) -> Result<DbId, ClientError> {
        self.save_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                message: "draft store unavailable".to_string(),
            });
        }

        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
            self.completed.lock().unwrap().push(delay);
        }

        let id = id.unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.drafts.lock().unwrap().insert(id, draft.clone());
        Ok(id)
    }

    async fn load(&self, id: DbId) -> Result<CampaignDraft, ClientError> {
        self.drafts
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ClientError::Api {
                status: 404,
                message: format!("Draft with id {id} not found"),
            })
    }
}

// ---------------------------------------------------------------------------
// Recipient counter double
// ---------------------------------------------------------------------------

/// Scripted [`RecipientCounter`]: each call pops the next `(delay, result)`
/// entry, falling back to the default result with no delay.
pub struct ScriptedCounter {
    script: Mutex<VecDeque<(Duration, Result<u64, String>)>>,
    default: Result<u64, String>,
    calls: AtomicU64,
}

impl ScriptedCounter {
    /// Counter that always resolves to `count` immediately.
    pub fn resolving(count: u64) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Ok(count),
            calls: AtomicU64::new(0),
        }
    }

    /// Counter that always fails.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Err("recipient service unavailable".to_string()),
            calls: AtomicU64::new(0),
        }
    }

    /// Counter driven by an explicit script, then the default.
    pub fn scripted(
        script: impl IntoIterator<Item = (Duration, Result<u64, String>)>,
        default: Result<u64, String>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            default,
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipientCounter for ScriptedCounter {
    async fn count(&self, _filters: &RecipientFilterSet) -> Result<u64, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.script.lock().unwrap().pop_front();
        let (delay, result) = entry.unwrap_or((Duration::ZERO, self.default.clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result.map_err(|message| ClientError::Api {
            status: 503,
            message,
        })
    }
}

// ---------------------------------------------------------------------------
// Submitter double
// ---------------------------------------------------------------------------

/// Recording [`CampaignSubmitter`].
#[derive(Default)]
pub struct RecordingSubmitter {
    submitted: Mutex<Vec<CampaignDraft>>,
    test_sends: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingSubmitter {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<CampaignDraft> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn test_sends(&self) -> Vec<String> {
        self.test_sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl CampaignSubmitter for RecordingSubmitter {
    async fn submit(&self, draft: &CampaignDraft) -> Result<SubmitReceipt, ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 502,
                message: "submission rejected".to_string(),
            });
        }
        self.submitted.lock().unwrap().push(draft.clone());
        Ok(SubmitReceipt {
            campaign_id: 99,
            accepted_at: Utc::now(),
        })
    }

    async fn send_test(&self, _draft: &CampaignDraft, to: &str) -> Result<(), ClientError> {
        self.test_sends.lock().unwrap().push(to.to_string());
        Ok(())
    }
}
