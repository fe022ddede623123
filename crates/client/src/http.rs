//! Reqwest-backed implementation of the collaborator ports.
//!
//! All endpoints return the backend's `{ "data": ... }` envelope; error
//! bodies carry `{ "error": ..., "code": ... }`. Non-success statuses map
//! to [`ClientError::Api`] with the body's `error` message when present.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use relance_core::draft::{CampaignDraft, RecipientFilterSet};
use relance_core::types::DbId;

use crate::error::ClientError;
use crate::ports::{
    CampaignSubmitter, DraftStore, RecipientCounter, RefItem, ReferenceData, SubmitReceipt,
};

/// Success envelope wrapping every backend payload.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Error body shape for non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Response payload for draft save endpoints.
#[derive(Debug, Deserialize)]
struct DraftSaved {
    id: DbId,
}

/// Response payload for the recipient count endpoint.
#[derive(Debug, Deserialize)]
struct CountResult {
    count: u64,
}

/// Request body for the test-send endpoint.
#[derive(Debug, Serialize)]
struct TestSendRequest<'a> {
    campaign: &'a CampaignDraft,
    to: &'a str,
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client for the Relance backend REST API.
///
/// Implements every collaborator port; share it as `Arc<ApiClient>` and
/// hand the same instance to the wizard session for each concern.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash) with an
    /// optional bearer token.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        read_data(response).await
    }

    async fn post_data<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        read_data(response).await
    }

    async fn put_data<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .authorize(self.http.put(self.url(path)).json(body))
            .send()
            .await?;
        read_data(response).await
    }
}

/// Unwrap the `{ "data": ... }` envelope or map the error body.
async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("unexpected response from backend ({status})"));
        tracing::warn!(status = status.as_u16(), %message, "Backend request failed");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    Ok(envelope.data)
}

/// Check a success status on endpoints with no meaningful body.
async fn read_empty(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("unexpected response from backend ({status})"));
    tracing::warn!(status = status.as_u16(), %message, "Backend request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

// ---------------------------------------------------------------------------
// Port implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl DraftStore for ApiClient {
    async fn save(&self, draft: &CampaignDraft, id: Option<DbId>) -> Result<DbId, ClientError> {
        let saved: DraftSaved = match id {
            None => self.post_data("/api/v1/campaigns/drafts", draft).await?,
            Some(id) => {
                self.put_data(&format!("/api/v1/campaigns/drafts/{id}"), draft)
                    .await?
            }
        };
        Ok(saved.id)
    }

    async fn load(&self, id: DbId) -> Result<CampaignDraft, ClientError> {
        self.get_data(&format!("/api/v1/campaigns/drafts/{id}"))
            .await
    }
}

#[async_trait]
impl RecipientCounter for ApiClient {
    async fn count(&self, filters: &RecipientFilterSet) -> Result<u64, ClientError> {
        let result: CountResult = self.post_data("/api/v1/recipients/count", filters).await?;
        Ok(result.count)
    }
}

#[async_trait]
impl CampaignSubmitter for ApiClient {
    async fn submit(&self, draft: &CampaignDraft) -> Result<SubmitReceipt, ClientError> {
        self.post_data("/api/v1/campaigns", draft).await
    }

    async fn send_test(&self, draft: &CampaignDraft, to: &str) -> Result<(), ClientError> {
        let body = TestSendRequest {
            campaign: draft,
            to,
        };
        let response = self
            .authorize(
                self.http
                    .post(self.url("/api/v1/campaigns/test-send"))
                    .json(&body),
            )
            .send()
            .await?;
        read_empty(response).await
    }
}

#[async_trait]
impl ReferenceData for ApiClient {
    async fn products(&self) -> Result<Vec<RefItem>, ClientError> {
        self.get_data("/api/v1/products").await
    }

    async fn templates(&self) -> Result<Vec<RefItem>, ClientError> {
        self.get_data("/api/v1/templates").await
    }

    async fn providers(&self) -> Result<Vec<RefItem>, ClientError> {
        self.get_data("/api/v1/providers").await
    }

    async fn countries(&self) -> Result<Vec<RefItem>, ClientError> {
        self.get_data("/api/v1/countries").await
    }
}
