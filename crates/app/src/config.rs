use relance_core::types::DbId;

/// Application configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL, no trailing slash (default: `http://localhost:3000`).
    pub api_base_url: String,
    /// Bearer token for the backend, if any.
    pub api_token: Option<String>,
    /// Seconds between draft autosaves (default: `30`).
    pub autosave_interval_secs: u64,
    /// Saved draft to resume, if any.
    pub draft_id: Option<DbId>,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `API_BASE_URL`           | `http://localhost:3000` |
    /// | `API_TOKEN`              | unset                   |
    /// | `AUTOSAVE_INTERVAL_SECS` | `30`                    |
    /// | `DRAFT_ID`               | unset                   |
    pub fn from_env() -> Self {
        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let api_token = std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty());

        let autosave_interval_secs: u64 = std::env::var("AUTOSAVE_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("AUTOSAVE_INTERVAL_SECS must be a valid u64");

        let draft_id: Option<DbId> = std::env::var("DRAFT_ID")
            .ok()
            .map(|v| v.parse().expect("DRAFT_ID must be a valid integer id"));

        Self {
            api_base_url,
            api_token,
            autosave_interval_secs,
            draft_id,
        }
    }
}
