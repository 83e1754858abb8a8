//! Saved login state and backend connection setup.

pub mod storage;

use std::time::Duration;

use anyhow::{Context, Result};

use crm_core::ApiUrl;
use crm_http::{AccessToken, CrmApi};

use crate::cli::{DEFAULT_API_URL, GlobalArgs};

pub use storage::StoredSession;

/// Backend URL: `--api-url`/`CRM_API_URL`, else the session's, else the default.
pub fn resolve_api_url(global: &GlobalArgs, stored: Option<&StoredSession>) -> Result<ApiUrl> {
    let raw = global
        .api_url
        .as_deref()
        .or(stored.map(|s| s.api_url.as_str()))
        .unwrap_or(DEFAULT_API_URL);

    ApiUrl::new(raw).context("Invalid API URL")
}

/// Unauthenticated connection.
pub fn anonymous(global: &GlobalArgs) -> Result<CrmApi> {
    let api_url = resolve_api_url(global, None)?;
    Ok(CrmApi::new(api_url)
        .context("Failed to create HTTP client")?
        .with_timeout(Duration::from_secs(global.timeout)))
}

/// Connection carrying the saved session's token.
pub fn connect(global: &GlobalArgs) -> Result<(CrmApi, StoredSession)> {
    let stored = storage::load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'crm login' first.")?;

    let api_url = resolve_api_url(global, Some(&stored))?;
    let api = CrmApi::new(api_url)
        .context("Failed to create HTTP client")?
        .with_timeout(Duration::from_secs(global.timeout))
        .with_token(AccessToken::new(stored.access_token.clone()));

    Ok((api, stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn global(api_url: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            json_logs: false,
            api_url: api_url.map(str::to_string),
            timeout: 30,
        }
    }

    fn stored(api_url: &str) -> StoredSession {
        StoredSession {
            api_url: api_url.to_string(),
            username: "admin".to_string(),
            access_token: "t".to_string(),
            logged_in_at: Utc::now(),
        }
    }

    #[test]
    fn flag_wins_over_session() {
        let session = stored("https://crm.example.com");
        let url = resolve_api_url(&global(Some("http://127.0.0.1:9000")), Some(&session)).unwrap();
        assert_eq!(url.host(), Some("127.0.0.1"));
    }

    #[test]
    fn session_wins_over_default() {
        let session = stored("https://crm.example.com");
        let url = resolve_api_url(&global(None), Some(&session)).unwrap();
        assert_eq!(url.host(), Some("crm.example.com"));
    }

    #[test]
    fn falls_back_to_localhost() {
        let url = resolve_api_url(&global(None), None).unwrap();
        assert_eq!(url.host(), Some("localhost"));
    }
}
