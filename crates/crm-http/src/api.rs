//! Backend entry point: authentication and collection lookup.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crm_core::error::{AuthError, Error};
use crm_core::list::DEFAULT_TIMEOUT;
use crm_core::{ApiUrl, QueryParams, RecordType, Result};

use crate::client::RestClient;
use crate::collection::HttpCollection;

const LOGIN: &str = "/api/auth/login";
const CURRENT_USER: &str = "/api/auth/me";

/// A bearer token issued by `/api/auth/login`.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for persistence and authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// The authenticated user as reported by `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CurrentUser {
    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }
}

/// Connection to one CRM backend.
///
/// # Example
///
/// ```no_run
/// use crm_core::{ApiUrl, RecordType};
/// use crm_http::CrmApi;
///
/// # async fn example() -> crm_core::Result<()> {
/// let api = CrmApi::new(ApiUrl::new("http://localhost:8000")?)?;
/// let token = api.login("admin", "admin123").await?;
/// let leads = api.with_token(token).collection(RecordType::Lead);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CrmApi {
    client: RestClient,
}

impl CrmApi {
    /// Create an unauthenticated connection with the default timeout.
    pub fn new(api: ApiUrl) -> Result<Self> {
        Ok(Self {
            client: RestClient::new(api, DEFAULT_TIMEOUT)?,
        })
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client.set_timeout(timeout);
        self
    }

    /// Attach a bearer token to every subsequent request.
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.client.set_token(Some(token));
        self
    }

    pub fn api_url(&self) -> &ApiUrl {
        self.client.api()
    }

    pub fn timeout(&self) -> Duration {
        self.client.timeout()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.token().is_some()
    }

    /// Exchange a username and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the backend rejects the
    /// login with 401.
    #[instrument(skip(self, password), fields(api = %self.client.api()))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        debug!("logging in");

        let request = LoginRequest { username, password };
        let response: LoginResponse = self
            .client
            .post(LOGIN, &request)
            .await
            .map_err(|e| match e {
                Error::Protocol(ref p) if p.is_auth_error() => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        info!("login succeeded");
        Ok(AccessToken::new(response.access_token))
    }

    /// Look up the user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionExpired`] without a token or when the
    /// backend answers 401.
    #[instrument(skip(self), fields(api = %self.client.api()))]
    pub async fn current_user(&self) -> Result<CurrentUser> {
        if self.client.token().is_none() {
            return Err(AuthError::SessionExpired.into());
        }

        self.client
            .get(CURRENT_USER, &QueryParams::new())
            .await
            .map_err(|e| match e {
                Error::Protocol(ref p) if p.is_auth_error() => AuthError::SessionExpired.into(),
                other => other,
            })
    }

    /// Collection for `record_type`, sharing this connection's client and token.
    pub fn collection(&self, record_type: RecordType) -> HttpCollection {
        HttpCollection::new(record_type, self.client.clone())
    }
}
