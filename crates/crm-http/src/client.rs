//! REST HTTP client.

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use crm_core::error::{Error, ProtocolError, TransportError};
use crm_core::{ApiUrl, QueryParams};

use crate::api::AccessToken;

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<serde_json::Value>,
}

/// HTTP client bound to one backend.
#[derive(Clone)]
pub(crate) struct RestClient {
    client: reqwest::Client,
    api: ApiUrl,
    timeout: Duration,
    token: Option<AccessToken>,
}

impl RestClient {
    /// Create a client for `api` with a per-request timeout.
    pub fn new(api: ApiUrl, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("crm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api,
            timeout,
            token: None,
        })
    }

    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: Option<AccessToken>) {
        self.token = token;
    }

    /// GET `path` with ordered query parameters.
    #[instrument(skip(self, params), fields(api = %self.api))]
    pub async fn get<R>(&self, path: &str, params: &QueryParams) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        debug!(path, "GET");
        trace!(query = %params.to_query_string(), "query parameters");

        let response = self
            .send(self.request(Method::GET, path).query(params))
            .await?;
        self.handle_response(response).await
    }

    /// POST a JSON body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        self.handle_response(response).await
    }

    /// POST with no request body.
    #[instrument(skip(self), fields(api = %self.api))]
    pub async fn post_empty<R>(&self, path: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        debug!(path, "POST (no body)");
        let response = self.send(self.request(Method::POST, path)).await?;
        self.handle_response(response).await
    }

    /// PUT a JSON body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "PUT");
        let response = self
            .send(self.request(Method::PUT, path).json(body))
            .await?;
        self.handle_response(response).await
    }

    /// PUT with query parameters and no body.
    #[instrument(skip(self, params), fields(api = %self.api))]
    pub async fn put_query<R>(&self, path: &str, params: &QueryParams) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        debug!(path, "PUT (query)");
        let response = self
            .send(self.request(Method::PUT, path).query(params))
            .await?;
        self.handle_response(response).await
    }

    /// DELETE; any 2xx (usually 204) is success.
    #[instrument(skip(self), fields(api = %self.api))]
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        debug!(path, "DELETE");
        let response = self.send(self.request(Method::DELETE, path)).await?;

        let status = response.status();
        trace!(status = %status, "response");
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(parse_error_response(response).await))
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.api.endpoint_url(path);
        let builder = self.client.request(method, url).timeout(self.timeout);
        match &self.token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, Error> {
        request.send().await.map_err(|e| self.transport_error(e))
    }

    /// Handle a response, decoding the body or the error detail.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            response.json::<R>().await.map_err(|e| self.transport_error(e))
        } else {
            Err(Error::Protocol(parse_error_response(response).await))
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let error = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        Error::Transport(error)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("api", &self.api)
            .field("timeout", &self.timeout)
            .field("token", &self.token)
            .finish()
    }
}

/// Parse a `{"detail": ...}` error body.
///
/// `detail` is usually a string; validation failures carry a list of
/// objects, which is kept as compact JSON.
async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
    let status = response.status();

    let detail = match response.json::<ErrorResponse>().await {
        Ok(ErrorResponse {
            detail: Some(serde_json::Value::String(s)),
        }) => Some(s),
        Ok(ErrorResponse {
            detail: Some(other),
        }) => Some(other.to_string()),
        _ => status.canonical_reason().map(str::to_string),
    };

    ProtocolError::new(status.as_u16(), detail)
}
