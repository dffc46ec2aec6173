//! # HTTP Client
//!
//! Thin wrapper around `reqwest` that attaches the bearer token from the
//! current session and normalizes every failure into [`ClientError`].

use crate::error::{ClientError, ClientResult};
use crate::session::SessionHandle;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// API Client
// ============================================================================

/// HTTP client for the donation backend.
///
/// Cloning is cheap: the connection pool and the session handle are shared.
///
/// # Example
///
/// ```rust,ignore
/// let session = SessionHandle::in_memory();
/// let client = ApiClient::new("http://127.0.0.1:8080", session)?;
/// let users = client.list_users().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying reqwest HTTP client.
    client: Client,
    /// Base URL of the backend API, without a trailing slash.
    base_url: String,
    /// Source of the bearer token.
    session: SessionHandle,
}

impl ApiClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: impl Into<String>, session: SessionHandle) -> ClientResult<Self> {
        Self::with_timeout(base_url, session, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SessionHandle,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Build the full URL for an API endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, refusing to send an expired one.
    fn authorize(&self, req: RequestBuilder) -> ClientResult<RequestBuilder> {
        match self.session.current() {
            Some(session) if session.is_expired() => {
                tracing::warn!(user = %session.user.username, "refusing request with expired session");
                Err(ClientError::SessionExpired)
            }
            Some(session) => Ok(req.bearer_auth(session.token)),
            None => Ok(req),
        }
    }

    // ========================================================================
    // Generic request helpers
    // ========================================================================

    /// Send a GET request and deserialise the response.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        let req = self.authorize(self.client.get(self.url(path)))?;
        self.handle_response(req.send().await?).await
    }

    /// Send a GET request with query parameters.
    pub(crate) async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        let req = self.authorize(self.client.get(self.url(path)).query(query))?;
        self.handle_response(req.send().await?).await
    }

    /// Send a POST request with a JSON body and deserialise the response.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "POST");
        let req = self.authorize(self.client.post(self.url(path)).json(body))?;
        self.handle_response(req.send().await?).await
    }

    /// Send a POST request without credentials (login, registration).
    pub(crate) async fn post_anonymous<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "POST (anonymous)");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Send a PUT request with a JSON body and deserialise the response.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "PUT");
        let req = self.authorize(self.client.put(self.url(path)).json(body))?;
        self.handle_response(req.send().await?).await
    }

    /// Send a PUT request with text form fields as `multipart/form-data`.
    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: impl IntoIterator<Item = (&'static str, String)>,
    ) -> ClientResult<T> {
        tracing::debug!(path, "PUT (multipart)");
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        let req = self.authorize(self.client.put(self.url(path)).multipart(form))?;
        self.handle_response(req.send().await?).await
    }

    /// Send a DELETE request. The response body is ignored on success.
    pub(crate) async fn delete(&self, path: &str) -> ClientResult<()> {
        tracing::debug!(path, "DELETE");
        let req = self.authorize(self.client.delete(self.url(path)))?;
        let response = req.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_body(status.as_u16(), &body))
        }
    }

    /// Handle a response: check for errors and deserialise on success.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ClientResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
        } else {
            let body = String::from_utf8_lossy(&bytes);
            tracing::debug!(status = status.as_u16(), "request failed");
            Err(ClientError::from_body(status.as_u16(), &body))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::session;
    use chrono::Duration as ChronoDuration;
    use donation_core::Role;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/", SessionHandle::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/users/1"), "http://localhost:8080/users/1");
    }

    #[test]
    fn test_expired_session_blocks_request() {
        let handle = SessionHandle::in_memory();
        handle
            .set(session(Some(ChronoDuration::seconds(-1)), Role::Admin))
            .unwrap();
        let client = ApiClient::new(DEFAULT_BASE_URL, handle).unwrap();

        let result = client.authorize(client.client.get(client.url("/users")));
        assert!(matches!(result, Err(ClientError::SessionExpired)));
    }

    #[test]
    fn test_active_session_adds_bearer_token() {
        let handle = SessionHandle::in_memory();
        handle
            .set(session(Some(ChronoDuration::hours(1)), Role::User))
            .unwrap();
        let client = ApiClient::new(DEFAULT_BASE_URL, handle).unwrap();

        let request = client
            .authorize(client.client.get(client.url("/donations")))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer header.payload.signature"
        );
    }

    #[test]
    fn test_anonymous_request_has_no_token() {
        let client = ApiClient::new(DEFAULT_BASE_URL, SessionHandle::in_memory()).unwrap();
        let request = client
            .authorize(client.client.get(client.url("/users")))
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
