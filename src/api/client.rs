//! API client for the notes service.
//!
//! All server traffic goes through the private `get`/`post`/`put`/`delete`
//! helpers, which form the request/response pipeline: the request side
//! attaches the stored bearer token, the response side classifies failures
//! and performs the forced logout for expired credentials. The public
//! service operations are thin wrappers over that pipeline; none of them
//! retries.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthEvent, AuthEventSender, TokenStore};
use crate::models::{Note, NoteDraft};

use super::policy::{classify, FailureAction};
use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response from the login and register endpoints. The token is the only
/// field the client uses; any other fields the server sends are ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

/// API client for the notes service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    events: AuthEventSender,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: String, store: Arc<dyn TokenStore>, events: AuthEventSender) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            events,
        })
    }

    // =========================================================================
    // Request/response pipeline
    // =========================================================================

    /// Build the headers for an outbound request. If a token is stored it is
    /// attached as a bearer authorization header; if none is stored the
    /// request goes out unauthenticated. A store read failure aborts the call.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.store.get().context("Failed to read stored token")? {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check a response, applying the forced-logout rule on failure.
    /// Errors are always rejected to the caller; `force_logout` runs exactly
    /// once for a 401 outside the auth endpoints.
    async fn check_response(&self, response: reqwest::Response, path: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if classify(status, path) == FailureAction::ForceLogout {
            self.force_logout(path);
        }
        Err(ApiError::from_status(status, &body).into())
    }

    /// The stored credential was rejected by the server: clear it and notify
    /// the UI layer. Navigation back to the login view happens on the
    /// consumer side of the event channel.
    fn force_logout(&self, path: &str) {
        warn!(path, "Credential rejected, forcing logout");
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
        // Receiver may already be gone during shutdown
        let _ = self.events.send(AuthEvent::SessionExpired {
            path: path.to_string(),
        });
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", path))?;

        let response = self.check_response(response, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", path))?;

        let response = self.check_response(response, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .put(self.url(path))
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", path))?;

        let response = self.check_response(response, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(path))
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", path))?;

        // 204, no body to parse
        self.check_response(response, path).await?;
        Ok(())
    }

    // =========================================================================
    // Service operations
    // =========================================================================

    /// Authenticate and return the server-issued token. A 401 here is a
    /// rejected login attempt and is rejected to the caller for inline
    /// display; storing the token is the caller's decision.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        debug!(username, "Sending login request");
        self.post("/login/", &CredentialsBody { username, password })
            .await
    }

    /// Create an account and return the server-issued token.
    pub async fn register(&self, username: &str, password: &str) -> Result<TokenResponse> {
        debug!(username, "Sending register request");
        self.post("/register/", &CredentialsBody { username, password })
            .await
    }

    /// Fetch all notes for the authenticated user.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.get("/notes/").await
    }

    /// Create a note, returning the server's record with its assigned id.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note> {
        self.post("/notes/", draft).await
    }

    /// Update an existing note.
    pub async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<Note> {
        self.put(&format!("/notes/{}/", id), draft).await
    }

    /// Delete a note. The server responds 204 on success.
    pub async fn delete_note(&self, id: i64) -> Result<()> {
        self.delete(&format!("/notes/{}/", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{self, MemoryTokenStore};

    fn test_client(store: Arc<dyn TokenStore>) -> (ApiClient, auth::AuthEventReceiver) {
        let (tx, rx) = auth::events::channel();
        let client = ApiClient::new("https://notes.example.com".to_string(), store, tx)
            .expect("client should build");
        (client, rx)
    }

    #[test]
    fn test_auth_headers_with_stored_token() {
        let store = Arc::new(MemoryTokenStore::with_token("tok-123"));
        let (client, _rx) = test_client(store);

        let headers = client.auth_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer tok-123"
        );
    }

    #[test]
    fn test_auth_headers_without_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let (client, _rx) = test_client(store);

        let headers = client.auth_headers().unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_force_logout_clears_store_and_emits_event() {
        let store = Arc::new(MemoryTokenStore::with_token("stale"));
        let (client, mut rx) = test_client(store.clone());

        client.force_logout("/notes/");

        assert_eq!(store.get().unwrap(), None);
        assert_eq!(
            rx.try_recv().unwrap(),
            AuthEvent::SessionExpired {
                path: "/notes/".to_string()
            }
        );
        // Exactly one event per forced logout
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_force_logout_survives_dropped_receiver() {
        let store = Arc::new(MemoryTokenStore::with_token("stale"));
        let (client, rx) = test_client(store.clone());
        drop(rx);

        client.force_logout("/notes/");
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_token_response_ignores_extra_fields() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"token": "tok-123", "user_id": 9}"#).unwrap();
        assert_eq!(parsed.token, "tok-123");
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let (tx, _rx) = auth::events::channel();
        let client =
            ApiClient::new("https://notes.example.com/".to_string(), store, tx).unwrap();
        assert_eq!(client.url("/notes/"), "https://notes.example.com/notes/");
    }
}
