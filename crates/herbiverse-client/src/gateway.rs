//! The request gate.
//!
//! Every HTTP call of the client goes through [`Gateway`]. On the way out it
//! attaches `Authorization: Bearer <token>` whenever storage holds a token.
//! On the way back it maps status codes onto [`ClientError`] and, for a 401
//! on an authenticated endpoint, invokes the registered
//! [`UnauthorizedHook`] before returning the error. That hook is the only
//! ambient coupling in the client: any feature making an authenticated call
//! can end the session.

use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::storage::SessionStorage;

/// Reaction to an authorization failure on an authenticated endpoint.
pub trait UnauthorizedHook: Send + Sync {
    /// Called once per 401 response, before the error reaches the caller.
    fn on_unauthorized(&self);
}

/// Hook that does nothing; for gates not tied to a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreUnauthorized;

impl UnauthorizedHook for IgnoreUnauthorized {
    fn on_unauthorized(&self) {}
}

/// How a call authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access<'a> {
    /// Public endpoint. A stored token is still attached, but a 401 does
    /// not end the session.
    Anonymous,
    /// Endpoint requiring the stored token; a 401 fires the hook.
    Authenticated,
    /// Use this token instead of the stored one; a 401 does not fire the
    /// hook. Used before a fresh token has been committed.
    Token(&'a str),
}

/// HTTP client applying bearer injection and the unauthorized hook.
pub struct Gateway {
    http: Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
    hook: Arc<dyn UnauthorizedHook>,
}

impl Gateway {
    /// Create a gate over an existing reqwest client.
    pub fn new(
        http: Client,
        base_url: Url,
        storage: Arc<dyn SessionStorage>,
        hook: Arc<dyn UnauthorizedHook>,
    ) -> Self {
        Self { http, base_url, storage, hook }
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Stored token; storage failures are logged and read as "no token".
    pub(crate) fn stored_token(&self) -> Option<String> {
        match self.storage.token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read stored token: {}", e);
                None
            },
        }
    }

    /// Fail fast with `NotAuthenticated` when no token is stored.
    pub(crate) fn require_token(&self) -> Result<(), ClientError> {
        match self.stored_token() {
            Some(_) => Ok(()),
            None => Err(ClientError::NotAuthenticated),
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        access: Access<'_>,
    ) -> Result<T, ClientError> {
        let resp = self.execute(Method::GET, segments, None, access).await?;
        decode(resp).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        access: Access<'_>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.execute(Method::POST, segments, Some(to_body(body)?), access).await?;
        decode(resp).await
    }

    pub(crate) async fn put<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        access: Access<'_>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.execute(Method::PUT, segments, Some(to_body(body)?), access).await?;
        decode(resp).await
    }

    /// Send a request whose response body is irrelevant.
    pub(crate) async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        access: Access<'_>,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(to_body).transpose()?;
        let resp = self.execute(method, segments, body, access).await?;
        // Drain so the connection can be reused.
        let _ = resp.bytes().await;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Config("base URL cannot hold paths".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
        access: Access<'_>,
    ) -> Result<Response, ClientError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url.path());

        let mut request = self.http.request(method.clone(), url.clone());
        let token = match access {
            Access::Token(token) => Some(token.to_string()),
            Access::Anonymous | Access::Authenticated => self.stored_token(),
        };
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::debug!("{} {} failed: {}", method, url.path(), e);
            ClientError::Network(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp.text().await.ok().and_then(|body| server_message(&body));
        tracing::debug!("{} {} -> {}", method, url.path(), status);

        match status {
            StatusCode::UNAUTHORIZED => {
                if access == Access::Authenticated {
                    tracing::warn!("Authorization rejected for {}; ending session", url.path());
                    self.hook.on_unauthorized();
                }
                Err(ClientError::Unauthorized { message })
            },
            StatusCode::CONFLICT => Err(ClientError::Conflict { message }),
            _ => Err(ClientError::ServerError { status: status.as_u16(), message }),
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("base_url", &self.base_url.as_str()).finish_non_exhaustive()
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    Ok(resp.json().await?)
}

/// Extract a human-readable message from an error body.
///
/// Looks at `message`, then `error` (string or `{message}`), ignoring blank
/// values and non-JSON bodies.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.get("message"),
        value.get("error"),
        value.get("error").and_then(|e| e.get("message")),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string);
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(server_message(r#"{"message":"bad creds"}"#).as_deref(), Some("bad creds"));
        assert_eq!(
            server_message(r#"{"error":"already in favourites"}"#).as_deref(),
            Some("already in favourites")
        );
        assert_eq!(server_message(r#"{"error":{"message":"nested"}}"#).as_deref(), Some("nested"));
        assert_eq!(server_message(r#"{"message":"  "}"#), None);
        assert_eq!(server_message("<html>502</html>"), None);
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let gate = Gateway::new(
            Client::new(),
            Url::parse("http://localhost:8000/").unwrap(),
            Arc::new(MemoryStorage::new()),
            Arc::new(IgnoreUnauthorized),
        );
        let url = gate.endpoint(&["plants", "name", "aloe vera"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/plants/name/aloe%20vera");
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let gate = Gateway::new(
            Client::new(),
            Url::parse("http://example.com/herbiverse/").unwrap(),
            Arc::new(MemoryStorage::new()),
            Arc::new(IgnoreUnauthorized),
        );
        let url = gate.endpoint(&["api", "notes"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/herbiverse/api/notes");
    }
}
