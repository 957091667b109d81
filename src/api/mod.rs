//! REST client for the enrollment backend
//!
//! `ApiClient` wraps a pooled `reqwest::Client` and the configured base URL.
//! Resource calls go through the [`ResourceApi`] seam so the CRUD workflow
//! can run against any backend that speaks the same contract.
//!
//! Every call makes exactly one attempt. Failures collapse into a
//! [`RequestError`] whose message names the operation; response bodies of
//! failed calls are never read.

mod auth;
mod resource;

pub use resource::Resource;

use crate::session::SharedSession;
use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// What the failed call was trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    Login,
    Register,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Login => "login",
            Operation::Register => "register",
        }
    }
}

/// Why the call failed (kept for logs, never shown to the user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Transport(msg) => write!(f, "transport error: {}", msg),
            Cause::Status(code) => write!(f, "HTTP {}", code),
            Cause::Decode(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

/// A failed backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub operation: Operation,
    /// What was being operated on ("PAC", "asignaturas"); empty for auth calls
    pub subject: &'static str,
    pub cause: Cause,
}

impl RequestError {
    pub fn new(operation: Operation, subject: &'static str, cause: Cause) -> Self {
        Self {
            operation,
            subject,
            cause,
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            Cause::Status(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "Failed to {}", self.operation.verb())
        } else {
            write!(f, "Failed to {} {}", self.operation.verb(), self.subject)
        }
    }
}

impl std::error::Error for RequestError {}

// ─────────────────────────────────────────────────────────────────────────────
// Resource seam
// ─────────────────────────────────────────────────────────────────────────────

/// List/create/update/delete for any [`Resource`]
///
/// Implementations read the session token when the request is built and
/// must not touch any other shared state.
pub trait ResourceApi: Send + Sync {
    fn list<R: Resource>(
        &self,
        session: &SharedSession,
    ) -> impl Future<Output = Result<Vec<R>, RequestError>> + Send;

    /// `Ok(None)` when the server accepted the write but did not echo the entity
    fn create<R: Resource>(
        &self,
        session: &SharedSession,
        payload: &R::Payload,
    ) -> impl Future<Output = Result<Option<R>, RequestError>> + Send;

    /// `Ok(None)` when the server accepted the write but did not echo the entity
    fn update<R: Resource>(
        &self,
        session: &SharedSession,
        id: &str,
        payload: &R::Payload,
    ) -> impl Future<Output = Result<Option<R>, RequestError>> + Send;

    fn delete<R: Resource>(
        &self,
        session: &SharedSession,
        id: &str,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP implementation of the backend contract
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given base URL
    ///
    /// No request timeout is set; the transport default applies.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }

    fn item_url(&self, path: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, path, id)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token, if the session holds one
    ///
    /// Without a token the request goes out bare and the server decides.
    fn authorized(&self, req: RequestBuilder, session: &SharedSession) -> RequestBuilder {
        match session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send once and map transport failures and non-2xx statuses
    async fn send(
        req: RequestBuilder,
        operation: Operation,
        subject: &'static str,
    ) -> Result<Response, RequestError> {
        let response = req.send().await.map_err(|e| {
            let err = RequestError::new(operation, subject, Cause::Transport(e.to_string()));
            tracing::warn!("{}: {}", err, err.cause);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = RequestError::new(operation, subject, Cause::Status(status.as_u16()));
            tracing::warn!("{}: {}", err, err.cause);
            return Err(err);
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        operation: Operation,
        subject: &'static str,
    ) -> Result<T, RequestError> {
        response.json::<T>().await.map_err(|e| {
            let err = RequestError::new(operation, subject, Cause::Decode(e.to_string()));
            tracing::warn!("{}: {}", err, err.cause);
            err
        })
    }

    /// Decode the echoed entity of a write that already succeeded
    ///
    /// The write is applied server-side at this point, so an unexpected body
    /// is logged and dropped rather than reported as a failure.
    async fn decode_echo<R: Resource>(response: Response, operation: Operation) -> Option<R> {
        match response.json::<R>().await {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::debug!("{} {}: response body ignored ({})", operation.verb(), R::LABEL, e);
                None
            }
        }
    }
}

impl ResourceApi for ApiClient {
    async fn list<R: Resource>(&self, session: &SharedSession) -> Result<Vec<R>, RequestError> {
        let url = self.collection_url(R::PATH);
        tracing::debug!("GET {}", url);
        let req = self.authorized(self.client.get(&url), session);
        let response = Self::send(req, Operation::Fetch, R::PLURAL).await?;
        Self::decode(response, Operation::Fetch, R::PLURAL).await
    }

    async fn create<R: Resource>(
        &self,
        session: &SharedSession,
        payload: &R::Payload,
    ) -> Result<Option<R>, RequestError> {
        let url = self.collection_url(R::PATH);
        tracing::debug!("POST {}", url);
        let req = self.authorized(self.client.post(&url).json(payload), session);
        let response = Self::send(req, Operation::Create, R::LABEL).await?;
        Ok(Self::decode_echo(response, Operation::Create).await)
    }

    async fn update<R: Resource>(
        &self,
        session: &SharedSession,
        id: &str,
        payload: &R::Payload,
    ) -> Result<Option<R>, RequestError> {
        let url = self.item_url(R::PATH, id);
        tracing::debug!("PUT {}", url);
        let req = self.authorized(self.client.put(&url).json(payload), session);
        let response = Self::send(req, Operation::Update, R::LABEL).await?;
        Ok(Self::decode_echo(response, Operation::Update).await)
    }

    async fn delete<R: Resource>(&self, session: &SharedSession, id: &str) -> Result<(), RequestError> {
        let url = self.item_url(R::PATH, id);
        tracing::debug!("DELETE {}", url);
        let req = self.authorized(self.client.delete(&url), session);
        // Body is ignored: some deployments answer 204, others echo the entity
        Self::send(req, Operation::Delete, R::LABEL).await?;
        Ok(())
    }
}

/// Serve a router on an ephemeral port and return its base URL
#[cfg(test)]
pub(crate) async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
