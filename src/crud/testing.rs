//! In-memory backend for workflow tests

use crate::api::{Cause, Operation, RequestError, Resource, ResourceApi};
use crate::model::User;
use crate::session::SharedSession;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBackend {
    rows: Mutex<HashMap<&'static str, Vec<Value>>>,
    failing: Mutex<HashSet<(&'static str, Operation)>>,
    calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session the fake accepts
    pub fn session() -> SharedSession {
        let session = SharedSession::new();
        session.login(
            User {
                email: "admin@unah.hn".to_string(),
            },
            "fake-token".to_string(),
        );
        session
    }

    pub fn seed(&self, path: &'static str, rows: Vec<Value>) {
        self.rows.lock().unwrap().insert(path, rows);
    }

    /// Make every `operation` on `path` answer 500
    pub fn fail(&self, path: &'static str, operation: Operation) {
        self.failing.lock().unwrap().insert((path, operation));
    }

    pub fn remove(&self, path: &'static str, id: &str) {
        if let Some(rows) = self.rows.lock().unwrap().get_mut(path) {
            rows.retain(|row| row["_id"] != id);
        }
    }

    pub fn stored(&self, path: &'static str) -> Vec<Value> {
        self.rows
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// Requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Common preamble: count, yield like a real round trip, check auth
    async fn enter<R: Resource>(
        &self,
        session: &SharedSession,
        operation: Operation,
    ) -> Result<(), RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let subject = match operation {
            Operation::Fetch => R::PLURAL,
            _ => R::LABEL,
        };
        if session.token().is_none() {
            return Err(RequestError::new(operation, subject, Cause::Status(401)));
        }
        if self.failing.lock().unwrap().contains(&(R::PATH, operation)) {
            return Err(RequestError::new(operation, subject, Cause::Status(500)));
        }
        Ok(())
    }

    fn decode<R: Resource>(value: Value, operation: Operation) -> Result<R, RequestError> {
        serde_json::from_value(value)
            .map_err(|e| RequestError::new(operation, R::LABEL, Cause::Decode(e.to_string())))
    }

    fn with_id<R: Resource>(payload: &R::Payload, id: &str) -> Value {
        let mut value = serde_json::to_value(payload).unwrap();
        value["_id"] = Value::String(id.to_string());
        value
    }
}

impl ResourceApi for FakeBackend {
    async fn list<R: Resource>(&self, session: &SharedSession) -> Result<Vec<R>, RequestError> {
        self.enter::<R>(session, Operation::Fetch).await?;
        self.stored(R::PATH)
            .into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    RequestError::new(Operation::Fetch, R::PLURAL, Cause::Decode(e.to_string()))
                })
            })
            .collect()
    }

    async fn create<R: Resource>(
        &self,
        session: &SharedSession,
        payload: &R::Payload,
    ) -> Result<Option<R>, RequestError> {
        self.enter::<R>(session, Operation::Create).await?;
        let id = format!("gen-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let row = Self::with_id::<R>(payload, &id);
        self.rows
            .lock()
            .unwrap()
            .entry(R::PATH)
            .or_default()
            .push(row.clone());
        Self::decode(row, Operation::Create).map(Some)
    }

    async fn update<R: Resource>(
        &self,
        session: &SharedSession,
        id: &str,
        payload: &R::Payload,
    ) -> Result<Option<R>, RequestError> {
        self.enter::<R>(session, Operation::Update).await?;
        let row = Self::with_id::<R>(payload, id);
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .get_mut(R::PATH)
            .and_then(|rows| rows.iter_mut().find(|r| r["_id"] == id))
            .ok_or_else(|| RequestError::new(Operation::Update, R::LABEL, Cause::Status(404)))?;
        *slot = row.clone();
        drop(rows);
        Self::decode(row, Operation::Update).map(Some)
    }

    async fn delete<R: Resource>(&self, session: &SharedSession, id: &str) -> Result<(), RequestError> {
        self.enter::<R>(session, Operation::Delete).await?;
        let mut rows = self.rows.lock().unwrap();
        let rows = rows
            .get_mut(R::PATH)
            .ok_or_else(|| RequestError::new(Operation::Delete, R::LABEL, Cause::Status(404)))?;
        let before = rows.len();
        rows.retain(|r| r["_id"] != id);
        if rows.len() == before {
            return Err(RequestError::new(Operation::Delete, R::LABEL, Cause::Status(404)));
        }
        Ok(())
    }
}
