//! Session store
//!
//! One `Session` per process, shared as an explicit context object. Login and
//! logout are the only writers; every resource call reads the token at the
//! moment it builds its request.

use crate::model::User;
use std::sync::{Arc, RwLock};

/// Authenticated identity and bearer credential
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle to the process-wide session
#[derive(Debug, Clone, Default)]
pub struct SharedSession(Arc<RwLock<Session>>);

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store identity and token after a successful login
    pub fn login(&self, user: User, token: String) {
        let mut session = self.0.write().unwrap_or_else(|e| e.into_inner());
        tracing::info!("Logged in as {}", user.email);
        session.user = Some(user);
        session.token = Some(token);
    }

    /// Drop identity and token
    pub fn logout(&self) {
        let mut session = self.0.write().unwrap_or_else(|e| e.into_inner());
        if let Some(user) = session.user.take() {
            tracing::info!("Logged out {}", user.email);
        }
        session.token = None;
    }

    /// Current bearer token, read at call time
    pub fn token(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .token
            .clone()
    }

    pub fn snapshot(&self) -> Session {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }
}
