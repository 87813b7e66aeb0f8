//! Session Access
//!
//! The logged-in user is persisted by the host in a key-value store under a
//! fixed key. The core never writes it; it only takes immutable snapshots
//! through a `SessionProvider`, once per navigation.
//!
//! - `StorageSession`: reads the JSON entry from any `KeyValueStorage`
//! - `StaticSession`: fixed snapshot for tests and the CLI
//! - `MemoryStorage` / `FileStorage`: storage backends

mod storage;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use std::sync::Arc;
use thiserror::Error;

use crate::model::Session;

/// Key under which the host persists the logged-in user
pub const SESSION_KEY: &str = "user";

/// Source of session snapshots
pub trait SessionProvider: Send + Sync {
    /// Current user, if anyone is logged in
    fn current(&self) -> Option<Session>;
}

/// Errors reading persisted session storage
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed storage file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for session storage operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session provider backed by persisted key-value storage
pub struct StorageSession {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl StorageSession {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl SessionProvider for StorageSession {
    fn current(&self) -> Option<Session> {
        let raw = self.storage.get_item(&self.key)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Ignoring malformed session entry");
                None
            }
        }
    }
}

/// Provider that always returns the same snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<Session>);

impl StaticSession {
    pub fn new(session: Session) -> Self {
        Self(Some(session))
    }

    /// Nobody logged in
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<Session> {
        self.0.clone()
    }
}
