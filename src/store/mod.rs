//! Remote Store
//!
//! Asynchronous data-access boundary for bill and receipt-file resources.
//! Containers only see the traits; the concrete store is chosen by the host:
//!
//! - **memory**: in-process store seeded from fixtures, with failure injection
//! - **http**: REST client for the Billed backend
//!
//! # Example
//!
//! ```rust,no_run
//! use billed::store::{MemoryStore, RemoteStore};
//!
//! # async fn demo() -> Result<(), billed::store::StoreError> {
//! let store = MemoryStore::with_fixtures();
//! let bills = store.bills().list().await?;
//! println!("{} bills", bills.len());
//! # Ok(())
//! # }
//! ```

mod http;
mod memory;

pub use http::{decode_bills, HttpStore, HttpStoreConfig};
pub use memory::{MemoryStore, Operation, StoreCall};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Bill, Created, FileUpload, NewBill, UploadResult};

/// Handle exposing one sub-client per resource
pub trait RemoteStore: Send + Sync {
    fn bills(&self) -> &dyn BillsResource;
    fn files(&self) -> &dyn FilesResource;
}

/// Bill records
#[async_trait]
pub trait BillsResource: Send + Sync {
    /// Bills visible to the authenticated caller
    async fn list(&self) -> StoreResult<Vec<Bill>>;

    async fn create(&self, bill: NewBill) -> StoreResult<Created>;

    async fn update(&self, id: &str, bill: Bill) -> StoreResult<Created>;
}

/// Receipt files
#[async_trait]
pub trait FilesResource: Send + Sync {
    /// Upload a receipt on behalf of `email`
    async fn create(&self, file: FileUpload, email: &str) -> StoreResult<UploadResult>;
}

/// Errors reported by a remote store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Operation rejected with a human-readable message
    #[error("{0}")]
    Rejected(String),

    /// Server answered with an error status
    #[error("Erreur {0}")]
    Status(u16),

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Referenced bill does not exist
    #[error("Bill not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            StoreError::Status(status.as_u16())
        } else if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::Rejected("Erreur 404".into()).to_string(), "Erreur 404");
        assert_eq!(StoreError::Status(500).to_string(), "Erreur 500");
        assert_eq!(
            StoreError::NotFound("abc".into()).to_string(),
            "Bill not found: abc"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<Bill>("{").unwrap_err();
        assert!(matches!(StoreError::from(err), StoreError::Decode(_)));
    }
}
