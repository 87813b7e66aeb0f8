//! Router error types

use thiserror::Error;

/// Errors building a router
#[derive(Error, Debug, PartialEq)]
pub enum RouterError {
    /// The element the router renders into does not exist
    #[error("Root element not found: #{0}")]
    RootMissing(String),
}

/// Result type alias for router construction
pub type RouterResult<T> = Result<T, RouterError>;
