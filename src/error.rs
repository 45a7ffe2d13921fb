//! Error handling for the HRMS client
//!
//! Every operation reports failure through [`Error`]. The message carried by
//! a variant is human-readable and meant to be shown to the user verbatim,
//! so the `Display` form adds no prefix of its own.

use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the HRMS client
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected, either by the server or by local draft validation
    #[error("{0}")]
    Validation(String),

    /// An `employee_id` collision in the local store
    #[error("{0}")]
    DuplicateKey(String),

    /// A local update or lookup targeted a record that does not exist
    #[error("{0}")]
    NotFound(String),

    /// A bounded remote call did not return before its deadline
    #[error("{0}")]
    Timeout(String),

    /// Any other non-success transport or response outcome
    #[error("{0}")]
    RequestFailed(String),

    /// Client construction or configuration misuse
    #[error("{0}")]
    Config(String),

    /// The local store could not be read or written
    #[error("{0}")]
    Storage(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new duplicate-key error
    pub fn duplicate_key<T: fmt::Display>(msg: T) -> Self {
        Error::DuplicateKey(msg.to_string())
    }

    /// Create a new not-found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Error::NotFound(msg.to_string())
    }

    /// Create a new timeout error
    pub fn timeout<T: fmt::Display>(msg: T) -> Self {
        Error::Timeout(msg.to_string())
    }

    /// Create a new request-failed error
    pub fn request_failed<T: fmt::Display>(msg: T) -> Self {
        Error::RequestFailed(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }
}
