//! Resident identifiers.
//!
//! A resident is identified by a positive integer: the number of milliseconds since the Unix
//! epoch at the moment the record was created. Stored records keep the number as a plain JSON
//! integer.
//!
//! This crate provides:
//! - [`ResidentId`], a wrapper that guarantees the value is positive once constructed.
//! - [`ResidentIdGenerator`], which hands out strictly increasing identifiers even when two
//!   records are created within the same millisecond.

mod service;

pub use service::{ResidentId, ResidentIdGenerator};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
