//! Error types for the resident store and the registry operations.

use crate::validation::ValidationErrors;
use sata_id::ResidentId;

/// Failures of the Record Store collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read resident slot: {0}")]
    Read(std::io::Error),
    #[error("failed to write resident slot: {0}")]
    Write(std::io::Error),
    #[error("failed to serialize residents: {0}")]
    Serialization(serde_json::Error),
    #[error("stored residents are unreadable: {0}")]
    Parse(String),
    #[error("stored resident #{index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("resident {0} not found")]
    NotFound(ResidentId),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid resident id: {0}")]
    Id(#[from] sata_id::IdError),
    #[error("failed to read configuration file: {0}")]
    ConfigRead(std::io::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
