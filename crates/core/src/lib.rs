//! # SATA Core
//!
//! Core business logic for the SATA resident registry.
//!
//! This crate contains the registration and admission rules and the record storage:
//! - Input masks for CPF, phone and CEP ([`format`])
//! - Field validation, including the CPF checksum ([`validation`])
//! - Listing filter and sort ([`listing`])
//! - The resident collection behind a [`ResidentStore`] trait, persisted as one JSON slot
//! - [`RegistryService`], which ties them together
//!
//! **No presentation concerns**: prompts, tables and exit codes belong in `sata-cli`.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod listing;
pub mod registry;
pub mod resident;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use error::{RegistryError, RegistryResult, StoreError, StoreResult};
pub use listing::{ListingQuery, SortOrder};
pub use registry::RegistryService;
pub use resident::{
    age_on, Address, Admission, AdmissionForm, Field, PersonalDetails, Resident, ResidentForm,
};
pub use store::{JsonFileStore, MemoryStore, ResidentStore};
pub use validation::{AdmissionRules, ValidationErrors};

pub use sata_id::ResidentId;
pub use sata_types::{AdmissionStatus, BrazilianState, Gender, NonEmptyText};
