//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Nothing
//! in the core reads environment variables while handling an operation.

use crate::constants::SLOT_FILE_EXTENSION;
use crate::validation::AdmissionRules;
use crate::{RegistryError, RegistryResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    slot_name: String,
    admission_rules: AdmissionRules,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] if `slot_name` is not a safe file stem.
    pub fn new(
        data_dir: PathBuf,
        slot_name: String,
        admission_rules: AdmissionRules,
    ) -> RegistryResult<Self> {
        validate_slot_name(&slot_name)?;

        Ok(Self {
            data_dir,
            slot_name,
            admission_rules,
        })
    }

    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    /// `<data_dir>/<slot_name>.json`
    pub fn slot_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.slot_name, SLOT_FILE_EXTENSION))
    }

    pub fn admission_rules(&self) -> &AdmissionRules {
        &self.admission_rules
    }
}

/// Validates that a slot name can be used as a file stem.
///
/// Only ASCII alphanumerics, `-` and `_` are accepted, which rules out path separators and
/// hidden files.
pub fn validate_slot_name(slot_name: &str) -> RegistryResult<()> {
    const MAX_SLOT_LEN: usize = 64;

    if slot_name.trim().is_empty() {
        return Err(RegistryError::InvalidInput(
            "slot name cannot be empty".into(),
        ));
    }

    if slot_name.len() > MAX_SLOT_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "slot name exceeds maximum length of {} characters",
            MAX_SLOT_LEN
        )));
    }

    let ok = slot_name
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if !ok {
        return Err(RegistryError::InvalidInput(
            "slot name contains invalid characters (only alphanumeric, '-', '_' allowed)".into(),
        ));
    }

    Ok(())
}

/// Parse admission rules from YAML text.
pub fn admission_rules_from_yaml(yaml_text: &str) -> RegistryResult<AdmissionRules> {
    serde_yaml::from_str(yaml_text).map_err(RegistryError::YamlDeserialization)
}

/// Load admission rules from an optional file path.
///
/// If `path` is `None`, returns the default rules (nothing enforced).
pub fn admission_rules_from_path(path: Option<&Path>) -> RegistryResult<AdmissionRules> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(RegistryError::ConfigRead)?;
            admission_rules_from_yaml(&text)
        }
        None => Ok(AdmissionRules::default()),
    }
}
