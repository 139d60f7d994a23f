//! Validated primitives shared across the SATA registry crates.
//!
//! These types sit below `sata-core` so that the enumerations used on disk (gender, state,
//! admission status) have exactly one definition and one wire spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Error returned when a string does not name a known enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Gender
// ============================================================================

/// Resident gender as offered by the registration form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    Male,
    #[serde(rename = "Feminino")]
    Female,
    #[serde(rename = "Outro")]
    Other,
}

impl Gender {
    /// Stored spelling.
    pub fn as_wire(self) -> &'static str {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Feminino",
            Gender::Other => "Outro",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    /// Accepts the stored spelling or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculino" | "male" | "m" => Ok(Gender::Male),
            "feminino" | "female" | "f" => Ok(Gender::Female),
            "outro" | "other" => Ok(Gender::Other),
            _ => Err(ParseEnumError::new("gender", s)),
        }
    }
}

// ============================================================================
// Brazilian states
// ============================================================================

/// The 27 federative units (UF) accepted in an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum BrazilianState {
    AC,
    AL,
    AP,
    AM,
    BA,
    CE,
    DF,
    ES,
    GO,
    MA,
    MT,
    MS,
    MG,
    PA,
    PB,
    PR,
    PE,
    PI,
    RJ,
    RN,
    RS,
    RO,
    RR,
    SC,
    SP,
    SE,
    TO,
}

impl BrazilianState {
    /// All codes, in the order the form lists them.
    pub const ALL: [BrazilianState; 27] = [
        BrazilianState::AC,
        BrazilianState::AL,
        BrazilianState::AP,
        BrazilianState::AM,
        BrazilianState::BA,
        BrazilianState::CE,
        BrazilianState::DF,
        BrazilianState::ES,
        BrazilianState::GO,
        BrazilianState::MA,
        BrazilianState::MT,
        BrazilianState::MS,
        BrazilianState::MG,
        BrazilianState::PA,
        BrazilianState::PB,
        BrazilianState::PR,
        BrazilianState::PE,
        BrazilianState::PI,
        BrazilianState::RJ,
        BrazilianState::RN,
        BrazilianState::RS,
        BrazilianState::RO,
        BrazilianState::RR,
        BrazilianState::SC,
        BrazilianState::SP,
        BrazilianState::SE,
        BrazilianState::TO,
    ];

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            BrazilianState::AC => "AC",
            BrazilianState::AL => "AL",
            BrazilianState::AP => "AP",
            BrazilianState::AM => "AM",
            BrazilianState::BA => "BA",
            BrazilianState::CE => "CE",
            BrazilianState::DF => "DF",
            BrazilianState::ES => "ES",
            BrazilianState::GO => "GO",
            BrazilianState::MA => "MA",
            BrazilianState::MT => "MT",
            BrazilianState::MS => "MS",
            BrazilianState::MG => "MG",
            BrazilianState::PA => "PA",
            BrazilianState::PB => "PB",
            BrazilianState::PR => "PR",
            BrazilianState::PE => "PE",
            BrazilianState::PI => "PI",
            BrazilianState::RJ => "RJ",
            BrazilianState::RN => "RN",
            BrazilianState::RS => "RS",
            BrazilianState::RO => "RO",
            BrazilianState::RR => "RR",
            BrazilianState::SC => "SC",
            BrazilianState::SP => "SP",
            BrazilianState::SE => "SE",
            BrazilianState::TO => "TO",
        }
    }

    /// Full state name.
    pub fn name(self) -> &'static str {
        match self {
            BrazilianState::AC => "Acre",
            BrazilianState::AL => "Alagoas",
            BrazilianState::AP => "Amapá",
            BrazilianState::AM => "Amazonas",
            BrazilianState::BA => "Bahia",
            BrazilianState::CE => "Ceará",
            BrazilianState::DF => "Distrito Federal",
            BrazilianState::ES => "Espírito Santo",
            BrazilianState::GO => "Goiás",
            BrazilianState::MA => "Maranhão",
            BrazilianState::MT => "Mato Grosso",
            BrazilianState::MS => "Mato Grosso do Sul",
            BrazilianState::MG => "Minas Gerais",
            BrazilianState::PA => "Pará",
            BrazilianState::PB => "Paraíba",
            BrazilianState::PR => "Paraná",
            BrazilianState::PE => "Pernambuco",
            BrazilianState::PI => "Piauí",
            BrazilianState::RJ => "Rio de Janeiro",
            BrazilianState::RN => "Rio Grande do Norte",
            BrazilianState::RS => "Rio Grande do Sul",
            BrazilianState::RO => "Rondônia",
            BrazilianState::RR => "Roraima",
            BrazilianState::SC => "Santa Catarina",
            BrazilianState::SP => "São Paulo",
            BrazilianState::SE => "Sergipe",
            BrazilianState::TO => "Tocantins",
        }
    }
}

impl fmt::Display for BrazilianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BrazilianState {
    type Err = ParseEnumError;

    /// Parses a two-letter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BrazilianState::ALL
            .into_iter()
            .find(|state| state.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseEnumError::new("state", s))
    }
}

// ============================================================================
// Admission status
// ============================================================================

/// Whether a resident currently has an admission record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmissionStatus {
    #[default]
    #[serde(rename = "nao_internado")]
    NotAdmitted,
    #[serde(rename = "internado")]
    Admitted,
}

impl AdmissionStatus {
    /// Stored spelling.
    pub fn as_wire(self) -> &'static str {
        match self {
            AdmissionStatus::NotAdmitted => "nao_internado",
            AdmissionStatus::Admitted => "internado",
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for AdmissionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nao_internado" | "not-admitted" | "not_admitted" => Ok(AdmissionStatus::NotAdmitted),
            "internado" | "admitted" => Ok(AdmissionStatus::Admitted),
            _ => Err(ParseEnumError::new("admission status", s)),
        }
    }
}
