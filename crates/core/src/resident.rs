//! Resident records and their editable working copies.
//!
//! A [`Resident`] is the typed, validated record the store persists. The registration and
//! admission screens edit a [`ResidentForm`] / [`AdmissionForm`] instead: plain text for every
//! field, masked as the user types, and only turned into typed values once the whole form
//! validates (see [`crate::validation`]).

use crate::constants::ISO_DATE_FORMAT;
use crate::error::{RegistryError, RegistryResult};
use crate::format::{format_phone, format_postal_code, format_tax_id};
use chrono::{Datelike, NaiveDate};
use sata_id::ResidentId;
use sata_types::{AdmissionStatus, BrazilianState, Gender, NonEmptyText};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// FIELDS
// ============================================================================

/// Every editable field of a resident, personal and admission alike.
///
/// Validation errors are keyed by `Field`; its stored name matches the key used in the
/// persisted record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    BirthDate,
    Gender,
    NationalId,
    TaxId,
    HealthCard,
    Phone,
    Street,
    Number,
    Complement,
    City,
    State,
    PostalCode,
    EntryDate,
    Ward,
    Bed,
    Notes,
}

impl Field {
    pub const PERSONAL: [Field; 13] = [
        Field::Name,
        Field::BirthDate,
        Field::Gender,
        Field::NationalId,
        Field::TaxId,
        Field::HealthCard,
        Field::Phone,
        Field::Street,
        Field::Number,
        Field::Complement,
        Field::City,
        Field::State,
        Field::PostalCode,
    ];

    pub const ADMISSION: [Field; 4] = [Field::EntryDate, Field::Ward, Field::Bed, Field::Notes];

    /// Key used for this field in the stored record.
    pub fn stored_name(self) -> &'static str {
        match self {
            Field::Name => "nome",
            Field::BirthDate => "dataNascimento",
            Field::Gender => "genero",
            Field::NationalId => "rg",
            Field::TaxId => "cpf",
            Field::HealthCard => "cartaoSus",
            Field::Phone => "telefone",
            Field::Street => "rua",
            Field::Number => "numero",
            Field::Complement => "complemento",
            Field::City => "cidade",
            Field::State => "estado",
            Field::PostalCode => "cep",
            Field::EntryDate => "dataEntrada",
            Field::Ward => "quarto",
            Field::Bed => "cama",
            Field::Notes => "observacoes",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::BirthDate => "Birth date",
            Field::Gender => "Gender",
            Field::NationalId => "RG",
            Field::TaxId => "CPF",
            Field::HealthCard => "Cartão SUS",
            Field::Phone => "Phone",
            Field::Street => "Street",
            Field::Number => "Number",
            Field::Complement => "Complement",
            Field::City => "City",
            Field::State => "State",
            Field::PostalCode => "CEP",
            Field::EntryDate => "Entry date",
            Field::Ward => "Ward",
            Field::Bed => "Bed",
            Field::Notes => "Notes",
        }
    }

    pub fn is_admission(self) -> bool {
        Field::ADMISSION.contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stored_name())
    }
}

impl FromStr for Field {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::PERSONAL
            .into_iter()
            .chain(Field::ADMISSION)
            .find(|field| field.stored_name() == s)
            .ok_or_else(|| RegistryError::InvalidInput(format!("unknown field: '{s}'")))
    }
}

// ============================================================================
// TYPED RECORD
// ============================================================================

/// Identity and contact details of a resident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonalDetails {
    pub name: NonEmptyText,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    /// RG.
    pub national_id: NonEmptyText,
    /// CPF, kept in its masked form.
    pub tax_id: String,
    /// Cartão SUS number, as typed.
    pub health_card: String,
    /// Masked phone number.
    pub phone: String,
}

/// Postal address of a resident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    pub street: NonEmptyText,
    pub number: NonEmptyText,
    pub complement: Option<String>,
    pub city: NonEmptyText,
    pub state: BrazilianState,
    /// Masked CEP.
    pub postal_code: String,
}

/// Internment details, present once a resident has been admitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Admission {
    pub entry_date: Option<NaiveDate>,
    pub ward: String,
    pub bed: String,
    pub notes: String,
}

/// A registered resident.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resident {
    pub id: ResidentId,
    pub personal: PersonalDetails,
    pub address: Address,
    /// Age in whole years at the last personal save.
    pub age: u32,
    pub admission: Option<Admission>,
}

impl Resident {
    pub fn status(&self) -> AdmissionStatus {
        if self.admission.is_some() {
            AdmissionStatus::Admitted
        } else {
            AdmissionStatus::NotAdmitted
        }
    }

    /// Ward of the current admission, or `""` when not admitted.
    pub fn ward(&self) -> &str {
        self.admission.as_ref().map_or("", |a| a.ward.as_str())
    }

    pub fn entry_date(&self) -> Option<NaiveDate> {
        self.admission.as_ref().and_then(|a| a.entry_date)
    }
}

/// Whole years between `birth_date` and `today`; zero for dates in the future.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

// ============================================================================
// WORKING COPIES
// ============================================================================

/// Working copy of the personal and address fields, as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResidentForm {
    pub name: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    pub gender: String,
    pub national_id: String,
    pub tax_id: String,
    pub health_card: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ResidentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills the form from a stored resident, for editing.
    pub fn from_resident(resident: &Resident) -> Self {
        let personal = &resident.personal;
        let address = &resident.address;
        Self {
            name: personal.name.to_string(),
            birth_date: personal.birth_date.format(ISO_DATE_FORMAT).to_string(),
            gender: personal.gender.as_wire().to_string(),
            national_id: personal.national_id.to_string(),
            tax_id: personal.tax_id.clone(),
            health_card: personal.health_card.clone(),
            phone: personal.phone.clone(),
            street: address.street.to_string(),
            number: address.number.to_string(),
            complement: address.complement.clone().unwrap_or_default(),
            city: address.city.to_string(),
            state: address.state.code().to_string(),
            postal_code: address.postal_code.clone(),
        }
    }

    /// Applies one input change, masking CPF, phone and CEP as they are typed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] for admission fields, which live on
    /// [`AdmissionForm`].
    pub fn set(&mut self, field: Field, value: &str) -> RegistryResult<()> {
        let slot = match field {
            Field::TaxId => {
                self.tax_id = format_tax_id(value);
                return Ok(());
            }
            Field::Phone => {
                self.phone = format_phone(value);
                return Ok(());
            }
            Field::PostalCode => {
                self.postal_code = format_postal_code(value);
                return Ok(());
            }
            Field::Name => &mut self.name,
            Field::BirthDate => &mut self.birth_date,
            Field::Gender => &mut self.gender,
            Field::NationalId => &mut self.national_id,
            Field::HealthCard => &mut self.health_card,
            Field::Street => &mut self.street,
            Field::Number => &mut self.number,
            Field::Complement => &mut self.complement,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::EntryDate | Field::Ward | Field::Bed | Field::Notes => {
                return Err(RegistryError::InvalidInput(format!(
                    "{field} is an admission field"
                )));
            }
        };
        *slot = value.to_string();
        Ok(())
    }
}

/// Working copy of the admission fields, as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmissionForm {
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub entry_date: String,
    pub ward: String,
    pub bed: String,
    pub notes: String,
}

impl AdmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills the form from a resident's current admission, if any.
    pub fn from_resident(resident: &Resident) -> Self {
        match &resident.admission {
            Some(admission) => Self {
                entry_date: admission
                    .entry_date
                    .map(|d| d.format(ISO_DATE_FORMAT).to_string())
                    .unwrap_or_default(),
                ward: admission.ward.clone(),
                bed: admission.bed.clone(),
                notes: admission.notes.clone(),
            },
            None => Self::default(),
        }
    }

    /// Applies one input change.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] for personal or address fields.
    pub fn set(&mut self, field: Field, value: &str) -> RegistryResult<()> {
        let slot = match field {
            Field::EntryDate => &mut self.entry_date,
            Field::Ward => &mut self.ward,
            Field::Bed => &mut self.bed,
            Field::Notes => &mut self.notes,
            other => {
                return Err(RegistryError::InvalidInput(format!(
                    "{other} is not an admission field"
                )));
            }
        };
        *slot = value.to_string();
        Ok(())
    }
}
