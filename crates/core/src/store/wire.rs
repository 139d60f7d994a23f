//! On-disk representation of the resident slot.
//!
//! The slot is a single JSON array. Each element keeps the keys the registry has always
//! written (`nome`, `dataNascimento`, `cpf`, ...), so existing data stays readable. Admission
//! keys are written as empty strings while a resident is not admitted.
//!
//! Parsing uses `serde_path_to_error` so a schema mismatch names the failing element and key
//! (e.g. `[3].idade`).

use crate::constants::ISO_DATE_FORMAT;
use crate::error::{StoreError, StoreResult};
use crate::resident::{Address, Admission, Field, PersonalDetails, Resident};
use crate::validation::{parse_entry_date, parse_iso_date};
use sata_id::ResidentId;
use sata_types::{AdmissionStatus, BrazilianState, Gender, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Parses the text of a slot into residents.
pub fn parse_slot(text: &str) -> StoreResult<Vec<Resident>> {
    let mut deserializer = serde_json::Deserializer::from_str(text);

    let wires: Vec<ResidentWire> = match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(StoreError::Parse(format!(
                "resident schema mismatch at {path}: {source}"
            )));
        }
    };
    deserializer
        .end()
        .map_err(|e| StoreError::Parse(format!("trailing data after resident array: {e}")))?;

    wires
        .into_iter()
        .enumerate()
        .map(|(index, wire)| {
            wire_to_domain(wire).map_err(|reason| StoreError::InvalidRecord { index, reason })
        })
        .collect()
}

/// Renders residents as the text of a slot.
pub fn render_slot(residents: &[Resident]) -> StoreResult<String> {
    let wires: Vec<ResidentWire> = residents.iter().map(domain_to_wire).collect();
    serde_json::to_string_pretty(&wires).map_err(StoreError::Serialization)
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
struct ResidentWire {
    id: i64,

    #[serde(rename = "nome")]
    name: String,

    #[serde(rename = "dataNascimento")]
    birth_date: String,

    #[serde(rename = "genero")]
    gender: String,

    #[serde(rename = "rg")]
    national_id: String,

    #[serde(rename = "cpf")]
    tax_id: String,

    #[serde(rename = "cartaoSus")]
    health_card: String,

    #[serde(rename = "telefone")]
    phone: String,

    #[serde(rename = "rua")]
    street: String,

    #[serde(rename = "numero")]
    number: String,

    #[serde(rename = "complemento", default)]
    complement: String,

    #[serde(rename = "cidade")]
    city: String,

    #[serde(rename = "estado")]
    state: String,

    #[serde(rename = "cep")]
    postal_code: String,

    #[serde(rename = "idade", default)]
    age: u32,

    #[serde(default)]
    status: AdmissionStatus,

    #[serde(rename = "dataEntrada", default)]
    entry_date: String,

    #[serde(rename = "quarto", default)]
    ward: String,

    #[serde(rename = "cama", default)]
    bed: String,

    #[serde(rename = "observacoes", default)]
    notes: String,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn non_empty(field: Field, value: String) -> Result<NonEmptyText, String> {
    NonEmptyText::new(value).map_err(|_| format!("{field} is empty"))
}

fn wire_to_domain(wire: ResidentWire) -> Result<Resident, String> {
    let id = ResidentId::new(wire.id).map_err(|e| e.to_string())?;

    let birth_date = parse_iso_date(&wire.birth_date).ok_or_else(|| {
        format!(
            "{} is not a YYYY-MM-DD date: '{}'",
            Field::BirthDate,
            wire.birth_date
        )
    })?;
    let gender = wire
        .gender
        .parse::<Gender>()
        .map_err(|e| format!("{}: {e}", Field::Gender))?;
    let state = wire
        .state
        .parse::<BrazilianState>()
        .map_err(|e| format!("{}: {e}", Field::State))?;

    let admission = match wire.status {
        AdmissionStatus::NotAdmitted => None,
        AdmissionStatus::Admitted => {
            let entry_date = if wire.entry_date.trim().is_empty() {
                None
            } else {
                Some(parse_entry_date(&wire.entry_date).ok_or_else(|| {
                    format!(
                        "{} is not a valid date: '{}'",
                        Field::EntryDate,
                        wire.entry_date
                    )
                })?)
            };
            Some(Admission {
                entry_date,
                ward: wire.ward,
                bed: wire.bed,
                notes: wire.notes,
            })
        }
    };

    let complement = Some(wire.complement).filter(|c| !c.trim().is_empty());

    Ok(Resident {
        id,
        personal: PersonalDetails {
            name: non_empty(Field::Name, wire.name)?,
            birth_date,
            gender,
            national_id: non_empty(Field::NationalId, wire.national_id)?,
            tax_id: wire.tax_id,
            health_card: wire.health_card,
            phone: wire.phone,
        },
        address: Address {
            street: non_empty(Field::Street, wire.street)?,
            number: non_empty(Field::Number, wire.number)?,
            complement,
            city: non_empty(Field::City, wire.city)?,
            state,
            postal_code: wire.postal_code,
        },
        age: wire.age,
        admission,
    })
}

fn domain_to_wire(resident: &Resident) -> ResidentWire {
    let personal = &resident.personal;
    let address = &resident.address;
    let admission = resident.admission.clone().unwrap_or_default();

    ResidentWire {
        id: resident.id.get(),
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
        age: resident.age,
        status: resident.status(),
        entry_date: admission
            .entry_date
            .map(|d| d.format(ISO_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        ward: admission.ward,
        bed: admission.bed,
        notes: admission.notes,
    }
}
