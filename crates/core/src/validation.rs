//! Input validation for resident and admission forms.
//!
//! Each entry point returns a [`ValidationErrors`] map from [`Field`] to a message; a field that
//! is absent from the map is valid. Personal/address validation and admission validation are
//! independent and produce separate maps.

use crate::constants::{
    DISPLAY_DATE_FORMAT, HEALTH_CARD_DIGITS, ISO_DATE_FORMAT, MIN_NAME_CHARS,
    MIN_NATIONAL_ID_CHARS, MIN_PHONE_DIGITS, POSTAL_CODE_DIGITS, TAX_ID_DIGITS,
};
use crate::format::{digits_only, format_phone, format_postal_code, format_tax_id};
use crate::resident::{Address, Admission, AdmissionForm, Field, PersonalDetails, ResidentForm};
use chrono::NaiveDate;
use sata_types::{BrazilianState, Gender, NonEmptyText};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Banner shown above a form that failed validation.
pub const SUMMARY_MESSAGE: &str = "Please fix the errors in the form before submitting.";

/// Field-level validation failures, ordered by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn summary(&self) -> &'static str {
        SUMMARY_MESSAGE
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Records the error of `outcome` under `field` and passes the value through.
    fn check<T>(&mut self, field: Field, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(field, message);
                None
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// IDENTIFIER CHECKS
// ============================================================================

/// Checks a CPF's two check digits. Formatting characters are ignored.
///
/// Rejects anything that is not exactly eleven digits, and the eleven sequences of one
/// repeated digit, which satisfy the arithmetic but are not issued.
pub fn is_valid_tax_id(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != TAX_ID_DIGITS {
        return false;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Computes a CPF check digit over `digits` with weights counting down to 2.
pub fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, d)| d * (top - idx as u32))
        .sum();
    match (sum * 10) % 11 {
        10 => 0,
        remainder => remainder,
    }
}

/// A Cartão SUS number is valid when exactly fifteen digits remain after stripping formatting.
pub fn is_valid_health_card(input: &str) -> bool {
    digits_only(input).len() == HEALTH_CARD_DIGITS
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).ok()
}

/// Parses an entry date written either `DD/MM/YYYY` or `YYYY-MM-DD`.
pub fn parse_entry_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT)
        .ok()
        .or_else(|| parse_iso_date(input))
}

// ============================================================================
// RESIDENT FORM
// ============================================================================

fn required(value: &str, message: &str) -> Result<NonEmptyText, String> {
    NonEmptyText::new(value).map_err(|_| message.to_string())
}

fn check_min_chars(
    value: &str,
    min: usize,
    missing: &str,
    too_short: &str,
) -> Result<NonEmptyText, String> {
    let text = required(value, missing)?;
    if text.as_str().chars().count() < min {
        return Err(too_short.to_string());
    }
    Ok(text)
}

fn check_birth_date(value: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    if value.trim().is_empty() {
        return Err("Birth date is required".into());
    }
    let date = parse_iso_date(value).ok_or("Birth date is not a valid date")?;
    if date > today {
        return Err("Birth date cannot be in the future".into());
    }
    Ok(date)
}

fn check_gender(value: &str) -> Result<Gender, String> {
    if value.trim().is_empty() {
        return Err("Gender is required".into());
    }
    value
        .parse::<Gender>()
        .map_err(|_| "Gender is not one of the offered options".to_string())
}

fn check_tax_id(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("CPF is required".into());
    }
    if !is_valid_tax_id(value) {
        return Err("CPF is invalid".into());
    }
    Ok(format_tax_id(value))
}

fn check_health_card(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Cartão SUS is required".into());
    }
    if !is_valid_health_card(value) {
        return Err("Cartão SUS is invalid".into());
    }
    Ok(value.trim().to_string())
}

fn check_phone(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Phone is required".into());
    }
    if digits_only(value).len() < MIN_PHONE_DIGITS {
        return Err("Phone is invalid".into());
    }
    Ok(format_phone(value))
}

fn check_state(value: &str) -> Result<BrazilianState, String> {
    if value.trim().is_empty() {
        return Err("State is required".into());
    }
    value
        .parse::<BrazilianState>()
        .map_err(|_| "State is not a valid UF code".to_string())
}

fn check_postal_code(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("CEP is required".into());
    }
    if digits_only(value).len() != POSTAL_CODE_DIGITS {
        return Err("CEP is invalid".into());
    }
    Ok(format_postal_code(value))
}

/// Validates the personal and address fields of `form` as of `today`.
pub fn validate_resident(form: &ResidentForm, today: NaiveDate) -> ValidationErrors {
    parse_resident(form, today).err().unwrap_or_default()
}

/// Validates `form` and, when every field passes, converts it into typed details.
pub fn parse_resident(
    form: &ResidentForm,
    today: NaiveDate,
) -> Result<(PersonalDetails, Address), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = errors.check(
        Field::Name,
        check_min_chars(
            &form.name,
            MIN_NAME_CHARS,
            "Full name is required",
            "Full name must have at least 5 characters",
        ),
    );
    let birth_date = errors.check(Field::BirthDate, check_birth_date(&form.birth_date, today));
    let gender = errors.check(Field::Gender, check_gender(&form.gender));
    let national_id = errors.check(
        Field::NationalId,
        check_min_chars(
            &form.national_id,
            MIN_NATIONAL_ID_CHARS,
            "RG is required",
            "RG must have at least 7 digits",
        ),
    );
    let tax_id = errors.check(Field::TaxId, check_tax_id(&form.tax_id));
    let health_card = errors.check(Field::HealthCard, check_health_card(&form.health_card));
    let phone = errors.check(Field::Phone, check_phone(&form.phone));

    let street = errors.check(Field::Street, required(&form.street, "Street is required"));
    let number = errors.check(Field::Number, required(&form.number, "Number is required"));
    let city = errors.check(Field::City, required(&form.city, "City is required"));
    let state = errors.check(Field::State, check_state(&form.state));
    let postal_code = errors.check(Field::PostalCode, check_postal_code(&form.postal_code));

    let (
        Some(name),
        Some(birth_date),
        Some(gender),
        Some(national_id),
        Some(tax_id),
        Some(health_card),
        Some(phone),
    ) = (
        name,
        birth_date,
        gender,
        national_id,
        tax_id,
        health_card,
        phone,
    )
    else {
        return Err(errors);
    };
    let (Some(street), Some(number), Some(city), Some(state), Some(postal_code)) =
        (street, number, city, state, postal_code)
    else {
        return Err(errors);
    };

    let complement = Some(form.complement.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok((
        PersonalDetails {
            name,
            birth_date,
            gender,
            national_id,
            tax_id,
            health_card,
            phone,
        },
        Address {
            street,
            number,
            complement,
            city,
            state,
            postal_code,
        },
    ))
}

// ============================================================================
// ADMISSION FORM
// ============================================================================

/// Which admission fields are enforced.
///
/// The default enforces nothing: staff can save an admission with any subset of fields filled.
/// Missing keys in a rules file default to `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdmissionRules {
    pub require_entry_date: bool,
    pub require_ward: bool,
    pub require_bed: bool,
    pub reject_future_entry_date: bool,
}

impl AdmissionRules {
    /// Every rule enabled.
    pub fn strict() -> Self {
        Self {
            require_entry_date: true,
            require_ward: true,
            require_bed: true,
            reject_future_entry_date: true,
        }
    }
}

/// Validates the admission fields of `form` under `rules` as of `today`.
pub fn validate_admission(
    form: &AdmissionForm,
    today: NaiveDate,
    rules: &AdmissionRules,
) -> ValidationErrors {
    parse_admission(form, today, rules)
        .err()
        .unwrap_or_default()
}

/// Validates `form` and converts it into an [`Admission`].
///
/// An entry date that is filled in but cannot be parsed is always an error.
pub fn parse_admission(
    form: &AdmissionForm,
    today: NaiveDate,
    rules: &AdmissionRules,
) -> Result<Admission, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let entry_date = if form.entry_date.trim().is_empty() {
        if rules.require_entry_date {
            errors.insert(Field::EntryDate, "Entry date is required");
        }
        None
    } else {
        match parse_entry_date(&form.entry_date) {
            Some(date) if rules.reject_future_entry_date && date > today => {
                errors.insert(Field::EntryDate, "Entry date cannot be in the future");
                None
            }
            Some(date) => Some(date),
            None => {
                errors.insert(Field::EntryDate, "Entry date is not a valid date");
                None
            }
        }
    };

    if rules.require_ward && form.ward.trim().is_empty() {
        errors.insert(Field::Ward, "Ward is required");
    }
    if rules.require_bed && form.bed.trim().is_empty() {
        errors.insert(Field::Bed, "Bed is required");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Admission {
        entry_date,
        ward: form.ward.trim().to_string(),
        bed: form.bed.trim().to_string(),
        notes: form.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    /// CPF check digits computed the way the Receita Federal publishes them: weights 10..2 and
    /// 11..2, remainder of the sum mod 11, and 0 for remainders below 2.
    fn with_check_digits(base: &[u32]) -> String {
        let weighted = |digits: &[u32]| -> u32 {
            let sum: u32 = digits
                .iter()
                .zip((2..=digits.len() as u32 + 1).rev())
                .map(|(d, w)| d * w)
                .sum();
            match sum % 11 {
                0 | 1 => 0,
                r => 11 - r,
            }
        };
        let first = weighted(base);
        let mut digits = base.to_vec();
        digits.push(first);
        digits.push(weighted(&digits));
        digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect()
    }

    fn valid_form() -> ResidentForm {
        ResidentForm {
            name: "Maria da Silva".into(),
            birth_date: "1940-03-12".into(),
            gender: "Feminino".into(),
            national_id: "12345678".into(),
            tax_id: "529.982.247-25".into(),
            health_card: "898 0012 3456 7890".into(),
            phone: "(11) 98765-4321".into(),
            street: "Rua das Flores".into(),
            number: "120".into(),
            complement: String::new(),
            city: "São Paulo".into(),
            state: "SP".into(),
            postal_code: "01310-100".into(),
        }
    }

    #[test]
    fn known_tax_ids() {
        assert!(is_valid_tax_id("529.982.247-25"));
        assert!(is_valid_tax_id("52998224725"));
        assert!(is_valid_tax_id("083.358.948-25"));
        assert!(!is_valid_tax_id("529.982.247-26"));
        assert!(!is_valid_tax_id("345.675.677-78"));
        assert!(!is_valid_tax_id("5299822472"));
        assert!(!is_valid_tax_id("529982247255"));
        assert!(!is_valid_tax_id(""));
    }

    proptest! {
        #[test]
        fn repeated_digit_tax_ids_are_rejected(d in 0u32..=9, masked in any::<bool>()) {
            let raw: String = std::iter::repeat(char::from_digit(d, 10).unwrap())
                .take(11)
                .collect();
            let cpf = if masked { format_tax_id(&raw) } else { raw };
            prop_assert!(!is_valid_tax_id(&cpf), "{} should be rejected", cpf);
        }

        #[test]
        fn generated_tax_ids_are_accepted(base in prop::collection::vec(0u32..=9, 9)) {
            prop_assume!(base.iter().any(|d| *d != base[0]));
            let cpf = with_check_digits(&base);
            prop_assert!(is_valid_tax_id(&cpf), "{} should be accepted", cpf);
            prop_assert!(is_valid_tax_id(&format_tax_id(&cpf)));
        }

        #[test]
        fn altered_check_digit_is_rejected(
            base in prop::collection::vec(0u32..=9, 9),
            bump in 1u32..=9,
        ) {
            prop_assume!(base.iter().any(|d| *d != base[0]));
            let cpf = with_check_digits(&base);
            let mut digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
            digits[10] = (digits[10] + bump) % 10;
            let altered: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect();
            prop_assert!(!is_valid_tax_id(&altered), "{} should be rejected", altered);
        }
    }

    #[test]
    fn check_digit_matches_published_examples() {
        assert_eq!(check_digit(&[5, 2, 9, 9, 8, 2, 2, 4, 7]), 2);
        assert_eq!(check_digit(&[5, 2, 9, 9, 8, 2, 2, 4, 7, 2]), 5);
        assert_eq!(with_check_digits(&[5, 2, 9, 9, 8, 2, 2, 4, 7]), "52998224725");
    }

    #[test]
    fn health_card_needs_exactly_fifteen_digits() {
        assert!(is_valid_health_card("898001234567890"));
        assert!(is_valid_health_card("898 0012 3456 7890"));
        assert!(!is_valid_health_card("89800123456789"));
        assert!(!is_valid_health_card("8980012345678901"));
        assert!(!is_valid_health_card(""));
    }

    #[test]
    fn entry_dates_accept_both_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_entry_date("05/03/2024"), expected);
        assert_eq!(parse_entry_date("2024-03-05"), expected);
        assert_eq!(parse_entry_date("March 5"), None);
    }

    #[test]
    fn valid_form_has_no_errors() {
        let errors = validate_resident(&valid_form(), today());
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn parse_resident_keeps_optional_complement_absent_when_blank() {
        let (personal, address) = parse_resident(&valid_form(), today()).expect("valid");
        assert_eq!(personal.name.as_str(), "Maria da Silva");
        assert_eq!(personal.gender, Gender::Female);
        assert_eq!(address.state, BrazilianState::SP);
        assert_eq!(address.complement, None);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate_resident(&ResidentForm::default(), today());
        let expected = [
            Field::Name,
            Field::BirthDate,
            Field::Gender,
            Field::NationalId,
            Field::TaxId,
            Field::HealthCard,
            Field::Phone,
            Field::Street,
            Field::Number,
            Field::City,
            Field::State,
            Field::PostalCode,
        ];
        for field in expected {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains(Field::Complement));
        assert_eq!(errors.len(), expected.len());
        assert_eq!(errors.get(Field::Name), Some("Full name is required"));
    }

    #[test]
    fn short_name_and_national_id_are_rejected() {
        let mut form = valid_form();
        form.name = "Ana".into();
        form.national_id = " 12345 ".into();
        let errors = validate_resident(&form, today());
        assert_eq!(
            errors.get(Field::Name),
            Some("Full name must have at least 5 characters")
        );
        assert_eq!(
            errors.get(Field::NationalId),
            Some("RG must have at least 7 digits")
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn padding_does_not_count_toward_minimum_lengths() {
        let mut form = valid_form();
        form.name = "Ana  ".into();
        form.national_id = "12345  ".into();
        let errors = validate_resident(&form, today());
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::NationalId));

        form.name = "  Maria  ".into();
        form.national_id = " 1234567 ".into();
        let (personal, _) = parse_resident(&form, today()).expect("valid after trimming");
        assert_eq!(personal.name.as_str(), "Maria");
        assert_eq!(personal.national_id.as_str(), "1234567");
    }

    #[test]
    fn parse_resident_masks_raw_identifiers() {
        let mut form = valid_form();
        form.tax_id = "52998224725".into();
        form.phone = "11987654321".into();
        form.postal_code = " 01310100 ".into();

        let (personal, address) = parse_resident(&form, today()).expect("valid");
        assert_eq!(personal.tax_id, "529.982.247-25");
        assert_eq!(personal.phone, "(11) 98765-4321");
        assert_eq!(address.postal_code, "01310-100");
    }

    #[test]
    fn birth_date_cannot_be_in_the_future_but_today_is_fine() {
        let mut form = valid_form();
        form.birth_date = "2025-06-02".into();
        let errors = validate_resident(&form, today());
        assert_eq!(
            errors.get(Field::BirthDate),
            Some("Birth date cannot be in the future")
        );

        form.birth_date = "2025-06-01".into();
        assert!(validate_resident(&form, today()).is_empty());

        form.birth_date = "12/03/1940".into();
        assert_eq!(
            validate_resident(&form, today()).get(Field::BirthDate),
            Some("Birth date is not a valid date")
        );
    }

    #[test]
    fn identifier_fields_are_checked() {
        let mut form = valid_form();
        form.tax_id = "111.111.111-11".into();
        form.health_card = "1234".into();
        form.phone = "(11) 9876".into();
        form.postal_code = "01310-10".into();
        form.state = "XX".into();
        let errors = validate_resident(&form, today());
        assert_eq!(errors.get(Field::TaxId), Some("CPF is invalid"));
        assert_eq!(errors.get(Field::HealthCard), Some("Cartão SUS is invalid"));
        assert_eq!(errors.get(Field::Phone), Some("Phone is invalid"));
        assert_eq!(errors.get(Field::PostalCode), Some("CEP is invalid"));
        assert_eq!(errors.get(Field::State), Some("State is not a valid UF code"));
    }

    #[test]
    fn landline_phone_with_ten_digits_passes() {
        let mut form = valid_form();
        form.phone = "(11) 3456-7890".into();
        assert!(validate_resident(&form, today()).is_empty());
    }

    #[test]
    fn default_admission_rules_accept_a_blank_form() {
        let admission = parse_admission(&AdmissionForm::default(), today(), &AdmissionRules::default())
            .expect("nothing is required by default");
        assert_eq!(admission, Admission::default());
    }

    #[test]
    fn strict_admission_rules_require_date_ward_and_bed() {
        let errors = validate_admission(&AdmissionForm::default(), today(), &AdmissionRules::strict());
        assert_eq!(errors.get(Field::EntryDate), Some("Entry date is required"));
        assert_eq!(errors.get(Field::Ward), Some("Ward is required"));
        assert_eq!(errors.get(Field::Bed), Some("Bed is required"));
        assert!(!errors.contains(Field::Notes));
    }

    #[test]
    fn strict_rules_reject_future_entry_date() {
        let form = AdmissionForm {
            entry_date: "2025-07-01".into(),
            ward: "12".into(),
            bed: "B".into(),
            notes: String::new(),
        };
        let errors = validate_admission(&form, today(), &AdmissionRules::strict());
        assert_eq!(
            errors.get(Field::EntryDate),
            Some("Entry date cannot be in the future")
        );
        assert!(validate_admission(&form, today(), &AdmissionRules::default()).is_empty());
    }

    #[test]
    fn unparseable_entry_date_is_always_an_error() {
        let form = AdmissionForm {
            entry_date: "yesterday".into(),
            ..AdmissionForm::default()
        };
        let errors = validate_admission(&form, today(), &AdmissionRules::default());
        assert_eq!(
            errors.get(Field::EntryDate),
            Some("Entry date is not a valid date")
        );
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut form = valid_form();
        form.city = " ".into();
        form.name = String::new();
        let errors = validate_resident(&form, today());
        assert_eq!(
            errors.to_string(),
            "nome: Full name is required; cidade: City is required"
        );
        assert_eq!(errors.summary(), SUMMARY_MESSAGE);
    }
}
