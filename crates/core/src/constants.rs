//! Constants used throughout the SATA core crate.

/// Default directory for registry data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "sata_data";

/// Default name of the storage slot holding the resident array.
pub const DEFAULT_SLOT_NAME: &str = "idosos";

/// File extension appended to a slot name by the file store.
pub const SLOT_FILE_EXTENSION: &str = "json";

/// Number of digits in a CPF.
pub const TAX_ID_DIGITS: usize = 11;

/// Number of digits in a Cartão SUS number.
pub const HEALTH_CARD_DIGITS: usize = 15;

/// Number of digits in a CEP.
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Minimum digits for a phone number (area code plus landline).
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum length of a resident's full name.
pub const MIN_NAME_CHARS: usize = 5;

/// Minimum length of an RG.
pub const MIN_NATIONAL_ID_CHARS: usize = 7;

/// Stored date format for birth and entry dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display date format accepted for entry dates.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
