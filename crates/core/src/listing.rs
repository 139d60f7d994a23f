//! The resident listing pipeline: filter, then sort.
//!
//! A [`ListingQuery`] carries the transient state of the listing screen (status filter, search
//! box, sort selector). [`apply`] turns the full collection into the sequence to display without
//! modifying it.

use crate::resident::Resident;
use crate::RegistryError;
use chrono::NaiveDate;
use sata_types::AdmissionStatus;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort modes offered by the listing screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    /// Oldest admission first.
    EntryDateAsc,
    /// Most recent admission first.
    EntryDateDesc,
    /// Youngest first.
    AgeAsc,
    /// Oldest first.
    AgeDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::EntryDateAsc,
        SortOrder::EntryDateDesc,
        SortOrder::AgeAsc,
        SortOrder::AgeDesc,
    ];

    /// Selector value.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "nome_asc",
            SortOrder::NameDesc => "nome_desc",
            SortOrder::EntryDateAsc => "data_asc",
            SortOrder::EntryDateDesc => "data_desc",
            SortOrder::AgeAsc => "idade_asc",
            SortOrder::AgeDesc => "idade_desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s.trim())
            .ok_or_else(|| RegistryError::InvalidInput(format!("unknown sort order: '{s}'")))
    }
}

/// Filter and sort state of the listing screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// `None` shows every status.
    pub status: Option<AdmissionStatus>,
    /// Free text matched against name, CPF and ward. Empty matches everything.
    pub search: String,
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: AdmissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether `resident` passes both the status filter and the search term.
    pub fn matches(&self, resident: &Resident) -> bool {
        if let Some(status) = self.status {
            if resident.status() != status {
                return false;
            }
        }

        if self.search.is_empty() {
            return true;
        }

        let term = self.search.to_lowercase();
        resident.personal.name.as_str().to_lowercase().contains(&term)
            || resident.personal.tax_id.contains(&term)
            || resident.ward().to_lowercase().contains(&term)
    }
}

/// Filters `residents` by `query` and sorts the survivors. The sort is stable.
pub fn apply<'a>(residents: &'a [Resident], query: &ListingQuery) -> Vec<&'a Resident> {
    let mut selected: Vec<&Resident> = residents.iter().filter(|r| query.matches(r)).collect();
    sort(&mut selected, query.sort);
    selected
}

/// Sorts residents in place by `order`.
pub fn sort(residents: &mut [&Resident], order: SortOrder) {
    match order {
        SortOrder::NameAsc => residents.sort_by(|a, b| compare_names(name(a), name(b))),
        SortOrder::NameDesc => residents.sort_by(|a, b| compare_names(name(b), name(a))),
        SortOrder::EntryDateAsc => {
            residents.sort_by(|a, b| compare_dates(a.entry_date(), b.entry_date()))
        }
        SortOrder::EntryDateDesc => {
            residents.sort_by(|a, b| compare_dates_desc(a.entry_date(), b.entry_date()))
        }
        SortOrder::AgeAsc => residents.sort_by_key(|r| r.age),
        SortOrder::AgeDesc => residents.sort_by(|a, b| b.age.cmp(&a.age)),
    }
}

fn name(resident: &Resident) -> &str {
    resident.personal.name.as_str()
}

/// Residents without an entry date go last.
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Newest first; residents without an entry date still go last.
fn compare_dates_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        _ => compare_dates(a, b),
    }
}

/// Compares names the way a Portuguese reader expects: accents and case only break ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
