//! Internal implementation of resident identifiers.

use crate::{IdError, IdResult};
use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

/// A resident identifier (milliseconds since the Unix epoch at creation).
///
/// # Construction
/// - [`ResidentIdGenerator::next_at`] allocates a fresh identifier for a new record.
/// - [`ResidentId::parse`] validates an externally supplied identifier (CLI argument, stored
///   record).
/// - [`ResidentId::new`] wraps a raw number, rejecting zero and negatives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub struct ResidentId(i64);

impl ResidentId {
    /// Wraps a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `value` is not strictly positive.
    pub fn new(value: i64) -> IdResult<Self> {
        if value <= 0 {
            return Err(IdError::InvalidInput(format!(
                "resident id must be a positive integer, got: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Parses a decimal identifier, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> IdResult<Self> {
        let value = input.trim().parse::<i64>().map_err(|_| {
            IdError::InvalidInput(format!(
                "resident id must be a positive integer, got: '{input}'"
            ))
        })?;
        Self::new(value)
    }

    /// Returns the raw number.
    pub fn get(self) -> i64 {
        self.0
    }

    /// The creation instant encoded in the identifier, if it is a representable timestamp.
    pub fn created_at(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResidentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResidentId::parse(s)
    }
}

impl TryFrom<i64> for ResidentId {
    type Error = IdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ResidentId::new(value)
    }
}

impl From<ResidentId> for i64 {
    fn from(id: ResidentId) -> Self {
        id.0
    }
}

/// Allocates strictly increasing, time-based resident identifiers.
///
/// The generator remembers the last identifier it handed out (or was told about via
/// [`observe`](ResidentIdGenerator::observe)). A new identifier is the current time in
/// milliseconds, or one more than the last identifier when the clock has not moved past it.
#[derive(Clone, Debug, Default)]
pub struct ResidentIdGenerator {
    last: Option<ResidentId>,
}

impl ResidentIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an identifier that already exists so later allocations stay above it.
    pub fn observe(&mut self, id: ResidentId) {
        if self.last.is_none_or(|last| id > last) {
            self.last = Some(id);
        }
    }

    /// Allocates the next identifier as of `now`.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> ResidentId {
        let millis = now.timestamp_millis().max(1);
        let value = match self.last {
            Some(prev) if millis <= prev.0 => prev.0 + 1,
            _ => millis,
        };
        let id = ResidentId(value);
        self.last = Some(id);
        id
    }

    /// The most recent identifier allocated or observed.
    pub fn last(&self) -> Option<ResidentId> {
        self.last
    }
}
