//! Batch identifier
//!
//! Domain primitive for batch identifiers of the form `<letter><3 digits>`
//! (`A001` .. `Z999`). Identifiers are validated at construction time, so a
//! `BatchIdentifier` value is always well formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Highest number before the letter advances
const MAX_NUMBER: u16 = 999;

/// BatchIdentifier names one cohort.
///
/// # Invariants
/// - Letter is an uppercase ASCII letter
/// - Number is in `1..=999` and always rendered with 3 digits
///
/// # Example
/// ```
/// use pig_farm::domain::BatchIdentifier;
///
/// let next = BatchIdentifier::allocate_next(Some(&"A999".parse().unwrap()));
/// assert_eq!(next.to_string(), "B001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BatchIdentifier {
    letter: u8,
    number: u16,
}

impl BatchIdentifier {
    /// The first identifier ever issued
    pub const FIRST: BatchIdentifier = BatchIdentifier {
        letter: b'A',
        number: 1,
    };

    /// Allocate the identifier that follows `last`.
    ///
    /// With no previous identifier this is `A001`. The number increments
    /// until 999, then resets to 001 and the letter advances, `Z` wrapping
    /// back to `A`. Callers persist the result and serialize allocations.
    pub fn allocate_next(last: Option<&BatchIdentifier>) -> BatchIdentifier {
        let Some(last) = last else {
            return Self::FIRST;
        };

        if last.number < MAX_NUMBER {
            return BatchIdentifier {
                letter: last.letter,
                number: last.number + 1,
            };
        }

        let letter = if last.letter == b'Z' { b'A' } else { last.letter + 1 };
        BatchIdentifier { letter, number: 1 }
    }

    /// Parse a stored identifier and allocate its successor
    pub fn allocate_after(last: Option<&str>) -> Result<BatchIdentifier, DomainError> {
        let last = last.map(str::parse::<BatchIdentifier>).transpose()?;
        Ok(Self::allocate_next(last.as_ref()))
    }

    pub fn letter(&self) -> char {
        self.letter as char
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for BatchIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.letter as char, self.number)
    }
}

impl FromStr for BatchIdentifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::MalformedIdentifier(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes[0].is_ascii_uppercase() {
            return Err(malformed());
        }
        if !bytes[1..].iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }

        let number: u16 = s[1..].parse().map_err(|_| malformed())?;
        if number == 0 {
            return Err(malformed());
        }

        Ok(Self {
            letter: bytes[0],
            number,
        })
    }
}

impl TryFrom<String> for BatchIdentifier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BatchIdentifier::from_str(&value)
    }
}

impl From<BatchIdentifier> for String {
    fn from(identifier: BatchIdentifier) -> Self {
        identifier.to_string()
    }
}
