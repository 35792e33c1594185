//! Cell identifier validation and ordering.
//!
//! A cell identifier is one or more uppercase letters followed by a row
//! number without a leading zero ("A1", "B22", "AA100"). Identifiers are
//! kept as their original text; the column and row indices are derived on
//! demand for sorting listings in sheet order.
//!
//! # Examples
//!
//! ```
//! use tally_engine::engine::CellId;
//!
//! let id = CellId::parse("B3").unwrap();
//! assert_eq!(id.col(), 1); // 0-indexed
//! assert_eq!(id.row(), 2);
//! assert_eq!(id.to_string(), "B3");
//! assert!(CellId::parse("b3").is_none());
//! ```

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use super::error::InvalidCellId;

/// A validated cell identifier.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CellId(String);

fn cell_id_re() -> &'static Regex {
    static CELL_ID_RE: OnceLock<Regex> = OnceLock::new();
    CELL_ID_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[1-9][0-9]*)$")
            .expect("cell identifier regex must compile")
    })
}

impl CellId {
    /// Validate `name` as a cell identifier.
    /// Returns None if it does not match `^[A-Z]+[1-9][0-9]*$`.
    pub fn parse(name: &str) -> Option<CellId> {
        if cell_id_re().is_match(name) {
            Some(CellId(name.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Position of the first digit; validation guarantees at least one letter.
    fn split(&self) -> (&str, &str) {
        let idx = self
            .0
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.0.len());
        self.0.split_at(idx)
    }

    /// Zero-indexed column (A -> 0, Z -> 25, AA -> 26).
    /// Saturates for absurdly long column names.
    pub fn col(&self) -> usize {
        let (letters, _) = self.split();
        let mut acc = 0usize;
        for c in letters.bytes() {
            let digit = (c - b'A') as usize + 1;
            acc = acc.saturating_mul(26).saturating_add(digit);
        }
        acc - 1
    }

    /// Zero-indexed row (1 -> 0). Saturates for rows beyond `usize`.
    pub fn row(&self) -> usize {
        let (_, numbers) = self.split();
        numbers.parse::<usize>().unwrap_or(usize::MAX) - 1
    }

    /// Row-major ordering used for listings and save files.
    pub fn natural_cmp(&self, other: &CellId) -> Ordering {
        self.row()
            .cmp(&other.row())
            .then(self.col().cmp(&other.col()))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl std::str::FromStr for CellId {
    type Err = InvalidCellId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellId::parse(s).ok_or_else(|| InvalidCellId(s.to_string()))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
