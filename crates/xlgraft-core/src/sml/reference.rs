//! A1-style cell references.
//!
//! Rows and columns are 0-based in the model and 1-based in A1 text:
//! `CellRef { row: 0, col: 0 }` is `A1`.

use crate::error::{GraftError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest row index Excel accepts (1,048,576 rows).
pub const MAX_ROW: u32 = 1_048_575;
/// Largest column index Excel accepts (`XFD`).
pub const MAX_COL: u32 = 16_383;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parses `"B3"`; `$` markers are accepted and dropped.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || GraftError::InvalidCellReference {
            reference: reference.to_string(),
        };

        let text = reference.trim().replace('$', "");
        let split = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = text.split_at(split);
        if letters.is_empty() || letters.len() > 3 {
            return Err(invalid());
        }

        let mut col: u32 = 0;
        for ch in letters.chars() {
            col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 || row - 1 > MAX_ROW || col - 1 > MAX_COL {
            return Err(invalid());
        }

        Ok(Self::new(row - 1, col - 1))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row + 1)
    }
}

/// Column letters for a 0-based column index (0 = A, 26 = AA).
pub fn column_letters(col: u32) -> String {
    let mut n = col + 1;
    let mut result = String::new();
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// Rectangular, inclusive range of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub first: CellRef,
    pub last: CellRef,
}

impl CellRange {
    /// Normalizes the corners so `first` is top-left.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            first: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            last: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn from_coords(first_row: u32, last_row: u32, first_col: u32, last_col: u32) -> Self {
        Self::new(
            CellRef::new(first_row, first_col),
            CellRef::new(last_row, last_col),
        )
    }

    /// Parses `"A1:C4"` or a single cell `"B2"`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.trim().split_once(':') {
            Some((a, b)) => Ok(Self::new(CellRef::parse(a)?, CellRef::parse(b)?)),
            None => {
                let cell = CellRef::parse(text)?;
                Ok(Self::new(cell, cell))
            }
        }
    }

    pub fn contains(&self, cell: CellRef) -> bool {
        (self.first.row..=self.last.row).contains(&cell.row)
            && (self.first.col..=self.last.col).contains(&cell.col)
    }

    pub fn is_single_cell(&self) -> bool {
        self.first == self.last
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}

/// Parses a space-separated `sqref` list such as `"A1:B2 D4"`.
pub fn parse_sqref(text: &str) -> Result<Vec<CellRange>> {
    text.split_whitespace().map(CellRange::parse).collect()
}

pub fn format_sqref(ranges: &[CellRange]) -> String {
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
