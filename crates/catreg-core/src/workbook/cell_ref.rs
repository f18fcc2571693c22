//! A1-style cell references.

use once_cell::sync::Lazy;
use regex::Regex;

use super::WorkbookError;

static CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?([A-Za-z]+)\$?(\d+)$").expect("cell pattern is valid"));

/// 1-based column index: `A` = 1, `Z` = 26, `AA` = 27.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(c as u32 - 'A' as u32 + 1)
    })
}

/// Column letters only, e.g. the `C` of `C7`. Used when a cell has no row part.
pub fn column_of(reference: &str) -> Option<u32> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    column_index(&letters)
}

/// `B12` -> (column 2, row 12).
pub fn parse_cell(reference: &str) -> Result<(u32, u32), WorkbookError> {
    let invalid = || WorkbookError::InvalidReference(reference.to_string());
    let caps = CELL_RE.captures(reference.trim()).ok_or_else(invalid)?;
    let col = column_index(&caps[1]).ok_or_else(invalid)?;
    let row = caps[2].parse::<u32>().map_err(|_| invalid())?;
    Ok((col, row))
}

/// Rectangular range such as a table's `ref="A1:B3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl CellRange {
    pub fn parse(reference: &str) -> Result<Self, WorkbookError> {
        let (start, end) = reference
            .split_once(':')
            .ok_or_else(|| WorkbookError::InvalidReference(reference.to_string()))?;
        let (start_col, start_row) = parse_cell(start)?;
        let (end_col, end_row) = parse_cell(end)?;
        if end_col < start_col || end_row < start_row {
            return Err(WorkbookError::InvalidReference(reference.to_string()));
        }
        Ok(Self {
            start_col,
            start_row,
            end_col,
            end_row,
        })
    }

    pub fn width(&self) -> usize {
        (self.end_col - self.start_col + 1) as usize
    }

    pub fn contains_col(&self, col: u32) -> bool {
        col >= self.start_col && col <= self.end_col
    }
}
