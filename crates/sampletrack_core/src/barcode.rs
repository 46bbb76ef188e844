//! Barcode and well-position grammars.
//!
//! # Responsibility
//! - Validate container barcodes against their fixed grammars.
//! - Parse well-position strings into checked (row, col) coordinates.
//!
//! # Invariants
//! - Tube barcodes match `NT<number>`, plate barcodes match `DN<number>`.
//! - A parsed `WellPosition` always satisfies row 1..=8 and col 1..=12.
//! - Input is normalized to ASCII uppercase before any grammar check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static TUBE_BARCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^NT[0-9]+$").expect("valid tube barcode regex"));
static PLATE_BARCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DN[0-9]+$").expect("valid plate barcode regex"));
static WELL_POSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-H])([1-9][0-9]*)$").expect("valid well position regex"));

pub const PLATE_ROWS: u8 = 8;
pub const PLATE_COLS: u8 = 12;

/// Uppercases scanned input before grammar checks.
///
/// Barcodes are stored and compared in normalized form, so case differences
/// on the wire never produce distinct containers.
pub fn normalize(value: &str) -> String {
    value.to_ascii_uppercase()
}

/// Returns whether `value` is a well-formed tube barcode (`NT<number>`).
///
/// Expects [`normalize`]d input; lowercase prefixes do not match.
pub fn is_tube_barcode(value: &str) -> bool {
    TUBE_BARCODE_RE.is_match(value)
}

/// Returns whether `value` is a well-formed plate barcode (`DN<number>`).
///
/// Expects [`normalize`]d input.
pub fn is_plate_barcode(value: &str) -> bool {
    PLATE_BARCODE_RE.is_match(value)
}

/// Checked coordinate inside the 8x12 plate grid.
///
/// Construction goes through [`WellPosition::parse`] or
/// [`WellPosition::from_row_col`]; both reject out-of-grid coordinates, so a
/// value of this type is always addressable on a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WellPosition {
    row: u8,
    col: u8,
}

impl WellPosition {
    /// Parses a textual position such as `A1` or `h12` (case-insensitive).
    ///
    /// Returns `None` when the string does not match the grammar
    /// `[A-H][1-9][0-9]*` or when the column exceeds 12. The letter range of
    /// the grammar already bounds the row, but both bounds are re-checked
    /// after extraction.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.to_ascii_uppercase();
        let captures = WELL_POSITION_RE.captures(&normalized)?;

        let letter = captures.get(1)?.as_str().bytes().next()?;
        let row = letter - b'A' + 1;
        let col: u8 = captures.get(2)?.as_str().parse().ok()?;

        Self::from_row_col(row, col)
    }

    /// Builds a position from numeric coordinates, rejecting out-of-grid values.
    pub fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if (1..=PLATE_ROWS).contains(&row) && (1..=PLATE_COLS).contains(&col) {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row coordinate, 1-based (`A` = 1).
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Column coordinate, 1-based.
    pub fn col(&self) -> u8 {
        self.col
    }
}

impl Display for WellPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let letter = (b'A' + self.row - 1) as char;
        write!(f, "{letter}{}", self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_plate_barcode, is_tube_barcode, WellPosition};

    #[test]
    fn tube_barcode_grammar() {
        assert!(is_tube_barcode("NT1"));
        assert!(is_tube_barcode("NT10000"));
        assert!(is_tube_barcode("NT00001"));
        assert_eq!(super::normalize("nt7"), "NT7");

        assert!(!is_tube_barcode("nt7"));
        assert!(!is_tube_barcode("HZ1"));
        assert!(!is_tube_barcode("1"));
        assert!(!is_tube_barcode("NT"));
        assert!(!is_tube_barcode("NT1x"));
        assert!(!is_tube_barcode("DN1"));
    }

    #[test]
    fn plate_barcode_grammar() {
        assert!(is_plate_barcode("DN1"));
        assert!(is_plate_barcode("DN10000"));
        assert!(is_plate_barcode("DN00001"));

        assert!(!is_plate_barcode("DN"));
        assert!(!is_plate_barcode("DN_1"));
        assert!(!is_plate_barcode("1DN"));
        assert!(!is_plate_barcode("PR1"));
        assert!(!is_plate_barcode("NT1"));
    }

    #[test]
    fn well_position_corners_are_valid() {
        let a1 = WellPosition::parse("A1").unwrap();
        assert_eq!((a1.row(), a1.col()), (1, 1));

        let h12 = WellPosition::parse("H12").unwrap();
        assert_eq!((h12.row(), h12.col()), (8, 12));
    }

    #[test]
    fn well_position_is_case_insensitive() {
        assert_eq!(WellPosition::parse("b3"), WellPosition::parse("B3"));
    }

    #[test]
    fn well_position_rejects_grammar_violations() {
        assert!(WellPosition::parse("1").is_none());
        assert!(WellPosition::parse("A").is_none());
        assert!(WellPosition::parse("A0").is_none());
        assert!(WellPosition::parse("A01").is_none());
        assert!(WellPosition::parse("I1").is_none());
        assert!(WellPosition::parse("Z100").is_none());
    }

    #[test]
    fn well_position_rejects_out_of_grid_column() {
        // Matches the grammar but exceeds the 12-column bound.
        assert!(WellPosition::parse("A13").is_none());
        assert!(WellPosition::parse("H12").is_some());
    }

    #[test]
    fn well_position_round_trips_through_display() {
        for text in ["A1", "C7", "H12"] {
            let parsed = WellPosition::parse(text).unwrap();
            assert_eq!(parsed.to_string(), text);
        }
    }
}
