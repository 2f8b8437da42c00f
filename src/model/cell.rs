//! A single value from a spreadsheet row.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A cell of a bank export. Numbers are held as `Decimal` so that amounts survive a round trip
/// through the report unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
}

impl Cell {
    /// Interprets raw text the way a spreadsheet import would: blank text is empty, a plain number
    /// (with either a decimal point or a decimal comma) is a number, everything else is kept as
    /// text.
    ///
    /// Text only becomes a number when nothing is lost: it must read back exactly as written and
    /// fit the JSON number it will be written as. Account numbers, codes with leading zeros and
    /// digit groups such as `1_000` stay text.
    pub fn infer(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match parse_decimal(trimmed) {
            Some(value) if is_lossless(trimmed, value) => Cell::Number(value),
            _ => Cell::Text(raw),
        }
    }

    /// Creates a number cell from a float, or an empty cell for values that have no decimal form.
    pub fn from_f64(value: f64) -> Self {
        Decimal::from_f64(value)
            .map(|d| Cell::Number(d.normalize()))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The numeric value of the cell, if it has one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => parse_decimal(s.trim()),
            Cell::Number(d) => Some(*d),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::infer(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(d) if d.fract().is_zero() => match d.to_i64() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.collect_str(d),
            },
            Cell::Number(d) if d.mantissa().unsigned_abs() < F64_EXACT_MANTISSA => {
                serializer.serialize_f64(d.to_f64().unwrap_or_default())
            }
            Cell::Number(d) => serializer.collect_str(d),
        }
    }
}

/// Decimals whose mantissa is below this (at most 15 significant digits) survive the trip through
/// an `f64`.
const F64_EXACT_MANTISSA: u128 = 1_000_000_000_000_000;

/// True when `value`, parsed from `text`, writes back as the same text and as an exact JSON
/// number.
fn is_lossless(text: &str, value: Decimal) -> bool {
    if value.to_string() != text.replace(',', ".") {
        return false;
    }
    if value.fract().is_zero() {
        value.to_i64().is_some()
    } else {
        value.mantissa().unsigned_abs() < F64_EXACT_MANTISSA
    }
}

/// Parses a decimal number written with either `.` or `,` as the decimal separator.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', ".")).ok()
}
