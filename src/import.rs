//! Loading bank exports from spreadsheet and CSV files.
//!
//! Loading never fails outright: a file that cannot be read is logged and yields an empty table.

use crate::model::{Cell, Transactions};
use crate::Result;
use anyhow::Context;
use calamine::{Data, Reader};
use chrono::Timelike;
use std::path::Path;
use tracing::{error, info};

/// Loads a bank export, choosing the reader by file extension: `.csv` is read as CSV, anything
/// else as a spreadsheet.
pub fn read_transactions(path: &Path) -> Transactions {
    let is_csv = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_csv(path)
    } else {
        read_excel(path)
    }
}

/// Loads the first worksheet of a spreadsheet (`.xlsx`, `.xls`, `.ods`). The first row holds the
/// column names.
pub fn read_excel(path: &Path) -> Transactions {
    match load_workbook(path) {
        Ok(transactions) => {
            info!(
                "read_excel loaded {} rows from {}",
                transactions.len(),
                path.display()
            );
            transactions
        }
        Err(e) => {
            error!("read_excel failed: {e:#}");
            Transactions::default()
        }
    }
}

/// Loads a CSV export with a header row. The delimiter is `;` when the header row contains one,
/// otherwise `,`.
pub fn read_csv(path: &Path) -> Transactions {
    match load_csv(path) {
        Ok(transactions) => {
            info!(
                "read_csv loaded {} rows from {}",
                transactions.len(),
                path.display()
            );
            transactions
        }
        Err(e) => {
            error!("read_csv failed: {e:#}");
            Transactions::default()
        }
    }
}

fn load_workbook(path: &Path) -> Result<Transactions> {
    let mut workbook = calamine::open_workbook_auto(path)
        .with_context(|| format!("Unable to open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("The workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("Unable to read the first worksheet of {}", path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .with_context(|| format!("The first worksheet of {} is empty", path.display()))?
        .iter()
        .map(|d| d.to_string())
        .collect();
    let data = rows.map(|row| row.iter().map(cell_from_data).collect::<Vec<Cell>>());
    Transactions::new(headers, data)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number((*i).into()),
        Data::Float(f) => Cell::from_f64(*f),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) if dt.time().num_seconds_from_midnight() == 0 => {
                Cell::Text(dt.format("%d.%m.%Y").to_string())
            }
            Some(dt) => Cell::Text(dt.format("%d.%m.%Y %H:%M:%S").to_string()),
            None => Cell::from_f64(dt.as_f64()),
        },
        other => Cell::Text(other.to_string()),
    }
}

fn load_csv(path: &Path) -> Result<Transactions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read file {}", path.display()))?;
    let delimiter = match content.lines().next() {
        Some(header) if header.contains(';') => b';',
        _ => b',',
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("Malformed CSV in {}", path.display()))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Transactions::parse(rows)
}
