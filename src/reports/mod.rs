//! Reports over bank exports and the writer that saves them as JSON.
//!
//! A report only computes a table; writing it is the job of `ReportWriter`, which names the file
//! after the report and the current date unless a file name is configured.

mod spending;

use crate::model::{Transactions, REPORT_DATE_FORMAT};
use crate::{utils, Result};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

pub use spending::{spending_by_category, SpendingByCategory, SPENDING_BY_CATEGORY};

/// The directory reports are written to unless configured otherwise.
pub const DATA_DIR: &str = "data";

/// Something that produces a table worth saving.
pub trait Report {
    /// The name used for the report file, e.g. `spending_by_category`.
    fn name(&self) -> &str;

    /// Builds the table. Failures are handled inside and give an empty table.
    fn compute(&self) -> Transactions;
}

/// The result of running a report through a `ReportWriter`.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    /// The computed table, whether or not it could be saved.
    pub table: Transactions,
    /// Where the table was written, or `None` if writing failed.
    pub path: Option<PathBuf>,
}

/// Saves report tables as JSON arrays of row objects.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReportWriter {
    data_dir: PathBuf,
    filename: Option<PathBuf>,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(DATA_DIR)
    }
}

impl ReportWriter {
    /// A writer that names files `{data_dir}/{report name}_{YYYY-MM-DD}.json`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            filename: None,
        }
    }

    /// Writes every report to `filename` instead of the conventional name.
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The file a report named `name` is written to when run on `today`.
    pub fn destination(&self, name: &str, today: NaiveDate) -> PathBuf {
        match &self.filename {
            Some(filename) => filename.clone(),
            None => self
                .data_dir
                .join(format!("{name}_{}.json", today.format(REPORT_DATE_FORMAT))),
        }
    }

    /// Computes `report` and writes it. Writing is best-effort: a failure is logged and leaves
    /// `path` empty, but the table is returned either way.
    pub async fn write<R>(&self, report: &R) -> ReportOutput
    where
        R: Report + ?Sized,
    {
        let name = report.name();
        let table = report.compute();
        let path = self.destination(name, Local::now().date_naive());
        match write_json(&path, &table).await {
            Ok(()) => {
                debug!(
                    "Wrote {} rows of {name} to {}",
                    table.len(),
                    path.display()
                );
                ReportOutput {
                    table,
                    path: Some(path),
                }
            }
            Err(e) => {
                error!("Unable to write report {name}: {e:#}");
                ReportOutput { table, path: None }
            }
        }
    }
}

async fn write_json(path: &Path, table: &Transactions) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::make_dir(parent).await?;
    }
    let json = serde_json::to_string(table).context("Unable to serialize the report")?;
    utils::write(path, json).await
}
