//! Command handlers for the finreport CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod convert;
mod rates;
mod spending;

use chrono::{Local, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use convert::{convert, Conversion};
pub use rates::{rates, CurrencyRate, Rates};
pub use spending::{spending, CardTotal, SpendingSummary};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// The date a command runs for: `date` as `DD.MM.YYYY`, or today.
fn date_or_today(date: Option<&str>) -> crate::Result<NaiveDate> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(s) => crate::model::get_date(s)
            .ok_or_else(|| anyhow::anyhow!("Invalid date '{s}', expected DD.MM.YYYY")),
    }
}

/// Formats an amount for display, e.g. `-1,234.50`.
fn format_amount(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = amount.abs().to_f64().unwrap_or_default();
    format!("{sign}{}", format_num::format_num!(",.2f", abs))
}
