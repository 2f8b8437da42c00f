//! Date parsing for bank exports and the trailing window used by reports.

use crate::Result;
use anyhow::Context;
use chrono::{Months, NaiveDate};
use tracing::{error, trace};

/// The format of dates in bank exports, e.g. `15.03.2024`.
pub const PAYMENT_DATE_FORMAT: &str = "%d.%m.%Y";

/// The format of report reference dates and report file names, e.g. `2024-03-20`.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// The length of the trailing report window in calendar months.
pub const WINDOW_MONTHS: u32 = 3;

/// Parses a `DD.MM.YYYY` date. Failures are logged and give `None`.
pub fn get_date(date_str: &str) -> Option<NaiveDate> {
    match parse_payment_date(date_str) {
        Ok(date) => {
            trace!("get_date completed");
            Some(date)
        }
        Err(e) => {
            error!("get_date failed: {e:#}");
            None
        }
    }
}

pub(crate) fn parse_payment_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), PAYMENT_DATE_FORMAT)
        .with_context(|| format!("Invalid date '{date_str}', expected DD.MM.YYYY"))
}

pub(crate) fn parse_report_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), REPORT_DATE_FORMAT)
        .with_context(|| format!("Invalid date '{date_str}', expected YYYY-MM-DD"))
}

/// The first day of the window of `WINDOW_MONTHS` calendar months that ends on `reference`.
///
/// The day of the month is kept where the target month has it and clamped to the month's last day
/// otherwise, so the window ending on 31 May starts on the last day of February. The result is
/// never after `reference`.
pub fn window_start(reference: NaiveDate) -> Result<NaiveDate> {
    reference
        .checked_sub_months(Months::new(WINDOW_MONTHS))
        .with_context(|| {
            format!("Unable to compute a {WINDOW_MONTHS} month window ending on {reference}")
        })
}
