//! Currency rates: where they come from, how they are cached, and how amounts are converted to
//! the base currency.

mod cache;
mod cbr;
mod convert;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub use cache::RateCache;
pub use cbr::{parse_rates, CbrRates, CBR_DAILY_URL};
pub use convert::exchange;

/// All amounts are converted to this currency.
pub const BASE_CURRENCY: &str = "RUB";

/// Rates for one date: currency code -> rubles per one unit of that currency.
pub type RateTable = HashMap<String, Decimal>;

/// A provider of complete rate tables, one date per call. Returns `None` when the rates could not
/// be obtained, whatever the reason.
#[async_trait::async_trait]
pub trait RateSource: Send {
    async fn fetch(&mut self, date: NaiveDate) -> Option<RateTable>;
}

/// Looks up the rate of a single currency on a date.
#[async_trait::async_trait]
pub trait RateLookup: Send {
    async fn rate(&mut self, currency_code: &str, date: NaiveDate) -> Option<Decimal>;
}
