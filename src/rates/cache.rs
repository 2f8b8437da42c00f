use crate::rates::{RateLookup, RateSource, RateTable};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Memoizes the rate tables returned by a `RateSource`, keyed by date.
///
/// A table is fetched the first time any currency is looked up for its date and is kept for the
/// life of the cache; it is never refreshed or evicted. A failed fetch is not remembered, so the
/// next lookup for that date asks the source again.
///
/// Lookups take `&mut self`; sharing a cache between tasks requires wrapping it in a lock.
#[derive(Debug)]
pub struct RateCache<S> {
    source: S,
    rates: HashMap<NaiveDate, RateTable>,
}

impl<S> RateCache<S>
where
    S: RateSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            rates: HashMap::new(),
        }
    }

    /// The number of dates whose rates are held.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait::async_trait]
impl<S> RateLookup for RateCache<S>
where
    S: RateSource,
{
    async fn rate(&mut self, currency_code: &str, date: NaiveDate) -> Option<Decimal> {
        if let Some(table) = self.rates.get(&date) {
            return find(table, currency_code, date);
        }

        let Some(table) = self.source.fetch(date).await else {
            warn!("No rates were returned for {date}; nothing was cached");
            return None;
        };
        debug!("Cached {} rates for {date}", table.len());
        find(self.rates.entry(date).or_insert(table), currency_code, date)
    }
}

fn find(table: &RateTable, currency_code: &str, date: NaiveDate) -> Option<Decimal> {
    let rate = table.get(currency_code).copied();
    if rate.is_none() {
        warn!("No rate for {currency_code} on {date}");
    }
    rate
}
