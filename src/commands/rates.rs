use crate::args::RatesArgs;
use crate::commands::{date_or_today, Out};
use crate::rates::{RateCache, RateLookup, RateSource, BASE_CURRENCY};
use crate::{Result, UserSettings};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// The rates of the user's currencies on one date.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct Rates {
    date: NaiveDate,
    currencies: Vec<CurrencyRate>,
}

/// One currency and its rate in rubles, `None` when the rate is unavailable.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct CurrencyRate {
    currency: String,
    rate: Option<Decimal>,
}

impl Rates {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn currencies(&self) -> &[CurrencyRate] {
        &self.currencies
    }
}

impl CurrencyRate {
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn rate(&self) -> Option<Decimal> {
        self.rate
    }
}

/// Looks up the rate of every currency in `settings` for the requested date. All lookups share one
/// cache, so `source` is asked for the date's rates once.
///
/// # Errors
/// - The date is not `DD.MM.YYYY`.
pub async fn rates<S>(
    settings: Option<UserSettings>,
    source: S,
    args: &RatesArgs,
) -> Result<Out<Rates>>
where
    S: RateSource,
{
    let date = date_or_today(args.date())?;
    let Some(settings) = settings else {
        return Ok("No user settings were found, there are no currencies to show".into());
    };

    let mut cache = RateCache::new(source);
    let mut currencies = Vec::new();
    let mut message = format!("Rates in {BASE_CURRENCY} on {}:", date.format("%d.%m.%Y"));
    for currency in settings.user_currencies() {
        let rate = cache.rate(currency, date).await;
        match rate {
            Some(rate) => message.push_str(&format!("\n  {currency}: {rate}")),
            None => message.push_str(&format!("\n  {currency}: unavailable")),
        }
        currencies.push(CurrencyRate {
            currency: currency.clone(),
            rate,
        });
    }
    Ok(Out::new(message, Rates { date, currencies }))
}
