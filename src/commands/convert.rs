use crate::args::ConvertArgs;
use crate::commands::{date_or_today, format_amount, Out};
use crate::rates::{exchange, RateCache, RateSource, BASE_CURRENCY};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// The result of the `convert` command.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct Conversion {
    amount: Decimal,
    currency: String,
    date: NaiveDate,
    rubles: Decimal,
}

impl Conversion {
    pub fn rubles(&self) -> Decimal {
        self.rubles
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Converts the amount in `args` to rubles at the rate `source` gives for the requested date.
///
/// # Errors
/// - The date is not `DD.MM.YYYY`.
/// - No rate is available for the currency on that date.
pub async fn convert<S>(source: S, args: &ConvertArgs) -> Result<Out<Conversion>>
where
    S: RateSource,
{
    let date = date_or_today(args.date())?;
    let currency = args.currency().trim().to_uppercase();
    let mut rates = RateCache::new(source);

    let rubles = exchange(args.amount(), &currency, date, &mut rates)
        .await
        .with_context(|| format!("Unable to convert {currency} to {BASE_CURRENCY} on {date}"))?;

    let message = format!(
        "{} {currency} = {} {BASE_CURRENCY} on {}",
        args.amount(),
        format_amount(rubles),
        date.format("%d.%m.%Y")
    );
    Ok(Out::new(
        message,
        Conversion {
            amount: args.amount(),
            currency,
            date,
            rubles,
        },
    ))
}
