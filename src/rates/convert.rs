use crate::rates::{RateLookup, BASE_CURRENCY};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{trace, warn};

/// Converts `amount` of `currency_code` to rubles at the rate for `date`.
///
/// Rubles are returned unchanged without consulting `lookup`. When no rate is available the
/// conversion is abandoned with a warning and `None` is returned.
pub async fn exchange<L>(
    amount: Decimal,
    currency_code: &str,
    date: NaiveDate,
    lookup: &mut L,
) -> Option<Decimal>
where
    L: RateLookup + ?Sized,
{
    if currency_code == BASE_CURRENCY {
        return Some(amount);
    }
    let Some(rate) = lookup.rate(currency_code, date).await else {
        warn!("Unable to convert {amount} {currency_code} on {date}: no rate available");
        return None;
    };
    let converted = rate * amount;
    trace!("exchange completed: {amount} {currency_code} = {converted} {BASE_CURRENCY}");
    Some(converted)
}
