use crate::model::{parse_payment_date, parse_report_date, window_start, Transactions};
use crate::reports::Report;
use crate::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, error, warn};

/// The report name used for file naming.
pub const SPENDING_BY_CATEGORY: &str = "spending_by_category";

/// Spending in one category over the trailing three months.
#[derive(Debug, Clone)]
pub struct SpendingByCategory<'a> {
    transactions: &'a Transactions,
    category: String,
    date: Option<String>,
}

impl<'a> SpendingByCategory<'a> {
    /// - `category` - matched exactly.
    /// - `date` - the last day of the window as `YYYY-MM-DD`; today when `None`.
    pub fn new(
        transactions: &'a Transactions,
        category: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            transactions,
            category: category.into(),
            date,
        }
    }
}

impl Report for SpendingByCategory<'_> {
    fn name(&self) -> &str {
        SPENDING_BY_CATEGORY
    }

    fn compute(&self) -> Transactions {
        spending_by_category(self.transactions, &self.category, self.date.as_deref())
    }
}

/// Selects the successful payments out of the account in `category` whose payment date falls in
/// the three months ending on `date` (inclusive at both ends).
///
/// `date` is `YYYY-MM-DD`; when it is missing or does not parse, today is used. If any payment
/// date cannot be read the whole report is abandoned: the error is logged and an empty table is
/// returned.
pub fn spending_by_category(
    transactions: &Transactions,
    category: &str,
    date: Option<&str>,
) -> Transactions {
    spending_by_category_on(transactions, category, date, Local::now().date_naive())
}

fn spending_by_category_on(
    transactions: &Transactions,
    category: &str,
    date: Option<&str>,
    today: NaiveDate,
) -> Transactions {
    let date_end = match date {
        None => today,
        Some(date) => parse_report_date(date).unwrap_or_else(|e| {
            warn!("spending_by_category: {e:#}; using the current date {today} instead");
            today
        }),
    };

    match select(transactions, category, date_end) {
        Ok(selected) => {
            debug!(
                "spending_by_category selected {} of {} rows for '{category}' ending {date_end}",
                selected.len(),
                transactions.len()
            );
            selected
        }
        Err(e) => {
            error!("spending_by_category failed: {e:#}");
            Transactions::default()
        }
    }
}

fn select(transactions: &Transactions, category: &str, date_end: NaiveDate) -> Result<Transactions> {
    let date_start = window_start(date_end)?;
    let mut selected = Vec::new();
    for transaction in transactions.iter() {
        // Every payment date must be readable, even on rows that would not be selected.
        let paid = match transaction.payment_date() {
            "" => None,
            s => Some(parse_payment_date(s)?),
        };
        let in_window = paid.is_some_and(|d| date_start <= d && d <= date_end);
        if transaction.status().is_ok()
            && transaction.is_spending()
            && transaction.category() == category
            && in_window
        {
            selected.push(transaction.clone());
        }
    }
    Ok(transactions.with_rows(selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{food_transactions, mixed_transactions, ymd, EXPORT_HEADERS};

    fn descriptions(transactions: &Transactions) -> Vec<String> {
        let ix = transactions
            .headers()
            .iter()
            .position(|h| h == "Описание")
            .unwrap();
        transactions
            .iter()
            .map(|t| t.cells()[ix].to_string())
            .collect()
    }

    #[test]
    fn test_food_scenario() {
        let transactions = food_transactions();
        let result = spending_by_category(&transactions, "Food", Some("2024-03-20"));
        assert_eq!(descriptions(&result), vec!["Перекресток"]);
        assert_eq!(result.headers(), transactions.headers());
    }

    #[test]
    fn test_window_edges_and_filters() {
        let transactions = mixed_transactions();
        let result = spending_by_category(&transactions, "Food", Some("2024-03-20"));
        assert_eq!(descriptions(&result), vec!["a", "c", "h"]);
    }

    #[test]
    fn test_idempotent() {
        let transactions = mixed_transactions();
        let once = spending_by_category(&transactions, "Food", Some("2024-03-20"));
        let twice = spending_by_category(&once, "Food", Some("2024-03-20"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_date_uses_today() {
        let transactions = food_transactions();
        let result = spending_by_category_on(&transactions, "Food", None, ymd(2024, 4, 2));
        assert_eq!(descriptions(&result), vec!["Перекресток"]);
    }

    #[test]
    fn test_bad_date_falls_back_to_today() {
        let transactions = food_transactions();
        let result = spending_by_category_on(
            &transactions,
            "Food",
            Some("20.03.2024"),
            ymd(2024, 1, 10),
        );
        assert_eq!(descriptions(&result), vec!["Пятерочка"]);
    }

    #[test]
    fn test_unreadable_payment_date_gives_empty_report() {
        let transactions = Transactions::parse(vec![
            EXPORT_HEADERS.to_vec(),
            vec!["", "15.03.2024", "*7197", "OK", "-500", "RUB", "Food", "ok"],
            vec!["", "2024/03/16", "*7197", "OK", "-1", "RUB", "Other", "bad"],
        ])
        .unwrap();
        let result = spending_by_category(&transactions, "Food", Some("2024-03-20"));
        assert!(result.is_empty());
        assert!(result.headers().is_empty());
    }

    #[test]
    fn test_empty_payment_date_is_skipped() {
        let transactions = Transactions::parse(vec![
            EXPORT_HEADERS.to_vec(),
            vec!["", "", "*7197", "OK", "-500", "RUB", "Food", "undated"],
            vec!["", "15.03.2024", "*7197", "OK", "-5", "RUB", "Food", "dated"],
        ])
        .unwrap();
        let result = spending_by_category(&transactions, "Food", Some("2024-03-20"));
        assert_eq!(descriptions(&result), vec!["dated"]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let transactions = mixed_transactions();
        let before = transactions.clone();
        let _ = spending_by_category(&transactions, "Food", Some("2024-03-20"));
        assert_eq!(transactions, before);
    }

    #[test]
    fn test_report_name() {
        let transactions = food_transactions();
        let report = SpendingByCategory::new(&transactions, "Food", Some("2024-03-20".into()));
        assert_eq!(report.name(), SPENDING_BY_CATEGORY);
        assert_eq!(report.compute().len(), 1);
    }
}
