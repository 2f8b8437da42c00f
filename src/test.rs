//! Shared test utilities: sample bank exports and an in-memory rate source.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::Transactions;
use crate::rates::{RateSource, RateTable};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::str::FromStr;

pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn rate_table(rates: &[(&str, &str)]) -> RateTable {
    rates
        .iter()
        .map(|(code, rate)| (code.to_string(), Decimal::from_str(rate).unwrap()))
        .collect()
}

/// A `RateSource` that answers each fetch with the next scripted response, then `None` once the
/// script runs out. Every requested date is recorded.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRates {
    responses: VecDeque<Option<RateTable>>,
    calls: Vec<NaiveDate>,
}

impl ScriptedRates {
    pub(crate) fn new(responses: impl IntoIterator<Item = Option<RateTable>>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    pub(crate) fn calls(&self) -> &[NaiveDate] {
        &self.calls
    }
}

#[async_trait::async_trait]
impl RateSource for ScriptedRates {
    async fn fetch(&mut self, date: NaiveDate) -> Option<RateTable> {
        self.calls.push(date);
        self.responses.pop_front().flatten()
    }
}

pub(crate) const EXPORT_HEADERS: [&str; 8] = [
    "Дата операции",
    "Дата платежа",
    "Номер карты",
    "Статус",
    "Сумма платежа",
    "Валюта платежа",
    "Категория",
    "Описание",
];

/// Three "Food" payments: one inside the window ending 2024-03-20, one before it, and one that
/// failed.
pub(crate) fn food_transactions() -> Transactions {
    Transactions::parse(vec![
        EXPORT_HEADERS.to_vec(),
        vec![
            "15.03.2024 12:01:33",
            "15.03.2024",
            "*7197",
            "OK",
            "-500",
            "RUB",
            "Food",
            "Перекресток",
        ],
        vec![
            "01.01.2024 10:00:00",
            "01.01.2024",
            "*7197",
            "OK",
            "-200",
            "RUB",
            "Food",
            "Пятерочка",
        ],
        vec![
            "10.03.2024 18:30:00",
            "10.03.2024",
            "*5091",
            "FAILED",
            "-100",
            "RUB",
            "Food",
            "Магнит",
        ],
    ])
    .unwrap()
}

/// A mixed export covering the edges of the window ending 2024-03-20.
pub(crate) fn mixed_transactions() -> Transactions {
    Transactions::parse(vec![
        EXPORT_HEADERS.to_vec(),
        // first day of the window
        vec!["", "20.12.2023", "1234567890123456", "OK", "-10", "RUB", "Food", "a"],
        // one day before the window
        vec!["", "19.12.2023", "1234567890123456", "OK", "-20", "RUB", "Food", "b"],
        // the reference date itself
        vec!["", "20.03.2024", "*5091", "OK", "-30,5", "RUB", "Food", "c"],
        // one day after the reference date
        vec!["", "21.03.2024", "*5091", "OK", "-40", "RUB", "Food", "d"],
        // income, not spending
        vec!["", "01.02.2024", "*5091", "OK", "1000", "RUB", "Food", "e"],
        // another category
        vec!["", "01.02.2024", "*5091", "OK", "-50", "RUB", "Транспорт", "f"],
        // category match is exact
        vec!["", "01.02.2024", "*5091", "OK", "-60", "RUB", "food", "g"],
        // foreign currency payment inside the window
        vec!["", "05.02.2024", "*5091", "OK", "-70", "USD", "Food", "h"],
    ])
    .unwrap()
}
