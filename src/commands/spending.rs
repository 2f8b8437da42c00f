use crate::args::SpendingArgs;
use crate::commands::{format_amount, Out};
use crate::import::read_transactions;
use crate::model::Transactions;
use crate::reports::{ReportWriter, SpendingByCategory};
use crate::Result;
use anyhow::bail;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What the `spending` command reports back.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct SpendingSummary {
    category: String,
    rows: usize,
    total: String,
    cards: Vec<CardTotal>,
    path: PathBuf,
}

/// The spending charged to one card, identified by its last four digits.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct CardTotal {
    card: String,
    total: String,
}

impl SpendingSummary {
    fn new(category: &str, table: &Transactions, path: PathBuf) -> Self {
        let mut total = Decimal::ZERO;
        let mut cards: BTreeMap<String, Decimal> = BTreeMap::new();
        for transaction in table.iter() {
            let amount = transaction.amount().unwrap_or_default();
            total += amount;
            *cards.entry(transaction.masked_card()).or_default() += amount;
        }
        Self {
            category: category.to_string(),
            rows: table.len(),
            total: format_amount(total),
            cards: cards
                .into_iter()
                .map(|(card, total)| CardTotal {
                    card,
                    total: format_amount(total),
                })
                .collect(),
            path,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn total(&self) -> &str {
        &self.total
    }

    pub fn cards(&self) -> &[CardTotal] {
        &self.cards
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CardTotal {
    pub fn card(&self) -> &str {
        &self.card
    }

    pub fn total(&self) -> &str {
        &self.total
    }
}

/// Loads the bank export named in `args`, runs the spending report over it and writes the result
/// with `writer`, or to `--output` when given.
///
/// # Errors
/// - The report could not be written. Loading and filtering problems are logged and give an empty
///   report instead.
pub async fn spending(writer: ReportWriter, args: &SpendingArgs) -> Result<Out<SpendingSummary>> {
    let writer = match args.output() {
        Some(output) => writer.with_filename(output),
        None => writer,
    };

    let transactions = read_transactions(args.file());
    let report = SpendingByCategory::new(
        &transactions,
        args.category(),
        args.date().map(String::from),
    );
    let output = writer.write(&report).await;

    let Some(path) = output.path else {
        bail!("Unable to write the spending report, see the log for details");
    };
    let summary = SpendingSummary::new(args.category(), &output.table, path);

    let mut message = format!(
        "{} payments in '{}' totalling {}, written to {}",
        summary.rows,
        summary.category,
        summary.total,
        summary.path.display()
    );
    for card in &summary.cards {
        message.push_str(&format!("\n  card {}: {}", card.card, card.total));
    }
    Ok(Out::new(message, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;
    use tempfile::TempDir;

    const EXPORT: &str = "\
Дата платежа;Номер карты;Статус;Сумма платежа;Валюта платежа;Категория;Описание
15.03.2024;*7197;OK;-160,89;RUB;Супермаркеты;Колхоз
16.03.2024;*7197;OK;-1000;RUB;Супермаркеты;Магнит
17.03.2024;1234567890125091;OK;-2500,5;RUB;Супермаркеты;Лента
18.03.2024;*7197;FAILED;-90;RUB;Супермаркеты;Пятерочка
18.03.2024;*7197;OK;-90;RUB;Транспорт;Метро
";

    #[tokio::test]
    async fn test_spending_command() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("operations.csv");
        utils::write(&file, EXPORT).await.unwrap();
        let data_dir = dir.path().join("data");
        let args = SpendingArgs::new(&file, "Супермаркеты", Some("2024-03-20".into()), None);

        let out = spending(ReportWriter::new(&data_dir), &args).await.unwrap();

        let summary = out.structure().unwrap();
        assert_eq!(summary.rows(), 3);
        assert_eq!(summary.total(), "-3,661.39");
        assert_eq!(summary.cards().len(), 2);
        assert_eq!(summary.cards()[0].card(), "5091");
        assert_eq!(summary.cards()[0].total(), "-2,500.50");
        assert_eq!(summary.cards()[1].card(), "7197");
        assert_eq!(summary.cards()[1].total(), "-1,160.89");
        assert!(summary.path().starts_with(&data_dir));
        assert!(out.message().contains("card 7197: -1,160.89"));

        let json: serde_json::Value =
            serde_json::from_str(&utils::read(summary.path()).await.unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["Описание"], "Колхоз");
    }

    #[tokio::test]
    async fn test_spending_command_output() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("operations.csv");
        utils::write(&file, EXPORT).await.unwrap();
        let output = dir.path().join("reports").join("march.json");
        let args = SpendingArgs::new(
            &file,
            "Транспорт",
            Some("2024-03-20".into()),
            Some(output.clone()),
        );

        let out = spending(ReportWriter::default(), &args).await.unwrap();

        let summary = out.structure().unwrap();
        assert_eq!(summary.path(), output);
        assert_eq!(summary.rows(), 1);
        assert!(output.is_file());
    }

    #[tokio::test]
    async fn test_spending_command_missing_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.json");
        let args = SpendingArgs::new(
            dir.path().join("missing.csv"),
            "Супермаркеты",
            None,
            Some(output.clone()),
        );

        let out = spending(ReportWriter::default(), &args).await.unwrap();

        let summary = out.structure().unwrap();
        assert_eq!(summary.rows(), 0);
        assert_eq!(summary.total(), "0.00");
        assert!(summary.cards().is_empty());
        assert_eq!(utils::read(&output).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_spending_command_unwritable() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("operations.csv");
        utils::write(&file, EXPORT).await.unwrap();
        let args = SpendingArgs::new(
            &file,
            "Супермаркеты",
            Some("2024-03-20".into()),
            Some(dir.path().to_path_buf()),
        );

        assert!(spending(ReportWriter::default(), &args).await.is_err());
    }
}
