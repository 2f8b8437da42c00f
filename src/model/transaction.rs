use crate::model::mapping::Mapping;
use crate::model::Cell;
use crate::Result;
use anyhow::bail;
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use tracing::trace;

/// The rows of a bank export along with its header mapping.
///
/// Serializes as a JSON array with one object per row, keyed by the original column names in their
/// original order.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Transactions {
    mapping: Mapping,
    data: Vec<Transaction>,
}

impl Transactions {
    /// Creates a table from a header row and data rows. Rows shorter than the header are padded
    /// with empty cells, and empty cells past the last header are dropped.
    ///
    /// # Errors
    /// - The headers contain duplicates.
    /// - A row has a non-empty cell past the last header.
    pub fn new<S, H, R>(headers: H, rows: R) -> Result<Self>
    where
        S: Into<String>,
        H: IntoIterator<Item = S>,
        R: IntoIterator<Item = Vec<Cell>>,
    {
        let mapping = Mapping::new(headers)?;
        let len = mapping.len();
        let mut data = Vec::new();
        for (row_ix, mut cells) in rows.into_iter().enumerate() {
            if cells.len() > len && cells[len..].iter().all(Cell::is_empty) {
                cells.truncate(len);
            }
            if cells.len() > len {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            cells.resize(len, Cell::Empty);
            data.push(Transaction::new(&mapping, cells));
        }
        trace!("Parsed {} transactions with {} columns", data.len(), len);
        Ok(Self { mapping, data })
    }

    /// Parses raw text rows where the first row is the header. Cell types are inferred with
    /// [`Cell::infer`].
    pub fn parse<S, R>(sheet_data: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = sheet_data.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.into_iter().map(Into::into).collect(),
            None => bail!("An empty data set cannot be parsed into a Transactions object"),
        };
        let data = rows.map(|row| row.into_iter().map(Cell::infer).collect::<Vec<Cell>>());
        Self::new(headers, data)
    }

    /// A table with the same columns holding only `rows`.
    pub fn with_rows(&self, rows: Vec<Transaction>) -> Self {
        Self {
            mapping: self.mapping.clone(),
            data: rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        self.mapping.headers()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.data.iter()
    }
}

impl Serialize for Transactions {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.data.len()))?;
        for transaction in &self.data {
            seq.serialize_element(&Record {
                headers: self.mapping.headers(),
                cells: &transaction.cells,
            })?;
        }
        seq.end()
    }
}

/// One row paired with the header names, serialized as a JSON object.
struct Record<'a> {
    headers: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, cell) in self.headers.iter().zip(self.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

/// A single row of a bank export.
///
/// The cells are kept exactly as they were read. The fields that reports depend on are pulled out
/// of the known columns when the row is created; a row lacking one of those columns gets the
/// empty value for it.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    payment_date: String,
    card_number: String,
    status: PaymentStatus,
    amount: Option<Decimal>,
    currency: String,
    category: String,
    cells: Vec<Cell>,
}

impl Transaction {
    fn new(mapping: &Mapping, cells: Vec<Cell>) -> Self {
        let mut transaction = Transaction::default();
        for (header, cell) in mapping.headers().iter().zip(&cells) {
            let Some(column) = TransactionColumn::from_header(header) else {
                continue;
            };
            match column {
                TransactionColumn::PaymentDate => transaction.payment_date = text(cell),
                TransactionColumn::CardNumber => transaction.card_number = text(cell),
                TransactionColumn::Status => transaction.status = PaymentStatus::from(text(cell)),
                TransactionColumn::PaymentAmount => transaction.amount = cell.as_decimal(),
                TransactionColumn::PaymentCurrency => transaction.currency = text(cell),
                TransactionColumn::Category => transaction.category = text(cell),
            }
        }
        transaction.cells = cells;
        transaction
    }

    /// The payment date as written in the export, `DD.MM.YYYY`.
    pub fn payment_date(&self) -> &str {
        &self.payment_date
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// The card number reduced to its last four characters.
    pub fn masked_card(&self) -> String {
        mask_card(&self.card_number)
    }

    pub fn status(&self) -> &PaymentStatus {
        &self.status
    }

    /// The signed payment amount; `None` when the cell is empty or not a number.
    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// True when money left the account. A missing amount is never spending.
    pub fn is_spending(&self) -> bool {
        self.amount.is_some_and(|a| a.is_sign_negative() && !a.is_zero())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

fn text(cell: &Cell) -> String {
    cell.to_string().trim().to_string()
}

/// Returns the last four characters of a card number, or the whole string when it is shorter.
pub fn mask_card(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    let start = chars.len().saturating_sub(4);
    let masked: String = chars[start..].iter().collect();
    trace!("mask_card completed");
    masked
}

/// The outcome of a payment as reported by the bank.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub enum PaymentStatus {
    Ok,
    Failed,
    /// The status cell was empty.
    #[default]
    Unknown,
    /// Any other status, kept verbatim.
    Other(String),
}

impl PaymentStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, PaymentStatus::Ok)
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            OK_STR => PaymentStatus::Ok,
            FAILED_STR => PaymentStatus::Failed,
            "" => PaymentStatus::Unknown,
            _ => PaymentStatus::Other(value),
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Ok => f.write_str(OK_STR),
            PaymentStatus::Failed => f.write_str(FAILED_STR),
            PaymentStatus::Unknown => Ok(()),
            PaymentStatus::Other(s) => f.write_str(s),
        }
    }
}

const OK_STR: &str = "OK";
const FAILED_STR: &str = "FAILED";

/// The columns of a bank export that reports read. All other columns are carried through
/// untouched.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TransactionColumn {
    PaymentDate,
    CardNumber,
    Status,
    PaymentAmount,
    PaymentCurrency,
    Category,
}

impl TransactionColumn {
    pub fn from_header(header: impl AsRef<str>) -> Option<TransactionColumn> {
        match header.as_ref() {
            PAYMENT_DATE_STR => Some(TransactionColumn::PaymentDate),
            CARD_NUMBER_STR => Some(TransactionColumn::CardNumber),
            STATUS_STR => Some(TransactionColumn::Status),
            PAYMENT_AMOUNT_STR => Some(TransactionColumn::PaymentAmount),
            PAYMENT_CURRENCY_STR => Some(TransactionColumn::PaymentCurrency),
            CATEGORY_STR => Some(TransactionColumn::Category),
            _ => None,
        }
    }

    pub fn as_header_str(&self) -> &'static str {
        match self {
            TransactionColumn::PaymentDate => PAYMENT_DATE_STR,
            TransactionColumn::CardNumber => CARD_NUMBER_STR,
            TransactionColumn::Status => STATUS_STR,
            TransactionColumn::PaymentAmount => PAYMENT_AMOUNT_STR,
            TransactionColumn::PaymentCurrency => PAYMENT_CURRENCY_STR,
            TransactionColumn::Category => CATEGORY_STR,
        }
    }
}

pub const PAYMENT_DATE_STR: &str = "Дата платежа";
pub const CARD_NUMBER_STR: &str = "Номер карты";
pub const STATUS_STR: &str = "Статус";
pub const PAYMENT_AMOUNT_STR: &str = "Сумма платежа";
pub const PAYMENT_CURRENCY_STR: &str = "Валюта платежа";
pub const CATEGORY_STR: &str = "Категория";

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Transactions {
        Transactions::parse(vec![
            vec![
                "Дата операции",
                "Дата платежа",
                "Номер карты",
                "Статус",
                "Сумма платежа",
                "Валюта платежа",
                "Категория",
            ],
            vec![
                "15.03.2024 12:01:33",
                "15.03.2024",
                "*7197",
                "OK",
                "-160,89",
                "RUB",
                "Супермаркеты",
            ],
            vec!["10.03.2024 09:00:00", "10.03.2024", "", "FAILED", "-100"],
        ])
        .unwrap()
    }

    #[test]
    fn test_known_columns_are_extracted() {
        let transactions = sample();
        let first = transactions.iter().next().unwrap();
        assert_eq!(first.payment_date(), "15.03.2024");
        assert_eq!(first.card_number(), "*7197");
        assert_eq!(first.status(), &PaymentStatus::Ok);
        assert_eq!(first.amount(), Some(Decimal::from_str("-160.89").unwrap()));
        assert_eq!(first.currency(), "RUB");
        assert_eq!(first.category(), "Супермаркеты");
        assert!(first.is_spending());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let transactions = sample();
        let second = transactions.iter().nth(1).unwrap();
        assert_eq!(second.cells().len(), 7);
        assert_eq!(second.status(), &PaymentStatus::Failed);
        assert_eq!(second.category(), "");
        assert_eq!(second.masked_card(), "");
    }

    #[test]
    fn test_long_row_is_an_error() {
        let result = Transactions::parse(vec![vec!["Статус"], vec!["OK", "extra"]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_trailing_empty_cells_are_dropped() {
        let transactions = Transactions::parse(vec![
            vec!["Статус", "Категория"],
            vec!["OK", "Food", "", " "],
        ])
        .unwrap();
        let first = transactions.iter().next().unwrap();
        assert_eq!(first.cells().len(), 2);
        assert_eq!(first.category(), "Food");
    }

    #[test]
    fn test_empty_data_is_an_error() {
        assert!(Transactions::parse(Vec::<Vec<&str>>::new()).is_err());
    }

    #[test]
    fn test_serialize_uses_original_column_order() {
        let transactions = Transactions::parse(vec![
            vec!["Статус", "Сумма платежа", "Категория"],
            vec!["OK", "-500", "Food"],
        ])
        .unwrap();
        let json = serde_json::to_string(&transactions).unwrap();
        assert_eq!(
            json,
            r#"[{"Статус":"OK","Сумма платежа":-500,"Категория":"Food"}]"#
        );
    }

    #[test]
    fn test_is_spending() {
        let transactions = Transactions::parse(vec![
            vec!["Сумма платежа"],
            vec!["-1"],
            vec!["0"],
            vec!["25"],
            vec![""],
            vec!["n/a"],
        ])
        .unwrap();
        let spending: Vec<bool> = transactions.iter().map(|t| t.is_spending()).collect();
        assert_eq!(spending, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_mask_card() {
        assert_eq!(mask_card("1234567890123456"), "3456");
        assert_eq!(mask_card("*7197"), "7197");
        assert_eq!(mask_card("12"), "12");
        assert_eq!(mask_card(""), "");
    }

    #[test]
    fn test_payment_status_display() {
        assert_eq!(PaymentStatus::from("OK".to_string()).to_string(), "OK");
        let other = PaymentStatus::from("PENDING".to_string());
        assert_eq!(other, PaymentStatus::Other("PENDING".into()));
        assert!(!other.is_ok());
        assert_eq!(other.to_string(), "PENDING");
    }

    #[test]
    fn test_column_headers() {
        for column in [
            TransactionColumn::PaymentDate,
            TransactionColumn::CardNumber,
            TransactionColumn::Status,
            TransactionColumn::PaymentAmount,
            TransactionColumn::PaymentCurrency,
            TransactionColumn::Category,
        ] {
            assert_eq!(
                TransactionColumn::from_header(column.as_header_str()),
                Some(column)
            );
        }
        assert_eq!(TransactionColumn::from_header("MCC"), None);
    }
}
