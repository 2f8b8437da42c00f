//! These structs provide the CLI interface for finreport.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// finreport: spending reports from bank exports.
///
/// Reads a bank export (a spreadsheet or CSV file with one row per operation), selects the
/// successful payments of one category over the last three months and saves them as a JSON report.
/// It can also convert amounts to rubles using the daily rates of the Central Bank of Russia.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Report the spending in one category over the three months ending on a date.
    ///
    /// The selected rows are written as JSON to `data/spending_by_category_<today>.json` in the
    /// finreport home directory unless --output is given.
    Spending(SpendingArgs),
    /// Convert an amount of a foreign currency to rubles.
    Convert(ConvertArgs),
    /// Show the ruble rates of the currencies listed in the user settings.
    Rates(RatesArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory holding config.json and user_settings.json. Reports and logs are written
    /// under it by default.
    #[arg(long, env = "FINREPORT_HOME", default_value = ".")]
    home: PathBuf,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: impl Into<PathBuf>) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &Path {
        &self.home
    }
}

/// Args for the `finreport spending` command.
#[derive(Debug, Parser, Clone)]
pub struct SpendingArgs {
    /// The bank export to read: .csv, or a spreadsheet (.xlsx, .xls, .ods).
    #[arg(long)]
    file: PathBuf,

    /// The category to report, matched exactly, e.g. "Супермаркеты".
    #[arg(long)]
    category: String,

    /// The last day of the report window as YYYY-MM-DD, e.g. 2024-03-20. Note that this differs
    /// from the DD.MM.YYYY dates taken by `convert` and `rates`. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// Write the report to this file instead of the data directory.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl SpendingArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        category: impl Into<String>,
        date: Option<String>,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            file: file.into(),
            category: category.into(),
            date,
            output,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Args for the `finreport convert` command.
#[derive(Debug, Parser, Clone)]
pub struct ConvertArgs {
    /// The amount to convert, e.g. 100 or 12.50
    #[arg(long, allow_negative_numbers = true)]
    amount: Decimal,

    /// The currency code of the amount, e.g. USD
    #[arg(long)]
    currency: String,

    /// The date of the rate as DD.MM.YYYY. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl ConvertArgs {
    pub fn new(amount: Decimal, currency: impl Into<String>, date: Option<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            date,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for the `finreport rates` command.
#[derive(Debug, Parser, Clone)]
pub struct RatesArgs {
    /// The date of the rates as DD.MM.YYYY. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl RatesArgs {
    pub fn new(date: Option<String>) -> Self {
        Self { date }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}
