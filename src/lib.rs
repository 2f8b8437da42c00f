//! finreport: spending reports from bank exports, with amounts converted to rubles using the daily
//! rates published by the Central Bank of Russia.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod rates;
pub mod reports;
mod utils;

#[cfg(test)]
mod test;

pub use config::{Config, UserSettings};
pub use error::Error;
pub use error::Result;
