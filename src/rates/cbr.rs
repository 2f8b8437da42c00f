//! Implements `RateSource` using the daily rates published by the Central Bank of Russia.

use crate::model::parse_decimal;
use crate::rates::{RateSource, RateTable};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, error, trace};
use url::Url;

/// The daily rates endpoint. It takes the date as `date_req=DD/MM/YYYY`.
pub const CBR_DAILY_URL: &str = "https://cbr.ru/scripts/XML_daily.asp";

const DATE_REQ_FORMAT: &str = "%d/%m/%Y";

/// Fetches the full table of ruble rates for a date with one HTTP request.
#[derive(Debug, Clone)]
pub struct CbrRates {
    client: reqwest::Client,
    base_url: Url,
}

impl CbrRates {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Uses `client` for the requests, e.g. one configured with a proxy or timeouts.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The request URL for `date`. The date is placed in the query verbatim, slashes included.
    pub fn request_url(&self, date: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&format!(
            "date_req={}",
            date.format(DATE_REQ_FORMAT)
        )));
        url
    }

    async fn get_rates(&self, date: NaiveDate) -> Result<RateTable> {
        let url = self.request_url(date);
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send rates request to {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Rates request to {url} failed with status {status}");
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read the rates response body")?;
        parse_rates(&body).with_context(|| format!("Failed to parse the rates for {date}"))
    }
}

#[async_trait::async_trait]
impl RateSource for CbrRates {
    async fn fetch(&mut self, date: NaiveDate) -> Option<RateTable> {
        match self.get_rates(date).await {
            Ok(rates) => {
                debug!("Fetched {} rates for {date}", rates.len());
                Some(rates)
            }
            Err(e) => {
                error!("Unable to fetch rates for {date}: {e:#}");
                None
            }
        }
    }
}

/// The child of a `Valute` element whose text is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    CharCode,
    VunitRate,
}

/// Parses a daily rates document: repeated `Valute` elements, each with a `CharCode` and a
/// `VunitRate` (rubles per one unit, written with a decimal comma). Elements missing either are
/// skipped.
///
/// Only the ASCII fields are decoded, so documents in the provider's single-byte encoding parse
/// without transcoding.
///
/// # Errors
/// - The document is not well-formed XML.
/// - A `VunitRate` is not a number.
/// - The document holds no rates at all.
pub fn parse_rates(xml: &[u8]) -> Result<RateTable> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut rates = RateTable::new();
    let mut in_valute = false;
    let mut field: Option<Field> = None;
    let mut code: Option<String> = None;
    let mut rate: Option<String> = None;

    loop {
        let event = reader.read_event().with_context(|| {
            format!(
                "Malformed rates document at position {}",
                reader.buffer_position()
            )
        })?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"Valute" => {
                    in_valute = true;
                    code = None;
                    rate = None;
                }
                b"CharCode" if in_valute => field = Some(Field::CharCode),
                b"VunitRate" if in_valute => field = Some(Field::VunitRate),
                _ => field = None,
            },
            Event::Text(t) => {
                let text = String::from_utf8_lossy(&t).trim().to_string();
                match field {
                    Some(Field::CharCode) => code = Some(text),
                    Some(Field::VunitRate) => rate = Some(text),
                    None => {}
                }
            }
            Event::End(e) => {
                field = None;
                if e.name().as_ref() == b"Valute" {
                    in_valute = false;
                    if let (Some(code), Some(rate)) = (code.take(), rate.take()) {
                        let value = parse_decimal(&rate)
                            .with_context(|| format!("Invalid rate '{rate}' for {code}"))?;
                        rates.insert(code, value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if rates.is_empty() {
        bail!("The document contains no currency rates");
    }
    Ok(rates)
}
