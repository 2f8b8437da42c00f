use anyhow::bail;
use std::collections::HashSet;

use crate::Result;

/// The header row of a bank export: the column names in their original order.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<String>,
}

impl Mapping {
    /// Create a new `Mapping` from the header row. Blank headers are named `Unnamed: {index}`, the
    /// way spreadsheet tools label them, so that every column has a distinct key.
    pub fn new<S, I>(headers: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(Into::into)
            .enumerate()
            .map(|(ix, h)| {
                if h.trim().is_empty() {
                    format!("Unnamed: {ix}")
                } else {
                    h
                }
            })
            .collect();

        let mut seen = HashSet::new();
        if let Some(duplicate) = headers.iter().find(|h| !seen.insert(*h)) {
            bail!("Encountered a duplicate header '{duplicate}' in {:?}", headers)
        }

        Ok(Self { headers })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_keeps_order() {
        let mapping = Mapping::new(["Дата платежа", "Статус", "Категория"]).unwrap();
        assert_eq!(mapping.len(), 3);
        assert!(!mapping.is_empty());
        assert_eq!(mapping.headers(), &["Дата платежа", "Статус", "Категория"]);
    }

    #[test]
    fn test_mapping_names_blank_headers() {
        let mapping = Mapping::new(["Статус", "", " "]).unwrap();
        assert_eq!(mapping.headers(), &["Статус", "Unnamed: 1", "Unnamed: 2"]);
    }

    #[test]
    fn test_mapping_rejects_duplicates() {
        let result = Mapping::new(["Статус", "Статус"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate header"));
    }
}
