//! Tabular data sources.

use crate::error::{LookupError, Result};
use crate::table::Table;
use async_trait::async_trait;
use partscan_core::SheetsConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Provider of a header + rows table.
///
/// The table is fetched again on every lookup; sources keep no row cache.
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Fetch the whole table.
    ///
    /// # Errors
    /// Returns error if the source is unreachable, misconfigured, or answers
    /// with something that is not a table.
    async fn fetch_table(&self) -> Result<Table>;

    /// Short identifier used in logs.
    fn source_id(&self) -> &str;
}

/// In-memory table, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    table: Table,
}

impl StaticSource {
    /// Serve `table` on every fetch.
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self { table }
    }
}

#[async_trait]
impl TabularSource for StaticSource {
    async fn fetch_table(&self) -> Result<Table> {
        Ok(self.table.clone())
    }

    fn source_id(&self) -> &'static str {
        "static"
    }
}

/// Spreadsheet values API source.
///
/// Reads `GET {base}/spreadsheets/{id}/values/{sheet}?key={key}`; the first
/// row of `values` is the header.
pub struct SheetsSource {
    client: Client,
    api_base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    api_key: Option<String>,
}

impl SheetsSource {
    /// Create a source from settings.
    ///
    /// Missing credentials are reported per request, not here, so a server
    /// can start and answer with a configuration error.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &SheetsConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::NotConfigured(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Full values URL, or a configuration error when credentials are missing.
    fn values_url(&self) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .filter(|_| !self.spreadsheet_id.is_empty())
            .ok_or_else(|| {
                tracing::error!("Missing spreadsheet credentials");
                LookupError::NotConfigured(
                    "please add GOOGLE_SHEETS_API_KEY and GOOGLE_SPREADSHEET_ID".to_string(),
                )
            })?;

        Ok(format!(
            "{}/spreadsheets/{}/values/{}?key={}",
            self.api_base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(&self.sheet_name),
            urlencoding::encode(api_key),
        ))
    }
}

#[async_trait]
impl TabularSource for SheetsSource {
    async fn fetch_table(&self) -> Result<Table> {
        let url = self.values_url()?;
        tracing::debug!(sheet = %self.sheet_name, "Fetching sheet values");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), "Sheets API error: {}", error_text);

            if status.as_u16() == 400 {
                return Err(LookupError::MalformedSource(error_text));
            }
            return Err(LookupError::Transport {
                status: status.as_u16(),
                message: format!("Sheets API error: {error_text}"),
            });
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| LookupError::ParseError(format!("invalid sheet values: {e}")))?;

        Ok(range.into_table())
    }

    fn source_id(&self) -> &'static str {
        "sheets"
    }
}

// Sheets API types

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    fn into_table(self) -> Table {
        let rows = self
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        Table::from_rows(rows)
    }
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SheetsConfig {
        SheetsConfig {
            api_base_url: "https://sheets.example/v4/".to_string(),
            spreadsheet_id: "abc123".to_string(),
            sheet_name: "Parts List".to_string(),
            api_key: Some("k&y".to_string()),
        }
    }

    #[test]
    fn test_values_url_is_encoded() {
        let source =
            SheetsSource::from_config(&config(), Duration::from_secs(5)).expect("create source");
        assert_eq!(
            source.values_url().expect("build url"),
            "https://sheets.example/v4/spreadsheets/abc123/values/Parts%20List?key=k%26y"
        );
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let mut cfg = config();
        cfg.api_key = None;
        let source = SheetsSource::from_config(&cfg, Duration::from_secs(5)).expect("create source");
        assert!(matches!(
            source.values_url(),
            Err(LookupError::NotConfigured(_))
        ));

        let mut cfg = config();
        cfg.spreadsheet_id = String::new();
        let source = SheetsSource::from_config(&cfg, Duration::from_secs(5)).expect("create source");
        assert!(source.values_url().is_err());
    }

    #[test]
    fn test_value_range_conversion() {
        let json = serde_json::json!({
            "range": "Sheet1!A1:C3",
            "majorDimension": "ROWS",
            "values": [["ID", "Quantity"], ["HL-1", 12], ["HL-2"]]
        });
        let range: ValueRange = serde_json::from_value(json).expect("parse value range");
        let table = range.into_table();

        assert_eq!(table.headers(), ["ID", "Quantity"]);
        assert_eq!(table.rows()[0], vec!["HL-1".to_string(), "12".to_string()]);
        assert_eq!(table.rows()[1].len(), 1);
    }

    #[test]
    fn test_missing_values_is_empty_table() {
        let range: ValueRange =
            serde_json::from_value(serde_json::json!({ "range": "Sheet1" })).expect("parse");
        assert!(range.into_table().is_empty());
    }

    #[tokio::test]
    async fn test_static_source_returns_table() {
        let table = Table::from_rows(vec![vec!["ID".to_string()]]);
        let source = StaticSource::new(table.clone());
        assert_eq!(source.fetch_table().await.expect("fetch"), table);
        assert_eq!(source.source_id(), "static");
    }
}
