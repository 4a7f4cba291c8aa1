// =============================================================================
// GOOGLE SHEETS CLIENT (API KEY, READ ONLY)
// =============================================================================
//
// Reads spreadsheet metadata and cell ranges through the Sheets v4 REST API.
// An API key only grants access to sheets shared as "Anyone with the link",
// which is why the default test sheet is Google's public sample.
//
// **Setup:**
// 1. Enable the Google Sheets API in Google Cloud Console
//    ("APIs & Services" > "Library" > "Google Sheets API").
// 2. Create an API key under "APIs & Services" > "Credentials".
// 3. If the key is restricted, allow the Sheets API for it.
//
// **Environment Variables:**
// - `SHEETS_API_KEY` - The API key
// - `SHEETS_TEST_SHEET_ID` - Spreadsheet to read (defaults to the sample sheet)

use reqwest::Client;
use serde::Deserialize;

use crate::config::SheetsSettings;
use crate::core::harness::CheckError;
use crate::infra::google_api::{self, ApiReply};

// =============================================================================
// GOOGLE SHEETS API RESPONSE STRUCTURES
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpreadsheetProperties {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Spreadsheet {
    pub properties: SpreadsheetProperties,
}

/// Cell values for a range, rows first. Trailing empty cells and rows are
/// omitted by the API, so rows can be ragged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValueRange {
    pub range: Option<String>,
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn header(&self) -> Option<Vec<String>> {
        self.values.first().map(|row| row_to_strings(row))
    }

    pub fn first_data_row(&self) -> Option<Vec<String>> {
        self.values.get(1).map(|row| row_to_strings(row))
    }
}

// Cells come back as strings by default but numbers and booleans are
// possible with other render options.
fn row_to_strings(row: &[serde_json::Value]) -> Vec<String> {
    row.iter()
        .map(|cell| match cell {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

// =============================================================================
// GOOGLE SHEETS CLIENT
// =============================================================================

pub struct SheetsClient {
    client: Client,
    api_key: Option<String>,
    sheet_id: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(settings: &SheetsSettings) -> Result<Self, CheckError> {
        Ok(Self {
            client: google_api::build_client(settings.timeout)?,
            api_key: settings.api_key.clone(),
            sheet_id: settings.sheet_id.clone(),
            base_url: settings.base_url.clone(),
        })
    }

    /// The configured test spreadsheet.
    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    /// GET `/v4/spreadsheets/{id}`.
    pub async fn get_spreadsheet(
        &self,
        sheet_id: &str,
    ) -> Result<ApiReply<Spreadsheet>, CheckError> {
        self.get(&["v4", "spreadsheets", sheet_id]).await
    }

    /// GET `/v4/spreadsheets/{id}/values/{range}`, e.g. `Class Data!A:H`.
    pub async fn get_values(
        &self,
        sheet_id: &str,
        range: &str,
    ) -> Result<ApiReply<ValueRange>, CheckError> {
        self.get(&["v4", "spreadsheets", sheet_id, "values", range]).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<ApiReply<T>, CheckError> {
        let key = google_api::require_key(self.api_key.as_deref(), "SHEETS_API_KEY")?;
        let url = google_api::endpoint(&self.base_url, segments)?;

        tracing::debug!("Sheets GET {}", url.path());

        let response = self
            .client
            .get(url)
            .query(&[("key", key)])
            .send()
            .await?;

        google_api::read_reply(response).await
    }
}
