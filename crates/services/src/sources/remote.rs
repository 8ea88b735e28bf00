use std::fmt;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{info, instrument};

use quiz_core::Word;

use super::rows::words_from_rows;
use crate::config::DEFAULT_EXPORT_BASE_URL;
use crate::error::SourceError;

static SHEET_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("sheet id pattern is valid")
});

//
// ─── SHEET ID ──────────────────────────────────────────────────────────────────
//

/// Identifier of a published Google Sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetId(String);

impl SheetId {
    /// Extract the id from a sheet URL (`…/spreadsheets/d/{id}/…`).
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidSourceReference` if the URL has no sheet id.
    pub fn from_url(url: &str) -> Result<Self, SourceError> {
        SHEET_ID_PATTERN
            .captures(url.trim())
            .and_then(|captures| captures.get(1))
            .map(|id| Self(id.as_str().to_owned()))
            .ok_or(SourceError::InvalidSourceReference)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── FETCHER ───────────────────────────────────────────────────────────────────
//

/// Transport for the CSV rendering of a sheet.
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    /// Fetch the sheet as CSV text. One attempt, no retries.
    async fn fetch_csv(&self, sheet_id: &SheetId) -> Result<String, SourceError>;
}

/// `SheetFetcher` over HTTP, using the gviz CSV export endpoint.
#[derive(Clone)]
pub struct HttpSheetFetcher {
    client: Client,
    base_url: String,
}

impl Default for HttpSheetFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_BASE_URL)
    }
}

impl HttpSheetFetcher {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client, e.g. one with a timeout or proxy.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn export_url(&self, sheet_id: &SheetId) -> String {
        format!(
            "{}/spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:csv",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl SheetFetcher for HttpSheetFetcher {
    #[instrument(skip_all, fields(sheet_id = %sheet_id))]
    async fn fetch_csv(&self, sheet_id: &SheetId) -> Result<String, SourceError> {
        let response = self.client.get(self.export_url(sheet_id)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::SourceUnavailable { status });
        }

        Ok(response.text().await?)
    }
}

//
// ─── CSV ───────────────────────────────────────────────────────────────────────
//

/// Line of the first data row in a sheet export; the header is line 1.
const CSV_FIRST_DATA_LINE: usize = 2;

/// Split CSV text into data rows, dropping the header line.
///
/// Rows may have differing field counts.
///
/// # Errors
///
/// Returns `SourceError::MalformedDocument` if the text is not valid CSV.
pub fn parse_csv_rows(text: &str) -> Result<Vec<Vec<String>>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_owned).collect())
                .map_err(|err| SourceError::MalformedDocument(err.to_string()))
        })
        .collect()
}

//
// ─── SOURCE ────────────────────────────────────────────────────────────────────
//

/// Loads words from a published Google Sheet.
#[derive(Clone)]
pub struct RemoteSheetSource {
    fetcher: Arc<dyn SheetFetcher>,
}

impl RemoteSheetSource {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SheetFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve `url` to a sheet, fetch it once and map its rows.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidSourceReference` for URLs without a sheet id,
    /// `SourceError::SourceUnavailable` / `SourceError::Transport` for fetch failures,
    /// `SourceError::MalformedDocument` for unparseable CSV and
    /// `SourceError::EmptySource` if no row is usable.
    pub async fn load_from_remote(&self, url: &str) -> Result<Vec<Word>, SourceError> {
        let sheet_id = SheetId::from_url(url)?;
        let body = self.fetcher.fetch_csv(&sheet_id).await?;
        let words = words_from_rows(parse_csv_rows(&body)?, CSV_FIRST_DATA_LINE)?;
        info!(sheet_id = %sheet_id, words = words.len(), "loaded words from sheet");
        Ok(words)
    }
}
