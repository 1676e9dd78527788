use std::sync::Arc;
use std::time::Duration;

use google_cloud_auth::project::Config;
use google_cloud_auth::token::DefaultTokenSourceProvider;
use google_cloud_token::{TokenSource, TokenSourceProvider};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, trace};

use super::TabularStore;
use crate::credentials::ServiceAccount;
use crate::domain::{ConnectionError, StoreError};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Deserialize)]
struct SpreadsheetMetadata {
    properties: Option<Properties>,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: Properties,
}

#[derive(Deserialize)]
struct Properties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Google Sheets document bound to one spreadsheet id.
///
/// Every call is driven to completion on a private current-thread runtime, so
/// reads and writes stay blocking and strictly sequential.
pub struct SheetsStore {
    spreadsheet_id: String,
    title: String,
    client: Client,
    token_source: Arc<dyn TokenSource>,
    runtime: Runtime,
}

impl SheetsStore {
    pub fn connect(account: ServiceAccount, spreadsheet_id: &str) -> Result<Self, ConnectionError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ConnectionError::Runtime)?;

        let credentials = account.into_credentials_file()?;
        let provider = runtime
            .block_on(DefaultTokenSourceProvider::new_with_credentials(
                Config::default().with_scopes(&SCOPES),
                Box::new(credentials),
            ))
            .map_err(|e| ConnectionError::Auth(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(StoreError::from)?;

        let mut store = Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            title: String::new(),
            client,
            token_source: provider.token_source(),
            runtime,
        };
        let metadata = store.metadata()?;
        store.title = metadata
            .properties
            .map(|p| p.title)
            .unwrap_or_else(|| spreadsheet_id.to_string());
        info!(
            "Opened spreadsheet \"{}\" with {} tabs",
            store.title,
            metadata.sheets.len()
        );
        Ok(store)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let token = self
            .token_source
            .token()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;
        let response = request.header(AUTHORIZATION, token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message: api_message(&body),
        })
    }

    fn metadata(&self) -> Result<SpreadsheetMetadata, StoreError> {
        let url = metadata_url(&self.spreadsheet_id)?;
        trace!("GET {url}");
        self.runtime.block_on(async {
            let response = self.send(self.client.get(url)).await?;
            Ok::<_, StoreError>(response.json::<SpreadsheetMetadata>().await?)
        })
    }

    /// Looks the tab up among the document's worksheets, the way a worksheet open does.
    fn locate(&self, tab: &str) -> Result<(), StoreError> {
        let found = self
            .metadata()?
            .sheets
            .iter()
            .any(|sheet| sheet.properties.title == tab);
        if found {
            Ok(())
        } else {
            Err(StoreError::TabNotFound(tab.to_string()))
        }
    }
}

impl TabularStore for SheetsStore {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn sheet_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .metadata()?
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.locate(tab)?;
        let url = values_url(&self.spreadsheet_id, tab)?;
        trace!("GET {url}");
        let values = self.runtime.block_on(async {
            let response = self.send(self.client.get(url)).await?;
            Ok::<_, StoreError>(response.json::<ValueRange>().await?.values)
        })?;
        debug!("Read {} rows from {tab}", values.len());
        Ok(values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), StoreError> {
        self.locate(tab)?;
        let url = append_url(&self.spreadsheet_id, tab)?;
        let body = json!({ "values": [values] });
        trace!("POST {url}");
        self.runtime.block_on(async {
            self.send(self.client.post(url).json(&body)).await?;
            Ok::<_, StoreError>(())
        })
    }
}

fn endpoint(
    spreadsheet_id: &str,
    segments: &[&str],
    query: &[(&str, &str)],
) -> Result<Url, StoreError> {
    let mut url = Url::parse(SHEETS_API).map_err(|e| StoreError::InvalidRequest(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::InvalidRequest(SHEETS_API.to_string()))?
        .push(spreadsheet_id)
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Document title and tab titles, nothing else.
fn metadata_url(spreadsheet_id: &str) -> Result<Url, StoreError> {
    endpoint(
        spreadsheet_id,
        &[],
        &[("fields", "properties.title,sheets.properties.title")],
    )
}

/// Every value of a tab, rendered as the sheet displays it.
fn values_url(spreadsheet_id: &str, tab: &str) -> Result<Url, StoreError> {
    endpoint(
        spreadsheet_id,
        &["values", &quoted_range(tab)],
        &[("valueRenderOption", "FORMATTED_VALUE")],
    )
}

/// Appends after the last row of a tab, values stored as given.
fn append_url(spreadsheet_id: &str, tab: &str) -> Result<Url, StoreError> {
    let target = format!("{}:append", quoted_range(tab));
    endpoint(
        spreadsheet_id,
        &["values", &target],
        &[("valueInputOption", "RAW")],
    )
}

/// A1 range covering a whole tab, with quotes escaped by doubling.
fn quoted_range(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn api_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
