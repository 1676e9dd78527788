use tracing::{debug, info, warn};

use crate::credentials::resolve_credentials;
use crate::domain::{ConnectionError, HelipeConfig, StoreError, StoreWriteError, expand_path};

#[cfg(test)]
pub mod memory;
pub mod sheets;
pub mod workbook;

pub use sheets::SheetsStore;
pub use workbook::WorkbookStore;

/// A document made of named tabs, each one a header row followed by data rows.
pub trait TabularStore {
    /// Display name of the connected document.
    fn title(&self) -> String;

    fn sheet_names(&self) -> Result<Vec<String>, StoreError>;

    /// All rows of a tab, header first. Cells are returned as displayed, never coerced.
    fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Appends `values` as the new last row of `tab`.
    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), StoreError>;
}

/// Appends a row. A store that never connected is a write error, not a silent no-op.
pub fn append_row(
    store: Option<&dyn TabularStore>,
    tab: &str,
    values: &[String],
) -> Result<(), StoreWriteError> {
    let store = store.ok_or(StoreWriteError::NotConnected)?;
    debug!("Appending {} values to {tab}", values.len());
    store
        .append_row(tab, values)
        .map_err(|source| StoreWriteError::Backend {
            tab: tab.to_string(),
            source,
        })
}

/// Opens the configured store: the offline workbook when given, the spreadsheet otherwise.
pub fn connect(config: &HelipeConfig) -> Result<Box<dyn TabularStore>, ConnectionError> {
    let store = open(config)?;
    match store.sheet_names() {
        Ok(names) => info!("Connected to \"{}\", tabs: {}", store.title(), names.join(", ")),
        Err(e) => warn!("Connected to \"{}\" but could not list tabs: {e}", store.title()),
    }
    Ok(store)
}

fn open(config: &HelipeConfig) -> Result<Box<dyn TabularStore>, ConnectionError> {
    if let Some(dir) = &config.workbook {
        let store = WorkbookStore::open(expand_path(dir))?;
        debug!("Opened workbook {}", store.title());
        return Ok(Box::new(store));
    }

    let (origin, account) = resolve_credentials(
        &expand_path(&config.secrets),
        &expand_path(&config.credentials),
    )?;
    info!("Using service account {} from {origin}", account.client_email);
    let store = SheetsStore::connect(account, &config.spreadsheet_id)?;
    Ok(Box::new(store))
}
