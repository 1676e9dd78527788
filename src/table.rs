use tracing::{error, trace};

use crate::domain::TabReadError;
use crate::store::TabularStore;

/// Header plus data rows of one tab, every cell kept as a string.
///
/// Columns named by the empty string are dropped. Duplicate names are kept as-is;
/// looking a column up by name resolves to the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularView {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Position in the tab of every kept column.
    source_columns: Vec<usize>,
}

impl TabularView {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a view from raw store rows, the first one being the header.
    ///
    /// Short rows are padded with empty cells to the widest row, so cells past
    /// the header end up under blank names and are dropped with them.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = rows.into_iter().map(|mut row| {
            row.resize(width, String::new());
            row
        });
        let Some(raw_header) = rows.next() else {
            return Self::empty();
        };

        let keep: Vec<usize> = raw_header
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(idx, _)| idx)
            .collect();
        let select = |row: &[String]| keep.iter().map(|&idx| row[idx].clone()).collect::<Vec<_>>();

        let header = select(raw_header.as_slice());
        let rows = rows.map(|row| select(row.as_slice())).collect();
        Self {
            header,
            rows,
            source_columns: keep,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Index of the first column whose name matches, ignoring case and surrounding blanks.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// View column holding the tab's column at `position`. `None` if that column was dropped.
    pub fn source_column(&self, position: usize) -> Option<usize> {
        self.source_columns.iter().position(|&c| c == position)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// Reads one tab. Errors are returned as values and never cross the store boundary as panics.
pub fn read_tab(store: &dyn TabularStore, tab: &str) -> Result<TabularView, TabReadError> {
    trace!("Reading tab {tab}");
    let rows = store.read_rows(tab).map_err(|source| TabReadError {
        tab: tab.to_string(),
        source,
    })?;
    Ok(TabularView::from_rows(rows))
}

/// User-facing messages collected during one render pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Degrades a failed read to an empty view and records the failure.
    pub fn view_or_empty(&mut self, result: Result<TabularView, TabReadError>) -> TabularView {
        match result {
            Ok(view) => view,
            Err(e) => {
                error!("{e}");
                self.push(e.to_string());
                TabularView::empty()
            }
        }
    }
}

/// Reads a tab, reporting any failure to `diagnostics` and returning an empty view instead.
pub fn read_tab_or_empty(
    store: &dyn TabularStore,
    tab: &str,
    diagnostics: &mut Diagnostics,
) -> TabularView {
    diagnostics.view_or_empty(read_tab(store, tab))
}
