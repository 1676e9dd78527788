use std::cell::RefCell;
use std::collections::BTreeMap;

use super::TabularStore;
use crate::domain::StoreError;

/// In-process store used by the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tabs: RefCell<BTreeMap<String, Vec<Vec<String>>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_tab(self, name: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.tabs.borrow_mut().insert(name.to_string(), rows);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.tabs.borrow().get(tab).cloned().unwrap_or_default()
    }

    fn simulated_failure() -> StoreError {
        StoreError::Api {
            status: 503,
            message: "simulated backend failure".to_string(),
        }
    }
}

impl TabularStore for MemoryStore {
    fn title(&self) -> String {
        "memory".to_string()
    }

    fn sheet_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.tabs.borrow().keys().cloned().collect())
    }

    fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, StoreError> {
        if self.fail_reads {
            return Err(Self::simulated_failure());
        }
        self.tabs
            .borrow()
            .get(tab)
            .cloned()
            .ok_or_else(|| StoreError::TabNotFound(tab.to_string()))
    }

    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::simulated_failure());
        }
        self.tabs
            .borrow_mut()
            .get_mut(tab)
            .ok_or_else(|| StoreError::TabNotFound(tab.to_string()))?
            .push(values.to_vec());
        Ok(())
    }
}
