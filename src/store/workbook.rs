use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, trace};

use super::TabularStore;
use crate::domain::StoreError;

/// Offline store: a directory holding one `<tab>.csv` file per tab.
///
/// Files are read header-less with every column as a string, so the first
/// line comes back as the header row like any other row. The first line also
/// fixes the width: cells past it are cut off, short lines are padded with `""`.
#[derive(Debug)]
pub struct WorkbookStore {
    root: PathBuf,
}

impl WorkbookStore {
    pub fn open(root: PathBuf) -> Result<Self, StoreError> {
        let metadata = fs::metadata(&root)?;
        if !metadata.is_dir() {
            return Err(StoreError::IoError(std::io::Error::new(
                ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            )));
        }
        Ok(Self { root })
    }

    fn locate(&self, tab: &str) -> Result<PathBuf, StoreError> {
        let path = self.root.join(format!("{tab}.csv"));
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::TabNotFound(tab.to_string()))
        }
    }

    fn load_csv(path: &Path) -> Result<DataFrame, PolarsError> {
        CsvReadOptions::default()
            .with_has_header(false)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(true))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    }

    /// Makes sure the next append starts on a fresh line.
    fn ends_with_newline(path: &Path) -> Result<bool, std::io::Error> {
        let mut file = fs::File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(true);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }
}

impl TabularStore for WorkbookStore {
    fn title(&self) -> String {
        self.root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string()
    }

    fn sheet_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem().and_then(|s| s.to_str())) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_rows(&self, tab: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let path = self.locate(tab)?;
        if fs::metadata(&path)?.len() == 0 {
            return Ok(Vec::new());
        }

        let df = match Self::load_csv(&path) {
            Err(PolarsError::NoData(_)) => {
                debug!("No rows in {}", path.display());
                return Ok(Vec::new());
            }
            result => result?,
        };
        let mut rows = vec![Vec::with_capacity(df.width()); df.height()];
        for name in df.get_column_names() {
            let column = df.column(name.as_str())?.cast(&DataType::String)?;
            for (row, value) in rows.iter_mut().zip(column.str()?.into_iter()) {
                row.push(value.unwrap_or("").to_string());
            }
        }
        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), StoreError> {
        let path = self.locate(tab)?;
        let columns: Vec<Column> = values
            .iter()
            .enumerate()
            .map(|(idx, value)| Column::new(format!("column_{}", idx + 1).into(), [value.as_str()]))
            .collect();
        let mut df = DataFrame::new(columns)?;

        let needs_newline = !Self::ends_with_newline(&path)?;
        let mut file = OpenOptions::new().append(true).open(&path)?;
        if needs_newline {
            file.write_all(b"\n")?;
        }
        CsvWriter::new(&mut file)
            .include_header(false)
            .finish(&mut df)?;
        trace!("Appended {values:?} to {}", path.display());
        Ok(())
    }
}
