//! CSV Data Loader Module
//! Reads an uploaded marks file into a Polars DataFrame.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("The CSV file is empty")]
    Empty,
    #[error("No data loaded")]
    NoData,
}

/// Holds the raw (unvalidated) upload and where it came from.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file from disk.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let bytes = std::fs::read(file_path)?;
        let df = read_csv_bytes(bytes)?;
        log::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names as they appear in the file.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the raw upload.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    pub fn clear(&mut self) {
        self.df = None;
        self.file_path = None;
    }
}

/// Parse CSV bytes with a header row. Every column is read as text so that
/// coercion of the marks column is decided by the validator, not by schema
/// inference.
pub fn read_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(LoaderError::Empty);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_all_columns_as_text() {
        let df = read_csv_bytes(b"Name,Subject,Marks\nAlice,Math,95\n".to_vec()).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("Marks").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(read_csv_bytes(Vec::new()), Err(LoaderError::Empty)));
        assert!(matches!(
            read_csv_bytes(b"  \n".to_vec()),
            Err(LoaderError::Empty)
        ));
    }

    #[test]
    fn test_loader_tracks_path_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marks.csv");
        std::fs::write(&path, "Name,Subject,Marks\nA,Math,1\nB,Math,2\n").unwrap();

        let mut loader = DataLoader::new();
        loader.load_csv(&path).unwrap();
        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(loader.get_columns(), vec!["Name", "Subject", "Marks"]);
        assert_eq!(loader.get_file_path(), Some(&path));

        loader.clear();
        assert!(loader.get_dataframe().is_none());
    }
}
