//! Export module - CSV artifacts and the ZIP report bundle

mod bundle;
mod csv;

pub use bundle::{BundleEntry, ReportBundle, BUNDLE_FILE_NAME};
pub use csv::{round_to, CsvExporter, ExportKind};

use crate::charts::RenderError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Failed to render chart: {0}")]
    Render(#[from] RenderError),
}
