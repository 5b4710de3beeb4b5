//! Data module - CSV loading, validation and filtering

mod filter;
mod loader;
mod processor;
mod record;
mod table;

pub use filter::{Selection, ViewFilter, ALL_LABEL};
pub use loader::{read_csv_bytes, DataLoader, LoaderError};
pub use processor::{DataProcessor, ValidationError, ValidationReport};
pub use record::{
    GradedRecord, Record, GRADE_COL, MARKS_COL, NAME_COL, REMARKS_COL, REQUIRED_COLUMNS,
    SUBJECT_COL,
};
pub use table::TablePreview;
