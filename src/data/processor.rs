//! Data Processor Module
//! Column normalization, schema validation, marks coercion, grading and
//! view filtering. Every step takes a DataFrame and returns a new one.

use crate::data::record::{
    GradedRecord, GRADE_COL, MARKS_COL, NAME_COL, REMARKS_COL, REQUIRED_COLUMNS, SUBJECT_COL,
};
use crate::grading::{classify, remark_for_label};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("The CSV must contain columns: Name, Subject, Marks (missing: {})", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("Two columns normalize to the same name: {0}")]
    DuplicateColumn(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Outcome of validating an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Handles the immutable cleaning pipeline.
pub struct DataProcessor;

impl DataProcessor {
    /// Trim a column name and capitalize it: first character upper-case,
    /// the rest lower-case.
    pub fn normalize_column_name(name: &str) -> String {
        let mut chars = name.trim().chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Rename every column to its normalized form.
    pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame, ValidationError> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let normalized = Self::normalize_column_name(column.name());
            if !seen.insert(normalized.clone()) {
                return Err(ValidationError::DuplicateColumn(normalized));
            }
            columns.push(column.clone().with_name(normalized.into()));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Fail unless Name, Subject and Marks are all present.
    pub fn require_columns(df: &DataFrame) -> Result<(), ValidationError> {
        let present: HashSet<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !present.contains(**c))
            .map(|c| c.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingColumns { missing })
        }
    }

    /// Parse one cell of the marks column. Unparsable values are missing, and
    /// so are `NaN`, `inf` and `-inf`: a mark has to be a finite number to be
    /// graded, averaged or binned.
    pub fn parse_mark(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Replace the Marks column with a Float64 column; bad cells become null.
    pub fn coerce_marks(df: &DataFrame) -> Result<DataFrame, ValidationError> {
        let marks = df.column(MARKS_COL)?;

        let parsed: Vec<Option<f64>> = match marks.dtype() {
            DataType::String => marks
                .str()?
                .into_iter()
                .map(|v| v.and_then(Self::parse_mark))
                .collect(),
            _ => {
                let as_f64 = marks.cast(&DataType::Float64)?;
                as_f64
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect()
            }
        };

        let mut out = df.clone();
        out.with_column(Column::new(MARKS_COL.into(), parsed))?;
        Ok(out)
    }

    /// Drop rows whose Marks are null. Returns the cleaned frame and the
    /// number of dropped rows.
    pub fn drop_missing_marks(df: &DataFrame) -> Result<(DataFrame, usize), ValidationError> {
        let mask = df
            .column(MARKS_COL)?
            .as_materialized_series()
            .is_not_null();
        let cleaned = df.filter(&mask)?;
        let dropped = df.height() - cleaned.height();
        Ok((cleaned, dropped))
    }

    /// Normalize, check the schema, coerce marks and drop bad rows.
    pub fn validate(df: &DataFrame) -> Result<(DataFrame, ValidationReport), ValidationError> {
        let normalized = Self::normalize_columns(df)?;
        Self::require_columns(&normalized)?;
        let coerced = Self::coerce_marks(&normalized)?;
        let (cleaned, rows_dropped) = Self::drop_missing_marks(&coerced)?;

        let report = ValidationReport {
            rows_read: df.height(),
            rows_kept: cleaned.height(),
            rows_dropped,
        };

        if rows_dropped > 0 {
            log::warn!(
                "Dropped {} of {} rows with non-numeric or missing marks",
                rows_dropped,
                report.rows_read
            );
        }

        Ok((cleaned, report))
    }

    /// Append Grade and Remarks columns derived from Marks.
    pub fn annotate_grades(df: &DataFrame) -> Result<DataFrame, ValidationError> {
        let marks = df.column(MARKS_COL)?.f64()?;

        let grades: Vec<Option<&str>> = marks
            .into_iter()
            .map(|m| m.map(|v| classify(v).label()))
            .collect();
        let remarks: Vec<Option<&str>> = grades
            .iter()
            .map(|g| g.map(remark_for_label))
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(GRADE_COL.into(), grades))?;
        out.with_column(Column::new(REMARKS_COL.into(), remarks))?;
        Ok(out)
    }

    /// Full upload pipeline: validate then grade.
    pub fn prepare(df: &DataFrame) -> Result<(DataFrame, ValidationReport), ValidationError> {
        let (cleaned, report) = Self::validate(df)?;
        let graded = Self::annotate_grades(&cleaned)?;
        log::info!(
            "Validated dataset: {} rows kept, {} dropped",
            report.rows_kept,
            report.rows_dropped
        );
        Ok((graded, report))
    }

    /// Sorted distinct values of a text column; nulls and empty cells are
    /// skipped.
    pub fn unique_sorted(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.str().ok())
            .map(|ca| {
                ca.into_iter()
                    .flatten()
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Typed rows of a graded frame, in frame order. Null or empty names and
    /// subjects become `None` keys.
    pub fn graded_records(df: &DataFrame) -> Result<Vec<GradedRecord>, ValidationError> {
        let names = df.column(NAME_COL)?.str()?;
        let subjects = df.column(SUBJECT_COL)?.str()?;
        let marks = df.column(MARKS_COL)?.f64()?;

        let records = names
            .into_iter()
            .zip(subjects.into_iter())
            .zip(marks.into_iter())
            .filter_map(|((name, subject), mark)| {
                mark.map(|m| {
                    GradedRecord::with_keys(name.map(str::to_string), subject.map(str::to_string), m)
                })
            })
            .collect();

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv_bytes;

    fn frame(csv: &str) -> DataFrame {
        read_csv_bytes(csv.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(DataProcessor::normalize_column_name(" name "), "Name");
        assert_eq!(DataProcessor::normalize_column_name("SUBJECT"), "Subject");
        assert_eq!(DataProcessor::normalize_column_name("mArKs"), "Marks");
        assert_eq!(DataProcessor::normalize_column_name("first NAME"), "First name");
        assert_eq!(DataProcessor::normalize_column_name("   "), "");
    }

    #[test]
    fn test_accepts_case_and_whitespace_variants() {
        let df = frame(" name ,SUBJECT,marks\nAlice,Math,95\n");
        let (out, report) = DataProcessor::validate(&df).unwrap();
        let cols: Vec<String> = out.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(cols, vec!["Name", "Subject", "Marks"]);
        assert_eq!(report.rows_kept, 1);
    }

    #[test]
    fn test_rejects_missing_columns() {
        for csv in [
            "Subject,Marks\nMath,1\n",
            "Name,Marks\nA,1\n",
            "NAME,subject\nA,Math\n",
        ] {
            match DataProcessor::validate(&frame(csv)) {
                Err(ValidationError::MissingColumns { missing }) => assert_eq!(missing.len(), 1),
                other => panic!("expected MissingColumns, got {:?}", other.map(|(_, r)| r)),
            }
        }
    }

    #[test]
    fn test_reports_every_missing_column() {
        let err = DataProcessor::validate(&frame("Student,Score\nA,1\n")).unwrap_err();
        match err {
            ValidationError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Name", "Subject", "Marks"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_columns_colliding_after_normalization() {
        let err = DataProcessor::validate(&frame("Name,NAME,Subject,Marks\nA,B,Math,1\n"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateColumn(ref c) if c == "Name"));
    }

    #[test]
    fn test_drops_non_numeric_marks() {
        let df = frame("Name,Subject,Marks\nAlice,Math,95\nBob,Math,abc\nCara,Sci,\nDan,Sci, 61.5 \n");
        let (out, report) = DataProcessor::validate(&df).unwrap();
        assert_eq!(
            report,
            ValidationReport {
                rows_read: 4,
                rows_kept: 2,
                rows_dropped: 2
            }
        );
        let marks: Vec<f64> = out
            .column(MARKS_COL)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(marks, vec![95.0, 61.5]);
    }

    #[test]
    fn test_parse_mark() {
        assert_eq!(DataProcessor::parse_mark("  42 "), Some(42.0));
        assert_eq!(DataProcessor::parse_mark("-3.5"), Some(-3.5));
        assert_eq!(DataProcessor::parse_mark("1e2"), Some(100.0));
        assert_eq!(DataProcessor::parse_mark("NaN"), None);
        assert_eq!(DataProcessor::parse_mark("inf"), None);
        assert_eq!(DataProcessor::parse_mark("-inf"), None);
        assert_eq!(DataProcessor::parse_mark("ninety"), None);
        assert_eq!(DataProcessor::parse_mark(""), None);
    }

    #[test]
    fn test_extra_columns_pass_through() {
        let df = frame("Name,Subject,Marks,Class\nAlice,Math,95,7B\n");
        let (out, _) = DataProcessor::prepare(&df).unwrap();
        let cols: Vec<String> = out.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(cols, vec!["Name", "Subject", "Marks", "Class", "Grade", "Remarks"]);
    }

    #[test]
    fn test_annotate_grades_and_remarks() {
        let df = frame("Name,Subject,Marks\nAlice,Math,95\nAlice,Sci,60\nBob,Math,55\n");
        let (out, _) = DataProcessor::prepare(&df).unwrap();
        let grades: Vec<&str> = out
            .column(GRADE_COL)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(grades, vec!["A+", "C", "D"]);

        let remarks: Vec<&str> = out
            .column(REMARKS_COL)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(remarks, vec!["Excellent! 🎉", "Needs improvement!", "Focus needed!"]);
    }

    #[test]
    fn test_blank_keys_are_not_choices() {
        let df = frame("Name,Subject,Marks\nAlice,Math,95\n,Math,40\nBob,,70\n");
        let (out, report) = DataProcessor::prepare(&df).unwrap();
        assert_eq!(report.rows_kept, 3);
        assert_eq!(DataProcessor::unique_sorted(&out, NAME_COL), vec!["Alice", "Bob"]);
        assert_eq!(DataProcessor::unique_sorted(&out, SUBJECT_COL), vec!["Math"]);

        let records = DataProcessor::graded_records(&out).unwrap();
        assert_eq!(records[1].name_key(), None);
        assert_eq!(records[1].name(), "");
        assert_eq!(records[2].subject_key(), None);
    }

    #[test]
    fn test_unique_sorted_and_records() {
        let df = frame("Name,Subject,Marks\nBob,Sci,70\nAlice,Math,95\nBob,Math,55\n");
        let (out, _) = DataProcessor::prepare(&df).unwrap();
        assert_eq!(DataProcessor::unique_sorted(&out, NAME_COL), vec!["Alice", "Bob"]);
        assert_eq!(DataProcessor::unique_sorted(&out, SUBJECT_COL), vec!["Math", "Sci"]);

        let records = DataProcessor::graded_records(&out).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name(), "Bob");
        assert_eq!(records[1].marks(), 95.0);
        assert_eq!(records[1].remarks, "Excellent! 🎉");
    }
}
