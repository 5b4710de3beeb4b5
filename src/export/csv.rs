//! CSV exports of the current view.

use crate::data::{MARKS_COL, NAME_COL, SUBJECT_COL};
use crate::export::ExportError;
use crate::stats::{AggregateView, GroupAverage, PivotMatrix};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// The four downloadable CSV artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    FullData,
    StudentAverages,
    SubjectAverages,
    Matrix,
}

impl ExportKind {
    pub const ALL: [ExportKind; 4] = [
        ExportKind::FullData,
        ExportKind::StudentAverages,
        ExportKind::SubjectAverages,
        ExportKind::Matrix,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::FullData => "full_student_data.csv",
            ExportKind::StudentAverages => "student_averages.csv",
            ExportKind::SubjectAverages => "subject_averages.csv",
            ExportKind::Matrix => "student_subject_matrix.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportKind::FullData => "Full Data with Grades",
            ExportKind::StudentAverages => "Student Averages",
            ExportKind::SubjectAverages => "Subject Averages",
            ExportKind::Matrix => "Student vs Subject Matrix",
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub struct CsvExporter;

impl CsvExporter {
    /// Serialize one artifact for the given view.
    pub fn render(
        kind: ExportKind,
        view_df: &DataFrame,
        aggregates: &AggregateView,
        decimals: u32,
    ) -> Result<Vec<u8>, ExportError> {
        match kind {
            ExportKind::FullData => Self::write_frame(&mut view_df.clone()),
            ExportKind::StudentAverages => {
                Self::averages(NAME_COL, &aggregates.student_averages)
            }
            ExportKind::SubjectAverages => {
                Self::averages(SUBJECT_COL, &aggregates.subject_averages)
            }
            ExportKind::Matrix => Self::matrix(&aggregates.pivot, decimals),
        }
    }

    /// All four artifacts, in `ExportKind::ALL` order.
    pub fn render_all(
        view_df: &DataFrame,
        aggregates: &AggregateView,
        decimals: u32,
    ) -> Result<Vec<(ExportKind, Vec<u8>)>, ExportError> {
        ExportKind::ALL
            .iter()
            .map(|&kind| -> Result<_, ExportError> {
                Ok((kind, Self::render(kind, view_df, aggregates, decimals)?))
            })
            .collect()
    }

    /// Write all four artifacts into `dir`, returning the written paths.
    pub fn write_all_to_dir(
        dir: &Path,
        view_df: &DataFrame,
        aggregates: &AggregateView,
        decimals: u32,
    ) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir)?;
        Self::render_all(view_df, aggregates, decimals)?
            .into_iter()
            .map(|(kind, bytes)| -> Result<PathBuf, ExportError> {
                let path = dir.join(kind.file_name());
                std::fs::write(&path, bytes)?;
                Ok(path)
            })
            .collect()
    }

    fn averages(key: &str, rows: &[GroupAverage]) -> Result<Vec<u8>, ExportError> {
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        let means: Vec<f64> = rows.iter().map(|r| r.mean).collect();

        let mut df = DataFrame::new(vec![
            Column::new(key.into(), keys),
            Column::new(MARKS_COL.into(), means),
        ])?;
        Self::write_frame(&mut df)
    }

    /// Name column followed by one text column per subject. Missing pairs
    /// are null so they serialize as empty fields.
    fn matrix(pivot: &PivotMatrix, decimals: u32) -> Result<Vec<u8>, ExportError> {
        let mut columns = Vec::with_capacity(pivot.columns.len() + 1);
        let key = Self::row_key_header(&pivot.columns);
        columns.push(Column::new(key.as_str().into(), pivot.rows.clone()));

        for (c, subject) in pivot.columns.iter().enumerate() {
            let cells: Vec<Option<String>> = pivot
                .cells
                .iter()
                .map(|row| {
                    row[c].map(|v| {
                        format!("{:.*}", decimals as usize, round_to(v, decimals))
                    })
                })
                .collect();
            columns.push(Column::new(subject.as_str().into(), cells));
        }

        let mut df = DataFrame::new(columns)?;
        Self::write_frame(&mut df)
    }

    /// `Name`, with underscores appended while a subject already uses it.
    fn row_key_header(subjects: &[String]) -> String {
        let mut key = NAME_COL.to_string();
        while subjects.iter().any(|s| *s == key) {
            key.push('_');
        }
        key
    }

    fn write_frame(df: &mut DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf).include_header(true).finish(df)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_csv_bytes, DataProcessor};
    use crate::stats::Aggregator;

    fn example() -> (DataFrame, AggregateView) {
        let raw = read_csv_bytes(
            b"Name,Subject,Marks\nAlice,Math,95\nAlice,Sci,60\nBob,Math,55\nCara,Sci,abc\n"
                .to_vec(),
        )
        .unwrap();
        let (df, _) = DataProcessor::prepare(&raw).unwrap();
        let records = DataProcessor::graded_records(&df).unwrap();
        (df, Aggregator::compute(&records))
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(77.46, 1), 77.5);
        assert_eq!(round_to(77.44, 1), 77.4);
        assert_eq!(round_to(-2.25, 0), -2.0);
    }

    #[test]
    fn test_matrix_has_blanks_and_one_decimal() {
        let (df, view) = example();
        let csv = CsvExporter::render(ExportKind::Matrix, &df, &view, 1).unwrap();
        assert_eq!(
            lines(&csv),
            vec!["Name,Math,Sci", "Alice,95.0,60.0", "Bob,55.0,"]
        );
    }

    #[test]
    fn test_matrix_key_header_avoids_subject_names() {
        let raw = read_csv_bytes(
            b"Name,Subject,Marks\nAlice,Name,80\nAlice,Math,90\nBob,Name_,70\n".to_vec(),
        )
        .unwrap();
        let (df, _) = DataProcessor::prepare(&raw).unwrap();
        let records = DataProcessor::graded_records(&df).unwrap();
        let view = Aggregator::compute(&records);

        let csv = CsvExporter::render(ExportKind::Matrix, &df, &view, 1).unwrap();
        assert_eq!(
            lines(&csv),
            vec!["Name__,Math,Name,Name_", "Alice,90.0,80.0,", "Bob,,,70.0"]
        );
    }

    #[test]
    fn test_full_data_excludes_dropped_rows() {
        let (df, view) = example();
        let csv = CsvExporter::render(ExportKind::FullData, &df, &view, 1).unwrap();
        let text = lines(&csv);
        assert_eq!(text[0], "Name,Subject,Marks,Grade,Remarks");
        assert_eq!(text.len(), 4);
        assert!(text.iter().all(|l| !l.starts_with("Cara")));
        assert!(text[1].starts_with("Alice,Math,95"));
        assert!(text[1].ends_with("A+,Excellent! 🎉"));
    }

    #[test]
    fn test_average_exports_read_back() {
        let (df, view) = example();
        let csv = CsvExporter::render(ExportKind::StudentAverages, &df, &view, 1).unwrap();
        let back = read_csv_bytes(csv).unwrap();
        let names: Vec<&str> = back
            .column("Name")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        let marks: Vec<f64> = back
            .column("Marks")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .filter_map(DataProcessor::parse_mark)
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(marks, vec![77.5, 55.0]);

        let csv = CsvExporter::render(ExportKind::SubjectAverages, &df, &view, 1).unwrap();
        assert_eq!(lines(&csv)[0], "Subject,Marks");
    }

    #[test]
    fn test_write_all_to_dir() {
        let (df, view) = example();
        let dir = tempfile::tempdir().unwrap();
        let paths = CsvExporter::write_all_to_dir(dir.path(), &df, &view, 1).unwrap();
        assert_eq!(paths.len(), 4);
        for kind in ExportKind::ALL {
            assert!(dir.path().join(kind.file_name()).exists());
        }
    }
}
