//! Dashboard pipeline: upload -> validated dataset -> filtered view.
//!
//! A `Dashboard` owns the validated, graded dataset of one upload. Each
//! filter change produces a fresh `DashboardView`; nothing is mutated.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{
    read_csv_bytes, DataProcessor, GradedRecord, LoaderError, TablePreview, ValidationError,
    ValidationReport, ViewFilter, NAME_COL, SUBJECT_COL,
};
use crate::export::{BundleEntry, CsvExporter, ExportError, ExportKind};
use crate::stats::{AggregateView, Aggregator};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The validated dataset of one upload plus its filter choices.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: DataFrame,
    report: ValidationReport,
    students: Vec<String>,
    subjects: Vec<String>,
}

impl Dashboard {
    /// Validate and grade a raw upload.
    pub fn from_frame(raw: &DataFrame) -> Result<Self, ValidationError> {
        let (dataset, report) = DataProcessor::prepare(raw)?;
        let students = DataProcessor::unique_sorted(&dataset, NAME_COL);
        let subjects = DataProcessor::unique_sorted(&dataset, SUBJECT_COL);

        Ok(Self {
            dataset,
            report,
            students,
            subjects,
        })
    }

    pub fn from_csv_bytes(bytes: Vec<u8>) -> Result<Self, DashboardError> {
        let raw = read_csv_bytes(bytes)?;
        Ok(Self::from_frame(&raw)?)
    }

    pub fn dataset(&self) -> &DataFrame {
        &self.dataset
    }

    pub fn report(&self) -> ValidationReport {
        self.report
    }

    pub fn students(&self) -> &[String] {
        &self.students
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Recompute everything for one filter state.
    pub fn view(&self, filter: &ViewFilter, bins: usize) -> Result<DashboardView, ValidationError> {
        let frame = filter.apply(&self.dataset)?;
        let records = DataProcessor::graded_records(&frame)?;
        let aggregates = Aggregator::compute(&records);
        let charts = ChartData::from_view(&aggregates, &records, bins);
        let table = TablePreview::from_frame(&frame);

        log::debug!(
            "View {:?}: {} of {} rows",
            filter,
            frame.height(),
            self.dataset.height()
        );

        Ok(DashboardView {
            frame,
            records,
            aggregates,
            charts,
            table,
        })
    }
}

/// Everything shown for the current filter.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub frame: DataFrame,
    pub records: Vec<GradedRecord>,
    pub aggregates: AggregateView,
    pub charts: ChartData,
    pub table: TablePreview,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn export_csv(&self, kind: ExportKind, decimals: u32) -> Result<Vec<u8>, ExportError> {
        CsvExporter::render(kind, &self.frame, &self.aggregates, decimals)
    }

    /// All CSV exports followed by the chart images.
    pub fn bundle_entries(&self, config: &DashboardConfig) -> Result<Vec<BundleEntry>, ExportError> {
        let mut entries: Vec<BundleEntry> =
            CsvExporter::render_all(&self.frame, &self.aggregates, config.pivot_decimals)?
                .into_iter()
                .map(|(kind, bytes)| BundleEntry::new(kind.file_name(), bytes))
                .collect();

        let charts =
            StaticChartRenderer::render_all(&self.charts, config.chart_width, config.chart_height)?;
        entries.extend(
            charts
                .into_iter()
                .map(|(kind, png)| BundleEntry::new(kind.file_name(), png)),
        );

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Selection;

    const EXAMPLE: &[u8] = b"Name,Subject,Marks\nAlice,Math,95\nAlice,Sci,60\nBob,Math,55\n";

    #[test]
    fn test_choices_are_sorted_distinct() {
        let dashboard = Dashboard::from_csv_bytes(EXAMPLE.to_vec()).unwrap();
        assert_eq!(dashboard.students(), ["Alice", "Bob"]);
        assert_eq!(dashboard.subjects(), ["Math", "Sci"]);
        assert_eq!(dashboard.report().rows_kept, 3);
    }

    #[test]
    fn test_filter_narrows_every_aggregate() {
        let dashboard = Dashboard::from_csv_bytes(EXAMPLE.to_vec()).unwrap();
        let filter = ViewFilter {
            student: Selection::All,
            subject: Selection::Only("Math".into()),
        };
        let view = dashboard.view(&filter, 10).unwrap();

        assert_eq!(view.records.len(), 2);
        assert_eq!(view.aggregates.subject_averages.len(), 1);
        assert_eq!(view.aggregates.pivot.columns, vec!["Math"]);
        assert_eq!(view.aggregates.summary.max, Some(95.0));
        assert_eq!(view.aggregates.summary.min, Some(55.0));
        assert_eq!(view.charts.histogram.total(), 2);
        assert_eq!(view.table.len(), 2);
    }

    #[test]
    fn test_empty_view_does_not_fail() {
        let dashboard = Dashboard::from_csv_bytes(EXAMPLE.to_vec()).unwrap();
        let filter = ViewFilter {
            student: Selection::Only("Bob".into()),
            subject: Selection::Only("Sci".into()),
        };
        let view = dashboard.view(&filter, 10).unwrap();
        assert!(view.is_empty());
        assert!(view.charts.is_empty());
        assert_eq!(view.aggregates.summary.mean, None);
    }

    #[test]
    fn test_schema_error_halts() {
        let err = Dashboard::from_csv_bytes(b"Name,Marks\nAlice,90\n".to_vec()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Validation(ValidationError::MissingColumns { .. })
        ));
    }
}
