//! Chart-ready data derived from one dashboard view.

use crate::data::GradedRecord;
use crate::stats::{AggregateView, GroupAverage, PivotMatrix};
use std::collections::BTreeMap;
use std::f64::consts::TAU;

/// Equal-width bins over the marks in view, counted per subject.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// Per-subject counts, one entry per bin, sorted by subject.
    pub series: Vec<(String, Vec<usize>)>,
}

impl Histogram {
    /// Bin `records` into `bins` equal-width bins spanning [min, max].
    /// The last bin is closed on the right; a flat range gets one unit-wide bin.
    /// Rows without a subject have no series and are not counted.
    pub fn build(records: &[GradedRecord], bins: usize) -> Self {
        let range = records
            .iter()
            .filter(|r| r.subject_key().is_some())
            .map(GradedRecord::marks)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            });
        let Some((min, max)) = range else {
            return Self::default();
        };

        let (bins, width) = if max > min {
            let bins = bins.max(1);
            (bins, (max - min) / bins as f64)
        } else {
            (1, 1.0)
        };

        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let mut counts: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for record in records {
            let Some(subject) = record.subject_key() else { continue };
            let index = (((record.marks() - min) / width).floor() as usize).min(bins - 1);
            counts.entry(subject).or_insert_with(|| vec![0; bins])[index] += 1;
        }

        Self {
            edges,
            series: counts
                .into_iter()
                .map(|(subject, c)| (subject.to_string(), c))
                .collect(),
        }
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn total(&self) -> usize {
        self.series.iter().flat_map(|(_, c)| c.iter()).sum()
    }

    pub fn max_count(&self) -> usize {
        self.series
            .iter()
            .flat_map(|(_, c)| c.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// One pie sector, angles in radians measured clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Lay out group averages as pie slices. Non-positive values get no area.
pub fn pie_slices(groups: &[GroupAverage]) -> Vec<PieSlice> {
    let total: f64 = groups.iter().map(|g| g.mean.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = 0.0;
    groups
        .iter()
        .map(|g| {
            let fraction = g.mean.max(0.0) / total;
            let start = angle;
            angle += fraction * TAU;
            PieSlice {
                label: g.key.clone(),
                value: g.mean,
                fraction,
                start_angle: start,
                end_angle: angle,
            }
        })
        .collect()
}

/// Everything the four charts need for one view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub student_averages: Vec<GroupAverage>,
    pub subject_averages: Vec<GroupAverage>,
    pub pivot: PivotMatrix,
    pub histogram: Histogram,
}

impl ChartData {
    pub fn from_view(view: &AggregateView, records: &[GradedRecord], bins: usize) -> Self {
        Self {
            student_averages: view.student_averages.clone(),
            subject_averages: view.subject_averages.clone(),
            pivot: view.pivot.clone(),
            histogram: Histogram::build(records, bins),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.student_averages.is_empty()
    }
}
