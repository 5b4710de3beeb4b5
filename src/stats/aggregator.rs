//! Aggregator Module
//! Group-by averages, the student x subject pivot and top performers.

use crate::data::GradedRecord;
use crate::stats::calculator::{StatsCalculator, SummaryStats};
use std::collections::{BTreeMap, BTreeSet};

/// Mean marks for one group key (a student or a subject).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Name x Subject matrix of mean marks. Missing pairs are `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivotMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|n| n == row)?;
        let c = self.columns.iter().position(|s| s == column)?;
        self.cells[r][c]
    }

    /// Smallest and largest filled cell.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Everything derived from one view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateView {
    pub student_averages: Vec<GroupAverage>,
    pub subject_averages: Vec<GroupAverage>,
    pub pivot: PivotMatrix,
    pub top_performers: Vec<GradedRecord>,
    pub summary: SummaryStats,
}

pub struct Aggregator;

impl Aggregator {
    /// Compute all aggregates for the given (already filtered) records.
    pub fn compute(records: &[GradedRecord]) -> AggregateView {
        let marks: Vec<f64> = records.iter().map(GradedRecord::marks).collect();

        AggregateView {
            student_averages: Self::student_averages(records),
            subject_averages: Self::subject_averages(records),
            pivot: Self::pivot(records),
            top_performers: Self::top_performers(records),
            summary: StatsCalculator::summarize(&marks),
        }
    }

    /// Mean marks per student, sorted by name. Rows without a name are
    /// left out.
    pub fn student_averages(records: &[GradedRecord]) -> Vec<GroupAverage> {
        Self::group_mean(records, GradedRecord::name_key)
    }

    /// Mean marks per subject, sorted by subject.
    pub fn subject_averages(records: &[GradedRecord]) -> Vec<GroupAverage> {
        Self::group_mean(records, GradedRecord::subject_key)
    }

    fn group_mean<'a, F>(records: &'a [GradedRecord], key: F) -> Vec<GroupAverage>
    where
        F: Fn(&'a GradedRecord) -> Option<&'a str>,
    {
        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for record in records {
            let Some(k) = key(record) else { continue };
            let entry = groups.entry(k).or_insert((0.0, 0));
            entry.0 += record.marks();
            entry.1 += 1;
        }

        groups
            .into_iter()
            .map(|(k, (sum, count))| GroupAverage {
                key: k.to_string(),
                mean: sum / count as f64,
                count,
            })
            .collect()
    }

    /// Student x subject mean matrix; rows and columns sorted. Only rows
    /// carrying both a name and a subject take part.
    pub fn pivot(records: &[GradedRecord]) -> PivotMatrix {
        let mut sums: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
        for record in records {
            let (Some(name), Some(subject)) = (record.name_key(), record.subject_key()) else {
                continue;
            };
            let entry = sums.entry((name, subject)).or_insert((0.0, 0));
            entry.0 += record.marks();
            entry.1 += 1;
        }

        let rows: Vec<String> = sums
            .keys()
            .map(|(name, _)| name.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: Vec<String> = sums
            .keys()
            .map(|(_, subject)| subject.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cells = rows
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .map(|subject| {
                        sums.get(&(name.as_str(), subject.as_str()))
                            .map(|(sum, count)| sum / *count as f64)
                    })
                    .collect()
            })
            .collect();

        PivotMatrix {
            rows,
            columns,
            cells,
        }
    }

    /// Highest-marked record per subject, sorted by subject. On ties the
    /// earliest record in input order wins. Rows without a subject are
    /// skipped.
    pub fn top_performers(records: &[GradedRecord]) -> Vec<GradedRecord> {
        let mut best: BTreeMap<&str, &GradedRecord> = BTreeMap::new();
        for record in records {
            let Some(subject) = record.subject_key() else { continue };
            match best.get(subject) {
                Some(current) if current.marks() >= record.marks() => {}
                _ => {
                    best.insert(subject, record);
                }
            }
        }

        best.into_values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Grade;

    fn example() -> Vec<GradedRecord> {
        vec![
            GradedRecord::new("Alice", "Math", 95.0),
            GradedRecord::new("Alice", "Sci", 60.0),
            GradedRecord::new("Bob", "Math", 55.0),
        ]
    }

    fn means(groups: &[GroupAverage]) -> Vec<(&str, f64)> {
        groups.iter().map(|g| (g.key.as_str(), g.mean)).collect()
    }

    #[test]
    fn test_student_and_subject_averages() {
        let records = example();
        assert_eq!(
            means(&Aggregator::student_averages(&records)),
            vec![("Alice", 77.5), ("Bob", 55.0)]
        );
        assert_eq!(
            means(&Aggregator::subject_averages(&records)),
            vec![("Math", 75.0), ("Sci", 60.0)]
        );
    }

    #[test]
    fn test_pivot_leaves_missing_pairs_blank() {
        let pivot = Aggregator::pivot(&example());
        assert_eq!(pivot.rows, vec!["Alice", "Bob"]);
        assert_eq!(pivot.columns, vec!["Math", "Sci"]);
        assert_eq!(pivot.get("Alice", "Math"), Some(95.0));
        assert_eq!(pivot.get("Alice", "Sci"), Some(60.0));
        assert_eq!(pivot.get("Bob", "Math"), Some(55.0));
        assert_eq!(pivot.get("Bob", "Sci"), None);
        assert_eq!(pivot.value_range(), Some((55.0, 95.0)));
    }

    #[test]
    fn test_pivot_averages_repeated_pairs() {
        let records = vec![
            GradedRecord::new("Alice", "Math", 90.0),
            GradedRecord::new("Alice", "Math", 70.0),
        ];
        assert_eq!(Aggregator::pivot(&records).get("Alice", "Math"), Some(80.0));
    }

    #[test]
    fn test_top_performers() {
        let top = Aggregator::top_performers(&example());
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].name(), top[0].subject(), top[0].marks()), ("Alice", "Math", 95.0));
        assert_eq!(top[0].grade, Grade::APlus);
        assert_eq!((top[1].name(), top[1].subject(), top[1].marks()), ("Alice", "Sci", 60.0));
    }

    #[test]
    fn test_top_performer_ties_keep_first_occurrence() {
        let records = vec![
            GradedRecord::new("Cara", "Art", 88.0),
            GradedRecord::new("Dan", "Art", 88.0),
            GradedRecord::new("Eve", "Art", 70.0),
        ];
        let top = Aggregator::top_performers(&records);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name(), "Cara");
    }

    #[test]
    fn test_blank_keys_stay_out_of_groups() {
        let records = vec![
            GradedRecord::new("Alice", "Math", 95.0),
            GradedRecord::with_keys(None, Some("Math".into()), 40.0),
            GradedRecord::with_keys(Some("Bob".into()), None, 99.0),
        ];
        let view = Aggregator::compute(&records);

        let students: Vec<&str> = view.student_averages.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(students, vec!["Alice", "Bob"]);
        assert_eq!(view.student_averages[1].mean, 99.0);

        assert_eq!(view.subject_averages.len(), 1);
        assert_eq!(view.subject_averages[0].mean, 67.5);

        assert_eq!(view.pivot.rows, vec!["Alice"]);
        assert_eq!(view.pivot.columns, vec!["Math"]);

        assert_eq!(view.top_performers.len(), 1);
        assert_eq!(view.top_performers[0].name(), "Alice");

        assert_eq!(view.summary.count, 3);
        assert_eq!(view.summary.min, Some(40.0));
    }

    #[test]
    fn test_empty_view_yields_empty_aggregates() {
        let view = Aggregator::compute(&[]);
        assert!(view.student_averages.is_empty());
        assert!(view.subject_averages.is_empty());
        assert!(view.pivot.is_empty());
        assert!(view.top_performers.is_empty());
        assert_eq!(view.summary.count, 0);
        assert_eq!(view.summary.mean, None);
        assert_eq!(view.pivot.value_range(), None);
    }
}
