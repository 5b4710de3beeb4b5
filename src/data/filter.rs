//! Student / Subject view filters.

use crate::data::record::{NAME_COL, SUBJECT_COL};
use polars::prelude::*;
use std::fmt;

/// Label shown for the "no filter" choice.
pub const ALL_LABEL: &str = "All";

/// One filter choice: everything, or a single exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v.as_str()),
        }
    }

    /// Choices for a selector: "All" followed by the given values.
    pub fn choices(values: &[String]) -> Vec<Selection> {
        std::iter::once(Selection::All)
            .chain(values.iter().cloned().map(Selection::Only))
            .collect()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

/// Narrows the validated dataset before any aggregation or export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub student: Selection,
    pub subject: Selection,
}

impl ViewFilter {
    pub fn is_unfiltered(&self) -> bool {
        self.student == Selection::All && self.subject == Selection::All
    }

    /// Reset a selection whose value no longer exists in the dataset.
    pub fn retain_known(&mut self, students: &[String], subjects: &[String]) {
        if let Selection::Only(name) = &self.student {
            if !students.contains(name) {
                self.student = Selection::All;
            }
        }
        if let Selection::Only(subject) = &self.subject {
            if !subjects.contains(subject) {
                self.subject = Selection::All;
            }
        }
    }

    /// Apply both selections (AND). "All" leaves the frame untouched.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        let predicate = [
            (NAME_COL, self.student.value()),
            (SUBJECT_COL, self.subject.value()),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| col(column).eq(lit(v))))
        .reduce(|acc, expr| acc.and(expr));

        match predicate {
            None => Ok(df.clone()),
            Some(predicate) => df.clone().lazy().filter(predicate).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_csv_bytes, DataProcessor};

    fn dataset() -> DataFrame {
        let raw = read_csv_bytes(
            b"Name,Subject,Marks\nAlice,Math,95\nAlice,Sci,60\nBob,Math,55\n".to_vec(),
        )
        .unwrap();
        DataProcessor::prepare(&raw).unwrap().0
    }

    #[test]
    fn test_all_leaves_dataset_unfiltered() {
        let df = dataset();
        let filter = ViewFilter::default();
        assert!(filter.is_unfiltered());
        assert_eq!(filter.apply(&df).unwrap().height(), 3);
    }

    #[test]
    fn test_filters_by_student_and_subject() {
        let df = dataset();

        let by_student = ViewFilter {
            student: Selection::Only("Alice".into()),
            subject: Selection::All,
        };
        assert_eq!(by_student.apply(&df).unwrap().height(), 2);

        let by_subject = ViewFilter {
            student: Selection::All,
            subject: Selection::Only("Math".into()),
        };
        assert_eq!(by_subject.apply(&df).unwrap().height(), 2);

        let both = ViewFilter {
            student: Selection::Only("Bob".into()),
            subject: Selection::Only("Sci".into()),
        };
        assert_eq!(both.apply(&df).unwrap().height(), 0);
    }

    #[test]
    fn test_retain_known_resets_stale_selection() {
        let mut filter = ViewFilter {
            student: Selection::Only("Zed".into()),
            subject: Selection::Only("Math".into()),
        };
        filter.retain_known(&["Alice".into()], &["Math".into()]);
        assert_eq!(filter.student, Selection::All);
        assert_eq!(filter.subject, Selection::Only("Math".into()));
    }

    #[test]
    fn test_choices_start_with_all() {
        let choices = Selection::choices(&["Alice".into(), "Bob".into()]);
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0].to_string(), "All");
        assert_eq!(choices[2].to_string(), "Bob");
    }
}
