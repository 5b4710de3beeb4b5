//! Typed row views over the validated dataset.

use crate::grading::Grade;

pub const NAME_COL: &str = "Name";
pub const SUBJECT_COL: &str = "Subject";
pub const MARKS_COL: &str = "Marks";
pub const GRADE_COL: &str = "Grade";
pub const REMARKS_COL: &str = "Remarks";

/// Columns every upload must carry after name normalization.
pub const REQUIRED_COLUMNS: [&str; 3] = [NAME_COL, SUBJECT_COL, MARKS_COL];

/// One mark for one student in one subject. A blank Name or Subject cell
/// is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub marks: f64,
}

/// A record with its derived grade and remark.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedRecord {
    pub record: Record,
    pub grade: Grade,
    pub remarks: &'static str,
}

impl GradedRecord {
    pub fn new(name: impl Into<String>, subject: impl Into<String>, marks: f64) -> Self {
        Self::with_keys(Some(name.into()), Some(subject.into()), marks)
    }

    /// Build from possibly blank keys; empty strings count as blank.
    pub fn with_keys(name: Option<String>, subject: Option<String>, marks: f64) -> Self {
        let grade = Grade::from_mark(marks);
        Self {
            record: Record {
                name: name.filter(|n| !n.is_empty()),
                subject: subject.filter(|s| !s.is_empty()),
                marks,
            },
            grade,
            remarks: grade.remark(),
        }
    }

    /// Display name; blank when the cell was empty.
    pub fn name(&self) -> &str {
        self.name_key().unwrap_or("")
    }

    pub fn subject(&self) -> &str {
        self.subject_key().unwrap_or("")
    }

    /// Group key for per-student aggregates.
    pub fn name_key(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    pub fn subject_key(&self) -> Option<&str> {
        self.record.subject.as_deref()
    }

    pub fn marks(&self) -> f64 {
        self.record.marks
    }
}
