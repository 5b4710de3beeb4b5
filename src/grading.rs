//! Grading Module
//! Maps numeric marks to letter grades and grades to remarks.

use std::fmt;

/// Letter grade, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 6] = [Grade::APlus, Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Classify a mark. Lower bounds are inclusive and checked top-down,
    /// so every real number (including negatives and > 100) gets a grade.
    pub fn from_mark(mark: f64) -> Self {
        match mark {
            m if m >= 90.0 => Grade::APlus,
            m if m >= 80.0 => Grade::A,
            m if m >= 70.0 => Grade::B,
            m if m >= 60.0 => Grade::C,
            m if m >= 50.0 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Parse a label such as `"A+"`. Surrounding whitespace is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "F" => Some(Grade::F),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn remark(self) -> &'static str {
        match self {
            Grade::APlus => "Excellent! 🎉",
            Grade::A => "Great work! 👍",
            Grade::B => "Good, keep going!",
            Grade::C => "Needs improvement!",
            Grade::D => "Focus needed!",
            Grade::F => "At risk 🚨",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grade label for a mark.
pub fn classify(mark: f64) -> Grade {
    Grade::from_mark(mark)
}

/// Remark for a grade label; unknown labels map to an empty string.
pub fn remark_for_label(label: &str) -> &'static str {
    Grade::from_label(label).map(Grade::remark).unwrap_or("")
}
