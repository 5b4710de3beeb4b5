//! Student Marks Analyzer - core library
//!
//! Loads a CSV of student marks, grades every row, and derives the averages,
//! pivot matrix, top performers, charts and exports shown by the dashboard.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod grading;
pub mod stats;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardError, DashboardView};
pub use grading::{classify, remark_for_label, Grade};
