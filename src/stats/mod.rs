//! Stats module - aggregations and summary statistics

mod aggregator;
mod calculator;

pub use aggregator::{AggregateView, Aggregator, GroupAverage, PivotMatrix};
pub use calculator::{format_mark, StatsCalculator, SummaryStats};
