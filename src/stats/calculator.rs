//! Statistics Calculator Module
//! Summary statistics (KPIs) over the marks currently in view.

use statrs::statistics::Statistics;

/// KPI values for a view. Empty views have no mean/max/min.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl SummaryStats {
    /// Average formatted to two decimals, or a dash for an empty view.
    pub fn mean_label(&self) -> String {
        self.mean
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn max_label(&self) -> String {
        self.max.map(format_mark).unwrap_or_else(|| "-".to_string())
    }

    pub fn min_label(&self) -> String {
        self.min.map(format_mark).unwrap_or_else(|| "-".to_string())
    }
}

/// Render a mark without a trailing `.0` on whole numbers.
pub fn format_mark(mark: f64) -> String {
    if mark.fract() == 0.0 {
        format!("{:.0}", mark)
    } else {
        format!("{}", mark)
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute count, mean, max and min of a set of marks.
    pub fn summarize(values: &[f64]) -> SummaryStats {
        if values.is_empty() {
            return SummaryStats::default();
        }

        SummaryStats {
            count: values.len(),
            mean: Some(Statistics::mean(values)),
            max: Some(Statistics::max(values)),
            min: Some(Statistics::min(values)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_example_view() {
        let stats = StatsCalculator::summarize(&[95.0, 60.0, 55.0]);
        assert_eq!(stats.count, 3);
        assert!((stats.mean.unwrap() - 70.0).abs() < 1e-9);
        assert_eq!(stats.max, Some(95.0));
        assert_eq!(stats.min, Some(55.0));
        assert_eq!(stats.mean_label(), "70.00");
        assert_eq!(stats.max_label(), "95");
    }

    #[test]
    fn test_empty_view_is_safe() {
        let stats = StatsCalculator::summarize(&[]);
        assert_eq!(stats, SummaryStats::default());
        assert_eq!(stats.mean_label(), "-");
        assert_eq!(stats.min_label(), "-");
    }

    #[test]
    fn test_format_mark() {
        assert_eq!(format_mark(95.0), "95");
        assert_eq!(format_mark(61.5), "61.5");
        assert_eq!(format_mark(-4.0), "-4");
    }
}
