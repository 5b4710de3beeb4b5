//! Charts module - Chart data, interactive plots and static rendering

pub mod palette;
mod plotter;
mod renderer;
mod series;

pub use plotter::{to_color32, ChartPlotter};
pub use renderer::{ChartKind, RenderError, StaticChartRenderer};
pub use series::{pie_slices, ChartData, Histogram, PieSlice};
