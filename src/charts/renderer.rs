//! Static Chart Renderer
//! Renders the four dashboard charts to PNG with plotters, for the report
//! bundle export.
//!
//! Layout per image: caption on top, chart body below. The pie chart draws
//! its own legend on the right.

use crate::charts::palette::{self, Rgb};
use crate::charts::series::{pie_slices, ChartData, Histogram};
use crate::stats::{GroupAverage, PivotMatrix};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rayon::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Plotting failed: {0}")]
    Plot(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Pixel buffer does not match image size")]
    Buffer,
    #[error("Nothing to draw for {0}")]
    NoData(&'static str),
}

fn plot_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Plot(e.to_string())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// The four chart images of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    StudentBar,
    SubjectPie,
    Heatmap,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::StudentBar,
        ChartKind::SubjectPie,
        ChartKind::Heatmap,
        ChartKind::Histogram,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::StudentBar => "Average Marks per Student",
            ChartKind::SubjectPie => "Average Marks per Subject",
            ChartKind::Heatmap => "Student-Subject Heatmap",
            ChartKind::Histogram => "Distribution of Marks",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::StudentBar => "student_averages_bar.png",
            ChartKind::SubjectPie => "subject_averages_pie.png",
            ChartKind::Heatmap => "student_subject_heatmap.png",
            ChartKind::Histogram => "marks_histogram.png",
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart kind in parallel. Charts with no data are skipped.
    pub fn render_all(
        data: &ChartData,
        width: u32,
        height: u32,
    ) -> Result<Vec<(ChartKind, Vec<u8>)>, RenderError> {
        let rendered: Vec<Option<(ChartKind, Vec<u8>)>> = ChartKind::ALL
            .par_iter()
            .map(|&kind| match Self::render(kind, data, width, height) {
                Ok(png) => Ok(Some((kind, png))),
                Err(RenderError::NoData(_)) => Ok(None),
                Err(e) => Err(e),
            })
            .collect::<Result<_, _>>()?;

        Ok(rendered.into_iter().flatten().collect())
    }

    /// Render one chart to PNG bytes.
    pub fn render(
        kind: ChartKind,
        data: &ChartData,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        match kind {
            ChartKind::StudentBar => {
                if data.student_averages.is_empty() {
                    return Err(RenderError::NoData(kind.title()));
                }
                render_png(width, height, |root| {
                    draw_bar(root, &data.student_averages, kind.title())
                })
            }
            ChartKind::SubjectPie => {
                if pie_slices(&data.subject_averages).is_empty() {
                    return Err(RenderError::NoData(kind.title()));
                }
                render_png(width, height, |root| {
                    draw_pie(root, &data.subject_averages, kind.title())
                })
            }
            ChartKind::Heatmap => {
                if data.pivot.is_empty() {
                    return Err(RenderError::NoData(kind.title()));
                }
                render_png(width, height, |root| draw_heatmap(root, &data.pivot, kind.title()))
            }
            ChartKind::Histogram => {
                if data.histogram.bin_count() == 0 {
                    return Err(RenderError::NoData(kind.title()));
                }
                render_png(width, height, |root| {
                    draw_histogram(root, &data.histogram, kind.title())
                })
            }
        }
    }
}

/// Draw into an RGB buffer and encode it as PNG.
fn render_png<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>, RenderError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
{
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        draw(&root)?;
        root.present().map_err(plot_err)?;
    }

    let img = image::RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    averages: &[GroupAverage],
    title: &str,
) -> Result<(), RenderError> {
    let n = averages.len();
    let lo = averages.iter().map(|g| g.mean).fold(f64::INFINITY, f64::min);
    let hi = averages.iter().map(|g| g.mean).fold(f64::NEG_INFINITY, f64::max);
    let y_min = lo.min(0.0);
    let y_max = if hi > 0.0 { hi * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..n).into_segmented(), y_min..y_max)
        .map_err(plot_err)?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => averages.get(*i).map(|g| g.key.clone()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label_of)
        .x_desc("Name")
        .y_desc("Marks")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(averages.iter().enumerate().map(|(i, g)| {
            let color = rgb(palette::viridis(g.mean, lo, hi));
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), g.mean)],
                color.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))
        .map_err(plot_err)?;

    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    averages: &[GroupAverage],
    title: &str,
) -> Result<(), RenderError> {
    let area = root.titled(title, (FONT, 28)).map_err(plot_err)?;
    let (w, h) = area.dim_in_pixel();
    let radius = (w.min(h) as f64) * 0.4;
    let center = ((w as f64) * 0.38, (h as f64) * 0.5);

    let slices = pie_slices(averages);
    for (i, slice) in slices.iter().enumerate() {
        let color = rgb(palette::categorical(i));
        let steps = ((slice.end_angle - slice.start_angle) / 0.02).ceil().max(1.0) as usize;
        let step = (slice.end_angle - slice.start_angle) / steps as f64;

        let mut points = vec![(center.0 as i32, center.1 as i32)];
        points.extend(
            (0..=steps).map(|k| polar(center, radius, slice.start_angle + step * k as f64)),
        );
        area.draw(&Polygon::new(points, color.filled()))
            .map_err(plot_err)?;

        if slice.fraction >= 0.04 {
            let style = (FONT, 18)
                .into_font()
                .color(&WHITE)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new(
                format!("{:.1}%", slice.fraction * 100.0),
                polar(center, radius * 0.65, slice.mid_angle()),
                style,
            ))
            .map_err(plot_err)?;
        }

        let legend_x = (w as f64 * 0.78) as i32;
        let legend_y = 40 + i as i32 * 28;
        area.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 16, legend_y + 16)],
            color.filled(),
        ))
        .map_err(plot_err)?;
        area.draw(&Text::new(
            format!("{} ({:.2})", slice.label, slice.value),
            (legend_x + 24, legend_y),
            (FONT, 16).into_font(),
        ))
        .map_err(plot_err)?;
    }

    Ok(())
}

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    pivot: &PivotMatrix,
    title: &str,
) -> Result<(), RenderError> {
    let rows = pivot.rows.len();
    let cols = pivot.columns.len();
    let (lo, hi) = pivot.value_range().unwrap_or((0.0, 100.0));

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(120)
        .build_cartesian_2d((0usize..cols).into_segmented(), (0usize..rows).into_segmented())
        .map_err(plot_err)?;

    // First name at the top.
    let row_at = |r: usize| rows - 1 - r;

    let x_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(c) => pivot.columns.get(*c).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(r) if *r < rows => pivot.rows[row_at(*r)].clone(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .x_desc("Subject")
        .y_desc("Name")
        .draw()
        .map_err(plot_err)?;

    let cells: Vec<(usize, usize, f64)> = pivot
        .cells
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, v)| v.map(|v| (r, c, v)))
        })
        .collect();

    chart
        .draw_series(cells.iter().map(|&(r, c, v)| {
            let y = row_at(r);
            Rectangle::new(
                [
                    (SegmentValue::Exact(c), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(c + 1), SegmentValue::Exact(y + 1)),
                ],
                rgb(palette::yl_gn_bu(v, lo, hi)).filled(),
            )
        }))
        .map_err(plot_err)?;

    chart
        .draw_series(cells.iter().map(|&(r, c, v)| {
            let bg = palette::yl_gn_bu(v, lo, hi);
            let text_color: &'static RGBColor = if palette::contrast_text(bg) == (0, 0, 0) {
                &BLACK
            } else {
                &WHITE
            };
            let style = (FONT, 16)
                .into_font()
                .color(text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(
                format!("{:.1}", v),
                (SegmentValue::CenterOf(c), SegmentValue::CenterOf(row_at(r))),
                style,
            )
        }))
        .map_err(plot_err)?;

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    histogram: &Histogram,
    title: &str,
) -> Result<(), RenderError> {
    let edges = &histogram.edges;
    let (x_min, x_max) = (edges[0], edges[edges.len() - 1]);
    let y_max = histogram.max_count().max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Marks")
        .y_desc("Count")
        .draw()
        .map_err(plot_err)?;

    for (i, (subject, counts)) in histogram.series.iter().enumerate() {
        let color = rgb(palette::categorical(i));
        chart
            .draw_series(
                counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &n)| n > 0)
                    .map(|(b, &n)| {
                        Rectangle::new(
                            [(edges[b], 0.0), (edges[b + 1], n as f64)],
                            color.mix(0.5).filled(),
                        )
                    }),
            )
            .map_err(plot_err)?
            .label(subject.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

fn polar(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.sin()) as i32,
        (center.1 - radius * angle.cos()) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GradedRecord;
    use crate::stats::Aggregator;

    #[test]
    fn test_empty_view_renders_nothing() {
        let data = ChartData::default();
        for kind in ChartKind::ALL {
            assert!(matches!(
                StaticChartRenderer::render(kind, &data, 400, 300),
                Err(RenderError::NoData(_))
            ));
        }
        assert!(StaticChartRenderer::render_all(&data, 400, 300)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_renders_png_for_each_chart() {
        let records = vec![
            GradedRecord::new("Alice", "Math", 95.0),
            GradedRecord::new("Alice", "Sci", 60.0),
            GradedRecord::new("Bob", "Math", 55.0),
        ];
        let view = Aggregator::compute(&records);
        let data = ChartData::from_view(&view, &records, 10);

        let rendered = StaticChartRenderer::render_all(&data, 640, 480).unwrap();
        let kinds: Vec<ChartKind> = rendered.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
        for (_, png) in &rendered {
            assert_eq!(&png[..4], b"\x89PNG");
        }
    }

    #[test]
    fn test_file_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), ChartKind::ALL.len());
    }
}
