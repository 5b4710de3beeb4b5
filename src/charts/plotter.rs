//! Chart Plotter Module
//! Interactive dashboard charts and tables drawn with egui / egui_plot.

use crate::charts::palette::{self, Rgb};
use crate::charts::series::{pie_slices, Histogram};
use crate::data::{GradedRecord, TablePreview};
use crate::stats::{format_mark, GroupAverage, PivotMatrix};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Legend, Plot};

/// Max angle (radians) of one pie wedge segment, keeps every segment convex.
const PIE_SEGMENT: f64 = 0.08;

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Draws the dashboard charts using egui_plot and the egui painter.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar chart of per-student averages, colored by value.
    pub fn draw_bar_chart(ui: &mut egui::Ui, averages: &[GroupAverage], height: f32) {
        let (lo, hi) = value_range(averages);
        let labels: Vec<String> = averages.iter().map(|g| g.key.clone()).collect();

        let bars: Vec<Bar> = averages
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new(i as f64, g.mean)
                    .name(&g.key)
                    .width(0.6)
                    .fill(to_color32(palette::viridis(g.mean, lo, hi)))
            })
            .collect();

        Plot::new("student_average_bar")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Name")
            .y_axis_label("Marks")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Average Marks"));
            });
    }

    /// Pie chart of per-subject averages with a legend on the right.
    pub fn draw_pie_chart(ui: &mut egui::Ui, averages: &[GroupAverage], height: f32) {
        let slices = pie_slices(averages);
        if slices.is_empty() {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let (response, painter) = ui.allocate_painter(Vec2::splat(height), Sense::hover());
            let center = response.rect.center();
            let radius = (height * 0.45) as f64;

            for (i, slice) in slices.iter().enumerate() {
                let color = to_color32(palette::categorical(i));
                let steps = ((slice.end_angle - slice.start_angle) / PIE_SEGMENT).ceil() as usize;
                let steps = steps.max(1);
                let step = (slice.end_angle - slice.start_angle) / steps as f64;

                for k in 0..steps {
                    let a0 = slice.start_angle + step * k as f64;
                    let a1 = a0 + step;
                    painter.add(Shape::convex_polygon(
                        vec![center, polar(center, radius, a0), polar(center, radius, a1)],
                        color,
                        Stroke::NONE,
                    ));
                }

                if slice.fraction >= 0.04 {
                    painter.text(
                        polar(center, radius * 0.65, slice.mid_angle()),
                        Align2::CENTER_CENTER,
                        format!("{:.1}%", slice.fraction * 100.0),
                        FontId::proportional(12.0),
                        Color32::WHITE,
                    );
                }
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                for (i, slice) in slices.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 3.0, to_color32(palette::categorical(i)));
                        ui.label(format!("{}  ({:.2})", slice.label, slice.value));
                    });
                }
            });
        });
    }

    /// Student x subject heatmap; blank pairs stay uncolored.
    pub fn draw_heatmap(ui: &mut egui::Ui, pivot: &PivotMatrix) {
        if pivot.is_empty() {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        let (lo, hi) = pivot.value_range().unwrap_or((0.0, 100.0));
        let label_w = 110.0;
        let cell = Vec2::new(70.0, 28.0);
        let size = Vec2::new(
            label_w + cell.x * pivot.columns.len() as f32,
            cell.y * (pivot.rows.len() + 1) as f32,
        );

        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let origin = response.rect.min;
        let text_color = ui.visuals().text_color();
        let font = FontId::proportional(12.0);

        for (c, subject) in pivot.columns.iter().enumerate() {
            let pos = origin + Vec2::new(label_w + cell.x * (c as f32 + 0.5), cell.y * 0.5);
            painter.text(pos, Align2::CENTER_CENTER, subject, font.clone(), text_color);
        }

        for (r, name) in pivot.rows.iter().enumerate() {
            let y = cell.y * (r + 1) as f32;
            painter.text(
                origin + Vec2::new(label_w - 8.0, y + cell.y * 0.5),
                Align2::RIGHT_CENTER,
                name,
                font.clone(),
                text_color,
            );

            for (c, value) in pivot.cells[r].iter().enumerate() {
                let rect = egui::Rect::from_min_size(
                    origin + Vec2::new(label_w + cell.x * c as f32, y),
                    cell,
                );
                let Some(v) = value else {
                    painter.rect_stroke(rect, 0.0, Stroke::new(0.5, Color32::GRAY));
                    continue;
                };

                let bg = palette::yl_gn_bu(*v, lo, hi);
                painter.rect_filled(rect.shrink(0.5), 0.0, to_color32(bg));
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("{:.1}", v),
                    font.clone(),
                    to_color32(palette::contrast_text(bg)),
                );
            }
        }
    }

    /// Overlaid per-subject histogram of marks.
    pub fn draw_histogram(ui: &mut egui::Ui, histogram: &Histogram, height: f32) {
        let edges = histogram.edges.clone();

        Plot::new("marks_histogram")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Marks")
            .y_axis_label("Count")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (subject, counts)) in histogram.series.iter().enumerate() {
                    let color = to_color32(palette::categorical(i));
                    let bars: Vec<Bar> = counts
                        .iter()
                        .enumerate()
                        .filter(|(_, &n)| n > 0)
                        .map(|(b, &n)| {
                            let (lo, hi) = (edges[b], edges[b + 1]);
                            Bar::new((lo + hi) / 2.0, n as f64)
                                .width(hi - lo)
                                .name(format!("{}: {:.1}-{:.1}", subject, lo, hi))
                        })
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(color.gamma_multiply(0.6))
                            .name(subject),
                    );
                }
            });
    }

    /// Two-column table of group averages.
    pub fn draw_average_table(ui: &mut egui::Ui, id: &str, key_header: &str, rows: &[GroupAverage]) {
        egui::Grid::new(ui.make_persistent_id(id))
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new(key_header).strong());
                ui.label(RichText::new("Marks").strong());
                ui.end_row();

                for row in rows {
                    ui.label(&row.key);
                    ui.label(format!("{:.2}", row.mean));
                    ui.end_row();
                }
            });
    }

    /// Per-subject top performer table.
    pub fn draw_top_performers(ui: &mut egui::Ui, rows: &[GradedRecord]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("top_performers"))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Name", "Subject", "Marks", "Grade", "Remarks"] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for r in rows {
                            ui.label(r.name());
                            ui.label(r.subject());
                            ui.label(format_mark(r.marks()));
                            ui.label(
                                RichText::new(r.grade.label()).color(grade_color(r.grade.label())),
                            );
                            ui.label(r.remarks);
                            ui.end_row();
                        }
                    });
            });
    }

    /// Scrollable table of every column in view.
    pub fn draw_data_table(ui: &mut egui::Ui, table: &TablePreview) {
        egui::ScrollArea::both()
            .id_salt("filtered_data")
            .max_height(320.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("filtered_data_grid"))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 3.0])
                    .show(ui, |ui| {
                        for header in &table.headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for row in &table.rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

fn value_range(groups: &[GroupAverage]) -> (f64, f64) {
    groups.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), g| {
        (lo.min(g.mean), hi.max(g.mean))
    })
}

/// Point on a circle; angle 0 is 12 o'clock, increasing clockwise.
fn polar(center: Pos2, radius: f64, angle: f64) -> Pos2 {
    Pos2::new(
        center.x + (radius * angle.sin()) as f32,
        center.y - (radius * angle.cos()) as f32,
    )
}

fn grade_color(label: &str) -> Color32 {
    match label {
        "A+" | "A" => Color32::from_rgb(40, 167, 69),
        "F" => Color32::from_rgb(220, 53, 69),
        _ => Color32::GRAY,
    }
}
