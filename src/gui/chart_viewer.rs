//! Chart Viewer Widget
//! Central scrollable panel: KPIs, data tables and the four charts for the
//! current view.

use egui::{Color32, RichText, ScrollArea};
use marks_dashboard::charts::ChartPlotter;
use marks_dashboard::data::ValidationReport;
use marks_dashboard::DashboardView;

const CARD_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 300.0;

/// Scrollable dashboard body for the current view.
#[derive(Default)]
pub struct ChartViewer {
    view: Option<DashboardView>,
    report: Option<ValidationReport>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.view = None;
        self.report = None;
    }

    pub fn set_view(&mut self, view: DashboardView, report: ValidationReport) {
        self.view = Some(view);
        self.report = Some(report);
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(
                        "👆 Please upload a .csv file with Name, Subject, and Marks columns.",
                    )
                    .size(18.0),
                );
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(report) = &self.report {
                    Self::draw_report_banner(ui, report);
                }
                ui.add_space(CARD_SPACING);

                Self::draw_kpis(ui, view);
                ui.add_space(CARD_SPACING);

                egui::CollapsingHeader::new(format!(
                    "📋 View Filtered Data ({} rows)",
                    view.table.len()
                ))
                .id_salt("filtered_data_header")
                .show(ui, |ui| ChartPlotter::draw_data_table(ui, &view.table));
                ui.add_space(CARD_SPACING);

                if view.is_empty() {
                    ui.label(
                        RichText::new("No rows match the current filters.")
                            .size(16.0)
                            .color(Color32::GRAY),
                    );
                    return;
                }

                Self::card(ui, "👨‍🎓 Average Marks per Student", |ui| {
                    ChartPlotter::draw_bar_chart(ui, &view.charts.student_averages, CHART_HEIGHT);
                    ui.add_space(6.0);
                    ChartPlotter::draw_average_table(
                        ui,
                        "student_avg_table",
                        "Name",
                        &view.charts.student_averages,
                    );
                });

                Self::card(ui, "📚 Average Marks per Subject", |ui| {
                    ChartPlotter::draw_pie_chart(ui, &view.charts.subject_averages, CHART_HEIGHT);
                    ui.add_space(6.0);
                    ChartPlotter::draw_average_table(
                        ui,
                        "subject_avg_table",
                        "Subject",
                        &view.charts.subject_averages,
                    );
                });

                Self::card(ui, "🧠 Student-Subject Heatmap", |ui| {
                    ScrollArea::horizontal()
                        .id_salt("heatmap_scroll")
                        .show(ui, |ui| ChartPlotter::draw_heatmap(ui, &view.charts.pivot));
                });

                Self::card(ui, "📉 Distribution of Marks", |ui| {
                    ChartPlotter::draw_histogram(ui, &view.charts.histogram, CHART_HEIGHT);
                });

                Self::card(ui, "🏅 Top Performer per Subject", |ui| {
                    ChartPlotter::draw_top_performers(ui, &view.aggregates.top_performers);
                });
            });
    }

    fn draw_report_banner(ui: &mut egui::Ui, report: &ValidationReport) {
        let mut text = format!("✅ File uploaded and processed! {} rows", report.rows_kept);
        if report.rows_dropped > 0 {
            text.push_str(&format!(
                " ({} rows without numeric marks skipped)",
                report.rows_dropped
            ));
        }
        ui.label(
            RichText::new(text)
                .size(14.0)
                .color(Color32::from_rgb(40, 167, 69)),
        );
    }

    /// Average / highest / lowest marks of the view.
    fn draw_kpis(ui: &mut egui::Ui, view: &DashboardView) {
        ui.label(RichText::new("📈 Overall Performance Summary").size(18.0).strong());
        ui.add_space(6.0);

        let summary = &view.aggregates.summary;
        ui.columns(3, |cols| {
            Self::metric(&mut cols[0], "🔢 Average Marks", &summary.mean_label());
            Self::metric(&mut cols[1], "🏆 Highest Marks", &summary.max_label());
            Self::metric(&mut cols[2], "📉 Lowest Marks", &summary.min_label());
        });
    }

    fn metric(ui: &mut egui::Ui, title: &str, value: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(13.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(26.0).strong());
            });
    }

    /// Titled, bordered section.
    fn card(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                body(ui);
            });
        ui.add_space(CARD_SPACING);
    }
}
