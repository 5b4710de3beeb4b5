//! Control Panel Widget
//! Left side panel with the file picker, filters and export buttons.

use egui::{Color32, ComboBox, RichText};
use marks_dashboard::data::{Selection, ViewFilter};
use marks_dashboard::export::ExportKind;
use std::path::PathBuf;

/// Left side control panel with file selection, filters and exports.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub students: Vec<String>,
    pub subjects: Vec<String>,
    pub filter: ViewFilter,
    pub status: String,
    pub exports_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            students: Vec::new(),
            subjects: Vec::new(),
            filter: ViewFilter::default(),
            status: "Ready".to_string(),
            exports_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update filter choices after a successful upload.
    pub fn update_choices(&mut self, students: Vec<String>, subjects: Vec<String>) {
        self.filter.retain_known(&students, &subjects);
        self.students = students;
        self.subjects = subjects;
        self.exports_enabled = true;
    }

    /// Forget the previous upload (failed validation halts everything).
    pub fn reset(&mut self) {
        self.students.clear();
        self.subjects.clear();
        self.filter = ViewFilter::default();
        self.exports_enabled = false;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Student Marks Analyzer")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Upload CSV (Name, Subject, Marks)").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔍 Filter Data").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;

        ui.add_enabled_ui(self.exports_enabled, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Select Student:"));
                if Self::selection_combo(
                    ui,
                    "student_filter",
                    combo_width,
                    &self.students,
                    &mut self.filter.student,
                ) {
                    action = ControlPanelAction::FilterChanged;
                }
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Select Subject:"));
                if Self::selection_combo(
                    ui,
                    "subject_filter",
                    combo_width,
                    &self.subjects,
                    &mut self.filter.subject,
                ) {
                    action = ControlPanelAction::FilterChanged;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.label(RichText::new("📤 Export Data").size(14.0).strong());
        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.exports_enabled, |ui| {
                for kind in ExportKind::ALL {
                    let button =
                        egui::Button::new(RichText::new(format!("📥 {} (CSV)", kind.label())))
                            .min_size(egui::vec2(260.0, 28.0));
                    if ui.add(button).clicked() {
                        action = ControlPanelAction::ExportCsv(kind);
                    }
                    ui.add_space(4.0);
                }

                ui.add_space(8.0);
                let bundle = egui::Button::new(RichText::new("🗜 Export Report Bundle").size(15.0))
                    .min_size(egui::vec2(260.0, 34.0));
                if ui.add(bundle).clicked() {
                    action = ControlPanelAction::ExportBundle;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.starts_with("Error") || self.status.starts_with('❌') {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with('✅') {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// "All" plus one entry per value. Returns true when the choice changed.
    fn selection_combo(
        ui: &mut egui::Ui,
        id: &str,
        width: f32,
        values: &[String],
        current: &mut Selection,
    ) -> bool {
        let mut changed = false;
        ComboBox::from_id_salt(id)
            .width(width)
            .selected_text(current.to_string())
            .show_ui(ui, |ui| {
                for choice in Selection::choices(values) {
                    let selected = *current == choice;
                    if ui.selectable_label(selected, choice.to_string()).clicked() && !selected {
                        *current = choice;
                        changed = true;
                    }
                }
            });
        changed
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FilterChanged,
    ExportCsv(ExportKind),
    ExportBundle,
}
