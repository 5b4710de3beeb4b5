//! Student Marks Analyzer Main Application
//! Main window with control panel and dashboard view.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use anyhow::{bail, Context};
use egui::SidePanel;
use marks_dashboard::data::DataLoader;
use marks_dashboard::export::{ExportKind, ReportBundle, BUNDLE_FILE_NAME};
use marks_dashboard::{Dashboard, DashboardConfig};
use std::path::{Path, PathBuf};

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    dashboard: Option<Dashboard>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            config,
            loader: DataLoader::new(),
            dashboard: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Handle CSV file selection. Loading and validation run inline.
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.control_panel.csv_path = Some(path.clone());
        if let Err(e) = self.load_dashboard(&path) {
            log::error!("Upload of {} rejected: {:#}", path.display(), e);
            self.dashboard = None;
            self.loader.clear();
            self.chart_viewer.clear();
            self.control_panel.reset();
            self.control_panel.set_status(&format!("Error: {:#}", e));
        }
    }

    fn load_dashboard(&mut self, path: &Path) -> anyhow::Result<()> {
        let raw = self
            .loader
            .load_csv(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let dashboard = Dashboard::from_frame(raw)?;

        log::debug!(
            "Columns in upload: {:?} ({} raw rows)",
            self.loader.get_columns(),
            self.loader.get_row_count()
        );

        self.control_panel.update_choices(
            dashboard.students().to_vec(),
            dashboard.subjects().to_vec(),
        );
        self.dashboard = Some(dashboard);
        self.recompute()
    }

    /// Rebuild the view for the current filter selection.
    fn recompute(&mut self) -> anyhow::Result<()> {
        let Some(dashboard) = &self.dashboard else {
            bail!("No data loaded");
        };

        let view = dashboard.view(&self.control_panel.filter, self.config.histogram_bins)?;
        let report = dashboard.report();

        let mut status = format!(
            "✅ {} of {} rows shown",
            view.records.len(),
            report.rows_kept
        );
        if report.rows_dropped > 0 {
            status.push_str(&format!(", {} skipped", report.rows_dropped));
        }
        self.control_panel.set_status(&status);
        self.chart_viewer.set_view(view, report);
        Ok(())
    }

    fn handle_filter_changed(&mut self) {
        if let Err(e) = self.recompute() {
            log::error!("Failed to rebuild view: {:#}", e);
            self.control_panel.set_status(&format!("Error: {:#}", e));
        }
    }

    /// Save one CSV artifact of the current view.
    fn handle_export_csv(&mut self, kind: ExportKind) {
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(kind.file_name())
            .save_file()
        else {
            return;
        };

        match self.export_csv(kind, &output_path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("✅ Saved {}", output_path.display())),
            Err(e) => {
                log::error!("{} export failed: {:#}", kind.label(), e);
                self.control_panel
                    .set_status(&format!("❌ Export failed: {:#}", e));
            }
        }
    }

    fn export_csv(&self, kind: ExportKind, output_path: &Path) -> anyhow::Result<()> {
        let Some(view) = self.chart_viewer.view() else {
            bail!("No data loaded");
        };
        let bytes = view.export_csv(kind, self.config.pivot_decimals)?;
        std::fs::write(output_path, bytes)
            .with_context(|| format!("could not write {}", output_path.display()))?;
        log::info!("Exported {} to {}", kind.label(), output_path.display());
        Ok(())
    }

    /// Write every CSV plus the chart images into one ZIP.
    fn handle_export_bundle(&mut self) {
        let output_path = match &self.config.export_dir {
            Some(dir) => dir.join(BUNDLE_FILE_NAME),
            None => match rfd::FileDialog::new()
                .add_filter("ZIP Archive", &["zip"])
                .set_file_name(BUNDLE_FILE_NAME)
                .save_file()
            {
                Some(path) => path,
                None => return,
            },
        };

        self.control_panel.set_status("Rendering charts...");
        match self.export_bundle(&output_path) {
            Ok(count) => {
                self.control_panel.set_status(&format!(
                    "✅ Report bundle exported: {} files",
                    count
                ));
                if self.config.open_after_export {
                    Self::reveal(&output_path);
                }
            }
            Err(e) => {
                log::error!("Bundle export failed: {:#}", e);
                self.control_panel
                    .set_status(&format!("❌ Bundle error: {:#}", e));
            }
        }
    }

    fn export_bundle(&self, output_path: &Path) -> anyhow::Result<usize> {
        let Some(view) = self.chart_viewer.view() else {
            bail!("No data loaded");
        };
        if let Some(dir) = output_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("could not create {}", dir.display()))?;
        }

        let entries = view.bundle_entries(&self.config)?;
        ReportBundle::write(output_path, &entries)?;
        Ok(entries.len())
    }

    /// Open the folder holding `path` in the system file browser.
    fn reveal(path: &Path) {
        let folder = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if let Err(e) = open::that(&folder) {
            log::warn!("Could not open {}: {}", folder.display(), e);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FilterChanged => self.handle_filter_changed(),
                        ControlPanelAction::ExportCsv(kind) => self.handle_export_csv(kind),
                        ControlPanelAction::ExportBundle => self.handle_export_bundle(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
