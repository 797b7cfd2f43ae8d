//! Employee Dashboard Main Application
//! Toolbar on top, dashboard sections in a scrollable central panel.

use crate::charts::{DepartmentPalette, StaticChartRenderer};
use crate::data::SharedLoader;
use crate::gui::{ChartViewer, KpiPanel, TableView};
use crate::stats::DashboardReport;
use egui::{Color32, RichText, TopBottomPanel};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{debug, error, info};

/// Everything one successful load pass produces.
pub struct LoadedDashboard {
    pub report: DashboardReport,
    pub table: TableView,
    pub palette: DepartmentPalette,
}

impl LoadedDashboard {
    /// Load and aggregate `source`. Runs on a background thread.
    fn build(loader: &SharedLoader, source: &Path, force_reload: bool) -> Result<Self, String> {
        let df = {
            let mut loader = loader.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if force_reload && loader.invalidate(source) {
                debug!(source = %source.display(), "cache entry dropped for reload");
            }
            let df = loader.load(source).map_err(|e| e.to_string())?;
            debug!(
                cached = loader.is_cached(source),
                reads = loader.read_count(),
                "employee table ready"
            );
            df
        };

        let report = DashboardReport::build(source, &df).map_err(|e| e.to_string())?;
        let palette = DepartmentPalette::from_aggregates(&report.aggregates);
        let table = TableView::new(&df);

        Ok(Self {
            report,
            table,
            palette,
        })
    }
}

/// Background load result
enum LoadResult {
    Complete(Box<LoadedDashboard>),
    Error(String),
}

enum DashboardState {
    Loading,
    Ready(Box<LoadedDashboard>),
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    loader: SharedLoader,
    source: PathBuf,
    currency: String,
    state: DashboardState,
    status: String,
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        loader: SharedLoader,
        source: PathBuf,
        currency: String,
    ) -> Self {
        let mut app = Self {
            loader,
            source,
            currency,
            state: DashboardState::Loading,
            status: String::new(),
            load_rx: None,
        };
        app.start_loading(false);
        app
    }

    fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    /// Load the current source on a background thread.
    fn start_loading(&mut self, force_reload: bool) {
        if self.is_loading() {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.state = DashboardState::Loading;
        self.status = format!("Loading {}...", self.source.display());

        let loader = self.loader.clone();
        let source = self.source.clone();
        thread::spawn(move || {
            let result = match LoadedDashboard::build(&loader, &source, force_reload) {
                Ok(dashboard) => LoadResult::Complete(Box::new(dashboard)),
                Err(e) => LoadResult::Error(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(dashboard)) => {
                self.status = format!(
                    "Loaded {} rows, {} columns",
                    dashboard.report.rows,
                    dashboard.report.columns.len()
                );
                info!(source = %self.source.display(), "dashboard ready");
                self.state = DashboardState::Ready(dashboard);
            }
            Ok(LoadResult::Error(message)) => {
                error!(source = %self.source.display(), %message, "dashboard load failed");
                self.status = "Load failed".to_string();
                self.state = DashboardState::Failed(message);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                error!(source = %self.source.display(), "loader thread stopped without a result");
                self.status = "Load failed".to_string();
                self.state = DashboardState::Failed("Loader thread stopped unexpectedly".into());
            }
        }
    }

    fn handle_open_csv(&mut self) {
        if self.is_loading() {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.source = path;
            self.start_loading(false);
        }
    }

    /// Render PNG charts into a user-picked folder, then open it.
    fn handle_export_charts(&mut self) {
        let DashboardState::Ready(dashboard) = &self.state else {
            self.status = "Nothing to export".to_string();
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match StaticChartRenderer::export_all(&dashboard.report, &dir) {
            Ok(paths) => {
                self.status = format!("Exported {} charts to {}", paths.len(), dir.display());
                if let Err(e) = open::that(&dir) {
                    error!(error = %e, "cannot open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.status = format!("Export error: {e:#}");
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("📊 Employee Performance Dashboard")
                    .size(20.0)
                    .strong()
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.separator();

            let file_name = self
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.source.display().to_string());
            ui.label(RichText::new(file_name).size(12.0));

            let idle = !self.is_loading();
            if ui.add_enabled(idle, egui::Button::new("📂 Open CSV")).clicked() {
                self.handle_open_csv();
            }
            if ui.add_enabled(idle, egui::Button::new("🔄 Reload")).clicked() {
                self.start_loading(true);
            }
            let ready = matches!(self.state, DashboardState::Ready(_));
            if ui
                .add_enabled(ready && idle, egui::Button::new("🖼 Export charts"))
                .clicked()
            {
                self.handle_export_charts();
            }

            ui.separator();
            let status_color = match self.state {
                DashboardState::Failed(_) => Color32::from_rgb(220, 53, 69),
                _ => Color32::GRAY,
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });
        ui.add_space(6.0);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading() {
            ctx.request_repaint();
        }

        TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));

        egui::CentralPanel::default().show(ctx, |ui| match &self.state {
            DashboardState::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            DashboardState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {message}"))
                            .size(18.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
            DashboardState::Ready(dashboard) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        KpiPanel::show(ui, &dashboard.report.kpis, &self.currency);
                        ui.add_space(20.0);
                        ChartViewer::show(ui, dashboard, &self.currency);
                        ui.add_space(20.0);
                        dashboard.table.show(ui);
                    });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    fn waiting_app(rx: Receiver<LoadResult>) -> DashboardApp {
        DashboardApp {
            loader: DataLoader::shared(),
            source: PathBuf::from("employees.csv"),
            currency: "R$".to_string(),
            state: DashboardState::Loading,
            status: "Loading employees.csv...".to_string(),
            load_rx: Some(rx),
        }
    }

    #[test]
    fn vanished_loader_marks_load_failed() {
        let (tx, rx) = channel::<LoadResult>();
        drop(tx);
        let mut app = waiting_app(rx);

        app.check_load_results();

        assert!(!app.is_loading());
        assert!(matches!(app.state, DashboardState::Failed(_)));
        assert_eq!(app.status, "Load failed");
    }

    #[test]
    fn load_error_replaces_dashboard() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Error("Required column 'Salary' is missing".into()))
            .unwrap();
        let mut app = waiting_app(rx);

        app.check_load_results();

        match &app.state {
            DashboardState::Failed(message) => assert!(message.contains("Salary")),
            _ => panic!("expected a failed state"),
        }
        assert_eq!(app.status, "Load failed");
    }
}
