//! KPI Panel Widget
//! Four metric tiles across the top of the dashboard.

use crate::format::{format_count, format_currency, format_decimal};
use crate::stats::KpiSummary;
use egui::{Color32, RichText};

pub struct KpiPanel;

impl KpiPanel {
    pub fn show(ui: &mut egui::Ui, kpis: &KpiSummary, currency: &str) {
        ui.label(RichText::new("🔎 Key Indicators").size(18.0).strong());
        ui.add_space(8.0);

        ui.columns(4, |cols| {
            Self::tile(
                &mut cols[0],
                "👨‍💼 Total Employees",
                format_count(kpis.distinct_employees),
            );
            Self::tile(
                &mut cols[1],
                "🏆 Average Performance",
                format_decimal(kpis.mean_performance),
            );
            Self::tile(
                &mut cols[2],
                "⏳ Training Hours",
                format_decimal(kpis.mean_training_hours),
            );
            Self::tile(
                &mut cols[3],
                "💰 Average Salary",
                format_currency(kpis.mean_salary, currency),
            );
        });
    }

    fn tile(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(13.0).color(Color32::GRAY));
                ui.add_space(4.0);
                ui.label(RichText::new(value).size(26.0).strong());
            });
    }
}
