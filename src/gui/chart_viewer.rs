//! Chart Viewer Widget
//! Grouped-aggregate sections: a formatted grid on the left, its chart on
//! the right.

use crate::charts::ChartPlotter;
use crate::format::{format_count, format_currency, format_decimal};
use crate::gui::app::LoadedDashboard;
use crate::stats::{department_label, DepartmentMean, HireCohort};
use egui::RichText;

const GRID_SPACING: [f32; 2] = [24.0, 4.0];

pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, dashboard: &LoadedDashboard, currency: &str) {
        let aggregates = &dashboard.report.aggregates;
        let palette = &dashboard.palette;

        Self::section_header(ui, "💵 Average Salary by Department");
        ui.columns(2, |cols| {
            Self::department_grid(
                &mut cols[0],
                "salary_grid",
                "Salary",
                &aggregates.salary_by_department,
                |v| format_currency(v, currency),
            );
            ChartPlotter::draw_department_bars(
                &mut cols[1],
                "salary_chart",
                "Salary",
                &aggregates.salary_by_department,
                palette,
            );
        });

        ui.add_space(20.0);
        Self::section_header(ui, "🏢 Average Performance by Department");
        ui.columns(2, |cols| {
            Self::department_grid(
                &mut cols[0],
                "performance_grid",
                "Performance",
                &aggregates.performance_by_department,
                format_decimal,
            );
            ChartPlotter::draw_department_bars(
                &mut cols[1],
                "performance_chart",
                "Performance score",
                &aggregates.performance_by_department,
                palette,
            );
        });

        ui.add_space(20.0);
        Self::section_header(ui, "📅 Cohorts: Hires by Year and Department");
        ui.columns(2, |cols| {
            Self::cohort_grid(&mut cols[0], &aggregates.hires_by_year_and_department);
            ChartPlotter::draw_cohort_chart(
                &mut cols[1],
                "cohort_chart",
                &aggregates.hires_by_year_and_department,
                palette,
            );
        });
    }

    fn section_header(ui: &mut egui::Ui, title: &str) {
        ui.separator();
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(8.0);
    }

    fn department_grid(
        ui: &mut egui::Ui,
        id: &str,
        value_header: &str,
        rows: &[DepartmentMean],
        format_value: impl Fn(Option<f64>) -> String,
    ) {
        egui::Grid::new(id)
            .striped(true)
            .spacing(GRID_SPACING)
            .show(ui, |ui| {
                ui.label(RichText::new("Department").strong());
                ui.label(RichText::new(value_header).strong());
                ui.end_row();

                for row in rows {
                    ui.label(department_label(&row.department));
                    ui.label(format_value(row.value));
                    ui.end_row();
                }
            });
    }

    fn cohort_grid(ui: &mut egui::Ui, cohorts: &[HireCohort]) {
        egui::Grid::new("cohort_grid")
            .striped(true)
            .spacing(GRID_SPACING)
            .show(ui, |ui| {
                ui.label(RichText::new("Entry Year").strong());
                ui.label(RichText::new("Department").strong());
                ui.label(RichText::new("Hires").strong());
                ui.end_row();

                for cohort in cohorts {
                    ui.label(cohort.year.to_string());
                    ui.label(department_label(&cohort.department));
                    ui.label(format_count(cohort.hires));
                    ui.end_row();
                }
            });
    }
}
