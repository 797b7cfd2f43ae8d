//! Chart Plotter Module
//! Interactive bar charts for the dashboard using egui_plot.

use crate::format::{format_count, format_decimal};
use crate::stats::{department_label, DepartmentMean, GroupedAggregates, HireCohort};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};
use std::collections::{BTreeMap, BTreeSet};

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const CHART_HEIGHT: f32 = 280.0;

/// Departments in display order, shared by every chart so a department
/// keeps the same color everywhere.
#[derive(Debug, Clone, Default)]
pub struct DepartmentPalette {
    departments: Vec<Option<String>>,
}

impl DepartmentPalette {
    pub fn new<'a>(departments: impl IntoIterator<Item = &'a Option<String>>) -> Self {
        let unique: BTreeSet<Option<String>> = departments.into_iter().cloned().collect();
        Self {
            departments: unique.into_iter().collect(),
        }
    }

    /// Every department that appears in any grouped table.
    pub fn from_aggregates(aggregates: &GroupedAggregates) -> Self {
        Self::new(
            aggregates
                .salary_by_department
                .iter()
                .chain(&aggregates.performance_by_department)
                .map(|r| &r.department)
                .chain(aggregates.hires_by_year_and_department.iter().map(|c| &c.department)),
        )
    }

    pub fn color(&self, department: &Option<String>) -> Color32 {
        let idx = self
            .departments
            .iter()
            .position(|d| d == department)
            .unwrap_or(0);
        PALETTE[idx % PALETTE.len()]
    }

    pub fn departments(&self) -> &[Option<String>] {
        &self.departments
    }
}

/// One department's slice of a year's stacked bar.
#[derive(Debug, Clone)]
pub struct StackedCohort<'a> {
    pub cohort: &'a HireCohort,
    pub base: f64,
}

impl StackedCohort<'_> {
    pub fn top(&self) -> f64 {
        self.base + self.cohort.hires as f64
    }
}

/// Cohorts grouped per department in palette order, each slice resting on
/// the running total of its own year.
pub fn stack_cohorts<'a>(
    cohorts: &'a [HireCohort],
    palette: &DepartmentPalette,
) -> Vec<(&'a Option<String>, Vec<StackedCohort<'a>>)> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    let mut stacked = Vec::new();
    for department in palette.departments() {
        let slices: Vec<StackedCohort<'a>> = cohorts
            .iter()
            .filter(|c| &c.department == department)
            .map(|cohort| {
                let total = totals.entry(cohort.year).or_default();
                let slice = StackedCohort {
                    cohort,
                    base: *total,
                };
                *total += cohort.hires as f64;
                slice
            })
            .collect();
        if let Some(first) = slices.first() {
            let cohort: &'a HireCohort = first.cohort;
            stacked.push((&cohort.department, slices));
        }
    }
    stacked
}

/// Creates the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bars, one per department, labelled on the y axis.
    pub fn draw_department_bars(
        ui: &mut egui::Ui,
        id: &str,
        value_label: &str,
        rows: &[DepartmentMean],
        palette: &DepartmentPalette,
    ) {
        let labels: Vec<String> = rows
            .iter()
            .map(|r| department_label(&r.department).to_string())
            .collect();

        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let value = row.value?;
                Some(
                    Bar::new(i as f64, value)
                        .name(format!(
                            "{}: {}",
                            department_label(&row.department),
                            format_decimal(Some(value))
                        ))
                        .fill(palette.color(&row.department))
                        .width(0.6),
                )
            })
            .collect();

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label(value_label.to_string())
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().name(value_label));
            });
    }

    /// Hires per entry year, stacked by department.
    pub fn draw_cohort_chart(
        ui: &mut egui::Ui,
        id: &str,
        cohorts: &[HireCohort],
        palette: &DepartmentPalette,
    ) {
        let charts: Vec<BarChart> = stack_cohorts(cohorts, palette)
            .into_iter()
            .map(|(department, slices)| {
                let bars: Vec<Bar> = slices
                    .iter()
                    .map(|slice| {
                        let c = slice.cohort;
                        Bar::new(c.year as f64, c.hires as f64)
                            .base_offset(slice.base)
                            .name(format!(
                                "{} {}: {}",
                                c.year,
                                department_label(&c.department),
                                format_count(c.hires)
                            ))
                            .width(0.7)
                    })
                    .collect();
                BarChart::new(bars)
                    .color(palette.color(department))
                    .name(department_label(department))
            })
            .collect();

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_drag(false)
            .legend(Legend::default())
            .x_axis_label("Entry year")
            .y_axis_label("Hires")
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract().abs() < 1e-6 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }
}
