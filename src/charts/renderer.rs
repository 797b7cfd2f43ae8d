//! Static Chart Renderer
//! Writes the dashboard charts to PNG files with plotters.
//!
//! Files produced in the target directory:
//! - `salary_by_department.png`: horizontal bars, one per department
//! - `performance_by_department.png`: horizontal bars, one per department
//! - `hires_by_year_and_department.png`: hires per year stacked by department

use crate::charts::{stack_cohorts, DepartmentPalette};
use crate::stats::{department_label, DashboardReport, DepartmentMean, HireCohort};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 700;

pub const SALARY_CHART: &str = "salary_by_department.png";
pub const PERFORMANCE_CHART: &str = "performance_by_department.png";
pub const COHORT_CHART: &str = "hires_by_year_and_department.png";

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Paths the export writes to inside `dir`, in render order.
    pub fn output_paths(dir: &Path) -> [PathBuf; 3] {
        [
            dir.join(SALARY_CHART),
            dir.join(PERFORMANCE_CHART),
            dir.join(COHORT_CHART),
        ]
    }

    /// Render every chart of the report into `dir`, creating it if needed.
    pub fn export_all(report: &DashboardReport, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create export directory {}", dir.display()))?;

        let aggregates = &report.aggregates;
        let palette = DepartmentPalette::from_aggregates(aggregates);

        let [salary, performance, cohort] = Self::output_paths(dir);
        Self::render_department_bars(
            &salary,
            "Average Salary by Department",
            "Salary",
            &aggregates.salary_by_department,
            &palette,
        )?;
        Self::render_department_bars(
            &performance,
            "Average Performance by Department",
            "Performance score",
            &aggregates.performance_by_department,
            &palette,
        )?;
        Self::render_cohort_chart(&cohort, &aggregates.hires_by_year_and_department, &palette)?;

        let written = vec![salary, performance, cohort];
        info!(dir = %dir.display(), charts = written.len(), "charts exported");
        Ok(written)
    }

    pub fn render_department_bars(
        path: &Path,
        title: &str,
        value_label: &str,
        rows: &[DepartmentMean],
        palette: &DepartmentPalette,
    ) -> Result<()> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let max = rows.iter().filter_map(|r| r.value).fold(0.0f64, f64::max);
        let x_max = if max > 0.0 { max * 1.15 } else { 1.0 };
        let labels: Vec<String> = rows
            .iter()
            .map(|r| department_label(&r.department).to_string())
            .collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..x_max, (0..rows.len().max(1) as i32).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(value_label)
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        let present: Vec<(i32, f64, RGBColor)> = rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| Some((i as i32, r.value?, to_rgb(palette.color(&r.department)))))
            .collect();

        chart.draw_series(present.iter().map(|&(i, value, color)| {
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (value, SegmentValue::Exact(i + 1)),
                ],
                color.filled(),
            );
            bar.set_margin(10, 10, 0, 0);
            bar
        }))?;

        chart.draw_series(present.iter().map(|&(i, value, _)| {
            Text::new(
                format!("{value:.2}"),
                (value, SegmentValue::CenterOf(i)),
                ("sans-serif", 18).into_font(),
            )
        }))?;

        root.present()
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    pub fn render_cohort_chart(
        path: &Path,
        cohorts: &[HireCohort],
        palette: &DepartmentPalette,
    ) -> Result<()> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut totals: BTreeMap<i32, usize> = BTreeMap::new();
        for c in cohorts {
            *totals.entry(c.year).or_default() += c.hires;
        }
        let first_year = totals.keys().next().copied().unwrap_or(0);
        let last_year = totals.keys().last().copied().unwrap_or(first_year);
        let y_max = totals.values().copied().max().unwrap_or(0).max(1) as f64 * 1.15;

        let mut chart = ChartBuilder::on(&root)
            .caption("Hires by Entry Year and Department", ("sans-serif", 30))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((first_year..last_year + 1).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Entry year")
            .y_desc("Hires")
            .draw()?;

        for (department, slices) in stack_cohorts(cohorts, palette) {
            let color = to_rgb(palette.color(department));
            let bars = slices.iter().map(|slice| {
                let year = slice.cohort.year;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(year), slice.base),
                        (SegmentValue::Exact(year + 1), slice.top()),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 15, 15);
                bar
            });

            chart
                .draw_series(bars)?
                .label(department_label(department))
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;

        root.present()
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }
}

fn to_rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{write_csv, SAMPLE_CSV};
    use crate::data::DataLoader;
    use tempfile::TempDir;

    #[test]
    fn output_paths_live_in_export_dir() {
        let dir = Path::new("/tmp/charts");
        let paths = StaticChartRenderer::output_paths(dir);
        assert_eq!(paths[0], dir.join("salary_by_department.png"));
        assert_eq!(paths[2], dir.join("hires_by_year_and_department.png"));
        assert!(paths.iter().all(|p| p.starts_with(dir)));
    }

    #[test]
    fn exports_all_three_charts() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "employees.csv", SAMPLE_CSV);
        let df = DataLoader::new().load(&path).unwrap();
        let report = DashboardReport::build(&path, &df).unwrap();

        let out = dir.path().join("charts");
        let written = StaticChartRenderer::export_all(&report, &out).unwrap();

        assert_eq!(written, StaticChartRenderer::output_paths(&out).to_vec());
        for file in &written {
            let size = fs::metadata(file).unwrap().len();
            assert!(size > 0, "{} is empty", file.display());
        }
    }

    #[test]
    fn palette_colors_convert_to_rgb() {
        let rgb = to_rgb(egui::Color32::from_rgb(52, 152, 219));
        assert_eq!((rgb.0, rgb.1, rgb.2), (52, 152, 219));
    }
}
