//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{stack_cohorts, ChartPlotter, DepartmentPalette};
pub use renderer::StaticChartRenderer;
