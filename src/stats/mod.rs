//! Statistics module - KPI and group-by calculations

mod calculator;
mod report;

pub use calculator::{department_label, DepartmentMean, GroupedAggregates, HireCohort, KpiSummary};
pub use report::DashboardReport;
