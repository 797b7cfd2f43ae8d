//! Serializable bundle of everything the dashboard shows.

use super::calculator::{GroupedAggregates, KpiSummary, StatsCalculator, StatsError};
use crate::data::column_names;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub source: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
    pub kpis: KpiSummary,
    pub aggregates: GroupedAggregates,
}

impl DashboardReport {
    /// Aggregate a loaded table. Fails as a whole; no partial report.
    pub fn build(source: &Path, df: &DataFrame) -> Result<Self, StatsError> {
        let (kpis, aggregates) = StatsCalculator::aggregate(df)?;
        Ok(Self {
            source: source.to_path_buf(),
            rows: df.height(),
            columns: column_names(df),
            kpis,
            aggregates,
        })
    }
}
