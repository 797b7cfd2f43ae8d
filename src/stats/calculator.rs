//! Statistics Calculator Module
//! KPI scalars and department/cohort group-by aggregates over an employee table.

use crate::data::schema::{
    self, SchemaError, DEPARTMENT, EMPLOYEE_ID, ENTRY_YEAR, PERFORMANCE_SCORE, SALARY,
    TRAINING_HOURS,
};
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The four headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub distinct_employees: usize,
    pub mean_performance: Option<f64>,
    pub mean_training_hours: Option<f64>,
    pub mean_salary: Option<f64>,
}

/// Mean of one metric within a department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMean {
    /// `None` groups rows with an empty or missing department.
    pub department: Option<String>,
    /// Rounded to 2 decimals. `None` when no row in the group has a value.
    pub value: Option<f64>,
    /// Rows contributing to `value`.
    pub count: usize,
}

/// Number of hires for one (year, department) cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HireCohort {
    pub year: i32,
    pub department: Option<String>,
    pub hires: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregates {
    pub salary_by_department: Vec<DepartmentMean>,
    pub performance_by_department: Vec<DepartmentMean>,
    pub hires_by_year_and_department: Vec<HireCohort>,
}

/// Label used wherever a missing department has to be displayed.
pub const MISSING_DEPARTMENT_LABEL: &str = "(no department)";

pub fn department_label(department: &Option<String>) -> &str {
    department.as_deref().unwrap_or(MISSING_DEPARTMENT_LABEL)
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Handles KPI and group-by calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the KPI summary and all grouped tables.
    ///
    /// The three grouped tables are independent and computed in parallel.
    pub fn aggregate(df: &DataFrame) -> Result<(KpiSummary, GroupedAggregates), StatsError> {
        schema::require_columns(df)?;
        let kpis = Self::compute_kpis(df)?;

        let ((salary, performance), cohorts) = rayon::join(
            || {
                rayon::join(
                    || Self::salary_by_department(df),
                    || Self::performance_by_department(df),
                )
            },
            || Self::hires_by_year_and_department(df),
        );

        let aggregates = GroupedAggregates {
            salary_by_department: salary?,
            performance_by_department: performance?,
            hires_by_year_and_department: cohorts?,
        };

        debug!(
            departments = aggregates.salary_by_department.len(),
            cohorts = aggregates.hires_by_year_and_department.len(),
            "aggregates computed"
        );
        Ok((kpis, aggregates))
    }

    pub fn compute_kpis(df: &DataFrame) -> Result<KpiSummary, StatsError> {
        Ok(KpiSummary {
            distinct_employees: Self::distinct_employee_count(df)?,
            mean_performance: Self::column_mean(df, PERFORMANCE_SCORE)?,
            mean_training_hours: Self::column_mean(df, TRAINING_HOURS)?,
            mean_salary: Self::column_mean(df, SALARY)?,
        })
    }

    /// Number of distinct, non-missing employee ids.
    pub fn distinct_employee_count(df: &DataFrame) -> Result<usize, StatsError> {
        let ids = Self::require(df, EMPLOYEE_ID)?;
        let present = ids.as_materialized_series().drop_nulls();
        Ok(present.n_unique()?)
    }

    /// Arithmetic mean over present values of a numeric column.
    pub fn column_mean(df: &DataFrame, column: &str) -> Result<Option<f64>, StatsError> {
        let values = Self::numeric_values(df, column)?;
        Ok(Self::mean(values.into_iter().flatten()))
    }

    pub fn salary_by_department(df: &DataFrame) -> Result<Vec<DepartmentMean>, StatsError> {
        Self::mean_by_department(df, SALARY)
    }

    pub fn performance_by_department(df: &DataFrame) -> Result<Vec<DepartmentMean>, StatsError> {
        Self::mean_by_department(df, PERFORMANCE_SCORE)
    }

    /// Group by department and average `value_col`, rounded to 2 decimals.
    pub fn mean_by_department(
        df: &DataFrame,
        value_col: &str,
    ) -> Result<Vec<DepartmentMean>, StatsError> {
        let departments = Self::departments(df)?;
        let values = Self::numeric_values(df, value_col)?;

        let mut groups: BTreeMap<Option<String>, Vec<f64>> = BTreeMap::new();
        for (department, value) in departments.into_iter().zip(values) {
            let bucket = groups.entry(department).or_default();
            if let Some(v) = value {
                bucket.push(v);
            }
        }

        Ok(groups
            .into_iter()
            .map(|(department, values)| DepartmentMean {
                department,
                count: values.len(),
                value: Self::mean(values.iter().copied()).map(round2),
            })
            .collect())
    }

    /// Count rows per (entry year, department). Rows without an entry year
    /// are left out.
    pub fn hires_by_year_and_department(df: &DataFrame) -> Result<Vec<HireCohort>, StatsError> {
        let departments = Self::departments(df)?;
        let years_col = Self::require(df, ENTRY_YEAR)?.cast(&DataType::Int32)?;
        let years = years_col.i32()?;

        let mut counts: BTreeMap<(i32, Option<String>), usize> = BTreeMap::new();
        let mut skipped = 0usize;
        for (year, department) in years.into_iter().zip(departments) {
            match year {
                Some(year) => *counts.entry((year, department)).or_default() += 1,
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(rows = skipped, "rows without entry year left out of cohorts");
        }

        Ok(counts
            .into_iter()
            .map(|((year, department), hires)| HireCohort {
                year,
                department,
                hires,
            })
            .collect())
    }

    /// Department per row; empty strings count as missing.
    fn departments(df: &DataFrame) -> Result<Vec<Option<String>>, StatsError> {
        let column = Self::require(df, DEPARTMENT)?.cast(&DataType::String)?;
        let ca = column.str()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|s| !s.trim().is_empty()).map(str::to_string))
            .collect())
    }

    /// Values of a column cast to f64; nulls and NaN become `None`.
    fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, StatsError> {
        let values = Self::require(df, column)?.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
        let values: Vec<f64> = values.collect();
        if values.is_empty() {
            None
        } else {
            Some(values.mean())
        }
    }

    fn require<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Column, StatsError> {
        df.column(column)
            .map_err(|_| SchemaError::MissingColumn(column.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{write_csv, SAMPLE_CSV};
    use crate::data::DataLoader;
    use tempfile::TempDir;

    fn load(contents: &str) -> DataFrame {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "employees.csv", contents);
        DataLoader::new().load(&path).unwrap()
    }

    fn dept(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn three_employee_scenario() {
        let df = load(SAMPLE_CSV);
        let (kpis, aggregates) = StatsCalculator::aggregate(&df).unwrap();

        assert_eq!(kpis.distinct_employees, 3);
        assert_eq!(kpis.mean_salary, Some(6000.0));
        assert!((kpis.mean_training_hours.unwrap() - 35.0 / 3.0).abs() < 1e-9);
        assert!((kpis.mean_performance.unwrap() - 23.0 / 3.0).abs() < 1e-9);

        assert_eq!(
            aggregates.salary_by_department,
            vec![
                DepartmentMean {
                    department: dept("Eng"),
                    value: Some(6000.0),
                    count: 2
                },
                DepartmentMean {
                    department: dept("Sales"),
                    value: Some(6000.0),
                    count: 1
                },
            ]
        );

        assert_eq!(
            aggregates.hires_by_year_and_department,
            vec![
                HireCohort {
                    year: 2020,
                    department: dept("Eng"),
                    hires: 1
                },
                HireCohort {
                    year: 2020,
                    department: dept("Sales"),
                    hires: 1
                },
                HireCohort {
                    year: 2021,
                    department: dept("Eng"),
                    hires: 1
                },
            ]
        );
    }

    #[test]
    fn duplicate_ids_count_once() {
        let df = load(
            "Employee_ID;Department;Performance_Score;Training_Hours;Salary;Date_of_Joining\n\
             7;Eng;8;10;5000;2020-01-15\n\
             7;Eng;6;5;7000;2021-03-01\n\
             8;Ops;9;20;6000;2020-06-01\n\
             ;Ops;9;20;6000;2020-06-01\n",
        );
        assert_eq!(StatsCalculator::distinct_employee_count(&df).unwrap(), 2);
    }

    #[test]
    fn missing_values_are_excluded_from_means() {
        let df = load(
            "Employee_ID;Department;Performance_Score;Training_Hours;Salary;Date_of_Joining\n\
             1;Eng;8;10;5000;2020-01-15\n\
             2;Eng;;5;;2021-03-01\n\
             3;Eng;6;;7000;2020-06-01\n",
        );
        let kpis = StatsCalculator::compute_kpis(&df).unwrap();
        assert_eq!(kpis.mean_performance, Some(7.0));
        assert_eq!(kpis.mean_training_hours, Some(7.5));
        assert_eq!(kpis.mean_salary, Some(6000.0));

        let salary = StatsCalculator::salary_by_department(&df).unwrap();
        assert_eq!(salary.len(), 1);
        assert_eq!(salary[0].count, 2);
    }

    #[test]
    fn grouped_means_are_rounded_and_consistent_with_global_mean() {
        let df = load(
            "Employee_ID;Department;Performance_Score;Training_Hours;Salary;Date_of_Joining\n\
             1;Eng;7.111;10;5000.333;2020-01-15\n\
             2;Eng;6.5;5;7000.1;2021-03-01\n\
             3;Eng;8.25;5;4100.777;2021-03-01\n\
             4;Sales;9;20;6000.55;2020-06-01\n\
             5;Sales;3.333;20;3999.999;2019-06-01\n\
             6;HR;5.555;1;4321.987;2018-02-01\n",
        );
        let (kpis, aggregates) = StatsCalculator::aggregate(&df).unwrap();

        for row in aggregates
            .salary_by_department
            .iter()
            .chain(&aggregates.performance_by_department)
        {
            let v = row.value.unwrap();
            assert!((v * 100.0 - (v * 100.0).round()).abs() < 1e-6, "{v} not rounded");
        }

        let total: usize = aggregates.salary_by_department.iter().map(|r| r.count).sum();
        let weighted: f64 = aggregates
            .salary_by_department
            .iter()
            .map(|r| r.value.unwrap() * r.count as f64)
            .sum::<f64>()
            / total as f64;
        assert!((weighted - kpis.mean_salary.unwrap()).abs() < 0.01);
    }

    #[test]
    fn unparseable_date_is_dropped_from_cohorts_only() {
        let df = load(
            "Employee_ID;Department;Performance_Score;Training_Hours;Salary;Date_of_Joining\n\
             1;Eng;8;10;5000;2020-01-15\n\
             2;Eng;6;5;7000;not-a-date\n",
        );
        let (_, aggregates) = StatsCalculator::aggregate(&df).unwrap();

        assert_eq!(aggregates.salary_by_department[0].count, 2);
        assert_eq!(aggregates.salary_by_department[0].value, Some(6000.0));
        assert_eq!(
            aggregates.hires_by_year_and_department,
            vec![HireCohort {
                year: 2020,
                department: dept("Eng"),
                hires: 1
            }]
        );
    }

    #[test]
    fn empty_department_forms_its_own_group() {
        let df = load(
            "Employee_ID;Department;Performance_Score;Training_Hours;Salary;Date_of_Joining\n\
             1;Eng;8;10;5000;2020-01-15\n\
             2;;6;5;7000;2021-03-01\n",
        );
        let performance = StatsCalculator::performance_by_department(&df).unwrap();

        assert_eq!(performance.len(), 2);
        assert!(performance
            .iter()
            .any(|r| r.department.is_none() && r.value == Some(6.0)));
        assert_eq!(department_label(&None), MISSING_DEPARTMENT_LABEL);
    }

    #[test]
    fn frame_without_salary_is_rejected() {
        let df = df!(
            EMPLOYEE_ID => [1i64],
            DEPARTMENT => ["Eng"],
            PERFORMANCE_SCORE => [8.0],
            TRAINING_HOURS => [10.0],
            "Date_of_Joining" => ["2020-01-15"],
        )
        .unwrap();

        let err = StatsCalculator::aggregate(&df).unwrap_err();
        assert!(matches!(
            err,
            StatsError::Schema(SchemaError::MissingColumn(ref c)) if c == SALARY
        ));
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(6000.0), 6000.0);
        assert_eq!(round2(7.6666), 7.67);
        assert_eq!(round2(-1.005_1), -1.01);
    }
}
