//! Column names expected in the employee export.

use polars::prelude::*;
use thiserror::Error;

pub const EMPLOYEE_ID: &str = "Employee_ID";
pub const DEPARTMENT: &str = "Department";
pub const PERFORMANCE_SCORE: &str = "Performance_Score";
pub const TRAINING_HOURS: &str = "Training_Hours";
pub const SALARY: &str = "Salary";
pub const DATE_OF_JOINING: &str = "Date_of_Joining";

/// Derived from `Date_of_Joining`, not present in the source file.
pub const ENTRY_YEAR: &str = "Entry_Year";

/// Columns every loaded table must carry after header trimming.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    EMPLOYEE_ID,
    DEPARTMENT,
    PERFORMANCE_SCORE,
    TRAINING_HOURS,
    SALARY,
    DATE_OF_JOINING,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
}

/// Check that every required column is present.
pub fn require_columns(df: &DataFrame) -> Result<(), SchemaError> {
    let present = df.get_column_names();
    for name in REQUIRED_COLUMNS {
        if !present.iter().any(|c| c.as_str() == name) {
            return Err(SchemaError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_missing_column() {
        let df = df!(
            EMPLOYEE_ID => [1i64],
            DEPARTMENT => ["Eng"],
            PERFORMANCE_SCORE => [8.0],
            TRAINING_HOURS => [10.0],
            DATE_OF_JOINING => ["2020-01-15"],
        )
        .unwrap();

        assert_eq!(
            require_columns(&df),
            Err(SchemaError::MissingColumn(SALARY.to_string()))
        );
    }

    #[test]
    fn accepts_extra_columns() {
        let df = df!(
            EMPLOYEE_ID => [1i64],
            DEPARTMENT => ["Eng"],
            PERFORMANCE_SCORE => [8.0],
            TRAINING_HOURS => [10.0],
            SALARY => [5000.0],
            DATE_OF_JOINING => ["2020-01-15"],
            "Location" => ["Lisbon"],
        )
        .unwrap();

        assert!(require_columns(&df).is_ok());
    }
}
