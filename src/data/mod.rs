//! Data module - CSV loading, schema checks and date derivation

mod loader;
mod processor;
pub mod schema;

pub use loader::{column_names, DataLoader, SharedLoader};

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Three employees across two departments and two hiring years.
    pub const SAMPLE_CSV: &str = "\
Employee_ID;Department;Performance_Score;Training_Hours;Salary;Date_of_Joining
1;Eng;8;10;5000;2020-01-15
2;Eng;6;5;7000;2021-03-01
3;Sales;9;20;6000;2020-06-01
";

    pub fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}
