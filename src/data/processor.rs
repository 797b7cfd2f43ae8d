//! Data Processor Module
//! Header cleanup and date derivation applied right after a CSV read.

use super::schema::{DATE_OF_JOINING, ENTRY_YEAR};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, warn};

/// Date-only layouts tried in order. Month-first wins over day-first when
/// both are valid, so `03/01/2021` is March 1st.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Outcome of parsing the joining-date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateParseReport {
    pub parsed: usize,
    pub empty: usize,
    pub unparseable: usize,
}

/// Handles cleanup and derivation steps on a freshly loaded table.
pub struct DataProcessor;

impl DataProcessor {
    /// Strip leading/trailing whitespace from every column name.
    pub fn trim_column_names(df: &mut DataFrame) -> PolarsResult<()> {
        let trimmed: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.trim().to_string())
            .collect();
        df.set_column_names(trimmed)
    }

    /// Parse a single date value. Returns `None` for anything unrecognised.
    pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
        let value = raw.trim().trim_matches('"');
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.date_naive());
        }

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    /// Replace `Date_of_Joining` with a typed date column and append
    /// `Entry_Year`. Values that fail to parse become null in both.
    pub fn derive_joining_dates(df: &mut DataFrame) -> PolarsResult<DateParseReport> {
        let raw = df.column(DATE_OF_JOINING)?.cast(&DataType::String)?;
        let raw_ca = raw.str()?;

        let mut report = DateParseReport::default();
        let mut days: Vec<Option<i32>> = Vec::with_capacity(raw_ca.len());
        let mut years: Vec<Option<i32>> = Vec::with_capacity(raw_ca.len());

        for value in raw_ca.into_iter() {
            let parsed = match value {
                Some(v) if !v.trim().is_empty() => {
                    let parsed = Self::parse_flexible_date(v);
                    if parsed.is_none() {
                        report.unparseable += 1;
                        debug!(value = v, "unparseable joining date");
                    }
                    parsed
                }
                _ => {
                    report.empty += 1;
                    None
                }
            };

            if parsed.is_some() {
                report.parsed += 1;
            }
            days.push(parsed.map(days_since_epoch));
            years.push(parsed.map(|d| d.year()));
        }

        let dates = Column::new(DATE_OF_JOINING.into(), days).cast(&DataType::Date)?;
        df.with_column(dates)?;
        df.with_column(Column::new(ENTRY_YEAR.into(), years))?;

        if report.unparseable > 0 {
            warn!(
                count = report.unparseable,
                "{} joining dates could not be parsed and were left empty", report.unparseable
            );
        }

        Ok(report)
    }
}

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn parses_common_layouts() {
        assert_eq!(DataProcessor::parse_flexible_date("2020-01-15"), ymd(2020, 1, 15));
        assert_eq!(DataProcessor::parse_flexible_date("2020/01/15"), ymd(2020, 1, 15));
        assert_eq!(DataProcessor::parse_flexible_date(" 2021-03-01 "), ymd(2021, 3, 1));
        assert_eq!(DataProcessor::parse_flexible_date("03/01/2021"), ymd(2021, 3, 1));
        assert_eq!(DataProcessor::parse_flexible_date("25/12/2019"), ymd(2019, 12, 25));
        assert_eq!(DataProcessor::parse_flexible_date("25.12.2019"), ymd(2019, 12, 25));
        assert_eq!(DataProcessor::parse_flexible_date("March 5, 2018"), ymd(2018, 3, 5));
        assert_eq!(
            DataProcessor::parse_flexible_date("2022-07-04 09:30:00"),
            ymd(2022, 7, 4)
        );
        assert_eq!(
            DataProcessor::parse_flexible_date("2022-07-04T09:30:00+02:00"),
            ymd(2022, 7, 4)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(DataProcessor::parse_flexible_date(""), None);
        assert_eq!(DataProcessor::parse_flexible_date("not a date"), None);
        assert_eq!(DataProcessor::parse_flexible_date("2020-13-45"), None);
    }

    #[test]
    fn trims_header_whitespace() {
        let mut df = df!(
            " Employee_ID" => [1i64],
            "Salary  " => [10.0],
        )
        .unwrap();

        DataProcessor::trim_column_names(&mut df).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Employee_ID", "Salary"]);
    }

    #[test]
    fn derives_year_and_nulls_bad_dates() {
        let mut df = df!(
            DATE_OF_JOINING => [Some("2020-01-15"), Some("yesterday"), None, Some("2021-03-01")],
        )
        .unwrap();

        let report = DataProcessor::derive_joining_dates(&mut df).unwrap();
        assert_eq!(
            report,
            DateParseReport {
                parsed: 2,
                empty: 1,
                unparseable: 1
            }
        );

        assert_eq!(df.column(DATE_OF_JOINING).unwrap().dtype(), &DataType::Date);
        let years: Vec<Option<i32>> = df
            .column(ENTRY_YEAR)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2020), None, None, Some(2021)]);
        assert_eq!(df.column(DATE_OF_JOINING).unwrap().null_count(), 2);
    }
}
