use chrono::NaiveDate;
use thiserror::Error;

use super::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::navis::tools::model::{CreatedDate, DateDescriptor};

/// Earliest year accepted as a real comment date. Older values are
/// placeholders written by the exporter.
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;
const DATE_FORMAT: &str = "%Y/%m/%d";

/// Why a date descriptor could not be converted. Never leaves this module
/// except as diagnostic text.
#[derive(Debug, Error, PartialEq, Eq)]
enum DateError {
    #[error("{field} is not an integer: '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{year}-{month}-{day} is not a valid calendar date")]
    OutOfRange { year: i32, month: i32, day: i32 },
}

/// Normalises a comment's `createddate` into `YYYY/MM/DD`.
///
/// Returns `None` when there is no date, when it is a placeholder (year
/// before 1900, zero month or day), or when it cannot be converted. Only the
/// last case is reported to `sink`, together with the raw element text.
pub fn normalize_created_date(
    created: Option<&CreatedDate>,
    sink: &mut dyn DiagnosticSink,
) -> Option<String> {
    let created = created?;
    let descriptor = created.date.as_ref()?;

    match convert(descriptor) {
        Ok(date) => date.map(|date| date.format(DATE_FORMAT).to_string()),
        Err(error) => {
            sink.record(&DiagnosticEvent::DateRejected {
                reason: error.to_string(),
                raw: created.raw.clone(),
            });
            None
        }
    }
}

fn convert(descriptor: &DateDescriptor) -> Result<Option<NaiveDate>, DateError> {
    let year = field_value("year", descriptor.year.as_deref())?;
    let month = field_value("month", descriptor.month.as_deref())?;
    let day = field_value("day", descriptor.day.as_deref())?;

    if year < MIN_YEAR || month == 0 || day == 0 {
        return Ok(None);
    }

    let out_of_range = || DateError::OutOfRange { year, month, day };
    if year > MAX_YEAR {
        return Err(out_of_range());
    }
    let month_number = u32::try_from(month).map_err(|_| out_of_range())?;
    let day_number = u32::try_from(day).map_err(|_| out_of_range())?;

    NaiveDate::from_ymd_opt(year, month_number, day_number)
        .map(Some)
        .ok_or_else(out_of_range)
}

fn field_value(field: &'static str, raw: Option<&str>) -> Result<i32, DateError> {
    match raw {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map_err(|_| DateError::NotAnInteger {
                field,
                value: value.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navis::tools::flatten::diagnostics::DiagnosticLog;

    fn created(descriptor: DateDescriptor) -> CreatedDate {
        CreatedDate {
            date: Some(descriptor),
            raw: "<createddate>...</createddate>".to_string(),
        }
    }

    fn normalize(created: Option<&CreatedDate>) -> (Option<String>, DiagnosticLog) {
        let mut log = DiagnosticLog::new();
        let value = normalize_created_date(created, &mut log);
        (value, log)
    }

    #[test]
    fn formats_valid_date_with_zero_padding() {
        let date = created(DateDescriptor::new(2024, 3, 5));
        let (value, log) = normalize(Some(&date));
        assert_eq!(value.as_deref(), Some("2024/03/05"));
        assert!(log.is_empty());
    }

    #[test]
    fn placeholder_dates_are_silently_absent() {
        for descriptor in [
            DateDescriptor::new(1899, 12, 31),
            DateDescriptor::new(2024, 0, 5),
            DateDescriptor::new(2024, 3, 0),
            DateDescriptor::default(),
        ] {
            let date = created(descriptor);
            let (value, log) = normalize(Some(&date));
            assert_eq!(value, None);
            assert!(log.is_empty());
        }
    }

    #[test]
    fn missing_element_or_descriptor_is_absent() {
        let (value, log) = normalize(None);
        assert_eq!(value, None);
        assert!(log.is_empty());

        let empty = CreatedDate {
            date: None,
            raw: "<createddate/>".to_string(),
        };
        let (value, log) = normalize(Some(&empty));
        assert_eq!(value, None);
        assert!(log.is_empty());
    }

    #[test]
    fn impossible_date_is_reported_with_raw_text() {
        let date = created(DateDescriptor::new(2023, 2, 30));
        let (value, log) = normalize(Some(&date));
        assert_eq!(value, None);
        assert_eq!(log.len(), 1);
        let entry = &log.entries()[0];
        assert!(entry.contains("2023-2-30 is not a valid calendar date"));
        assert!(entry.ends_with("raw=<createddate>...</createddate>"));
    }

    #[test]
    fn non_numeric_field_is_reported() {
        let date = created(DateDescriptor::new(2024, "March", 5));
        let (value, log) = normalize(Some(&date));
        assert_eq!(value, None);
        assert!(log.entries()[0].contains("month is not an integer: 'March'"));
    }

    #[test]
    fn negative_month_is_out_of_range() {
        assert_eq!(
            convert(&DateDescriptor::new(2024, -1, 5)),
            Err(DateError::OutOfRange {
                year: 2024,
                month: -1,
                day: 5
            })
        );
    }

    #[test]
    fn year_beyond_four_digits_is_rejected() {
        assert!(convert(&DateDescriptor::new(10000, 1, 1)).is_err());
    }
}
