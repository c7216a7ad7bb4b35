use chrono::{Days, NaiveDateTime};

use crate::common::error::{AnalysisError, Result};
use crate::common::types::ForecastRow;

/// Extend a series with a flat forecast.
///
/// Generates `horizon` points, one per calendar day starting the day after
/// `last_timestamp` (time of day preserved), each carrying `value`.
pub fn forecast_flat(
    last_timestamp: NaiveDateTime,
    value: Option<f64>,
    horizon: usize,
) -> Result<Vec<ForecastRow>> {
    (1..=horizon as u64)
        .map(|i| {
            let timestamp = last_timestamp
                .checked_add_days(Days::new(i))
                .ok_or_else(|| {
                    AnalysisError::Computation(format!(
                        "forecast date {} day(s) after {} is out of range",
                        i, last_timestamp
                    ))
                })?;
            Ok(ForecastRow {
                timestamp,
                forecast_value: value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_flat_forecast_shape() {
        let rows = forecast_flat(at(2024, 1, 4), Some(55.5), 30).unwrap();
        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0].timestamp, at(2024, 1, 5));
        assert_eq!(rows[29].timestamp, at(2024, 2, 3));
        assert!(rows.iter().all(|r| r.forecast_value == Some(55.5)));
        for pair in rows.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, chrono::Duration::days(1));
        }
    }

    #[test]
    fn test_flat_forecast_crosses_leap_day() {
        let rows = forecast_flat(at(2024, 2, 27), Some(1.0), 3).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.timestamp).collect();
        assert_eq!(dates, vec![at(2024, 2, 28), at(2024, 2, 29), at(2024, 3, 1)]);
    }

    #[test]
    fn test_flat_forecast_keeps_time_of_day() {
        let last = NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let rows = forecast_flat(last, None, 2).unwrap();
        assert_eq!(rows[0].timestamp.time(), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(rows[0].timestamp.date(), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert!(rows.iter().all(|r| r.forecast_value.is_none()));
    }

    #[test]
    fn test_flat_forecast_out_of_range() {
        let last = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap();
        let err = forecast_flat(last, Some(1.0), 1).unwrap_err();
        assert!(matches!(err, AnalysisError::Computation(_)));
    }
}
