use chrono::NaiveDateTime;
use serde::Serialize;

/// Upper bound on the rolling window, in rows.
pub const DEFAULT_MAX_WINDOW: usize = 30;

/// Number of daily points in a forecast.
pub const DEFAULT_HORIZON: usize = 30;

/// Deviation from the rolling mean, in rolling standard deviations, above
/// which an observation is flagged.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// A single time series of (timestamp, value) pairs, sorted by timestamp.
///
/// A `None` value is a missing observation (an empty cell in the source).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Returns the number of data points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series has no data points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the last timestamp, or None if empty.
    ///
    /// The series is sorted, so this is also the maximum timestamp.
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }
}

/// One observation augmented with its rolling statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
    /// None until `window` observations have accumulated.
    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub anomaly: bool,
}

/// One future point of a flat forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub timestamp: NaiveDateTime,
    pub forecast_value: Option<f64>,
}
