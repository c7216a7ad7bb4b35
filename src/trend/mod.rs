pub mod rolling;

use log::{debug, warn};
use serde::Serialize;

use crate::common::error::{AnalysisError, Result};
use crate::common::params::AnalysisParams;
use crate::common::table_reader::{read_time_series, Dataset};
use crate::common::types::{ForecastRow, TimeSeries, TimeSeriesRow};
use crate::forecast::forecast_flat;
use rolling::{flag_anomalies, rolling_mean, rolling_std, window_size};

/// Output of a trend analysis: the observed rows augmented with rolling
/// statistics, and a flat forecast past the last observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    /// Rolling window used, in rows. Zero when the input had fewer than two
    /// rows.
    pub window: usize,
    pub rows: Vec<TimeSeriesRow>,
    pub forecast: Vec<ForecastRow>,
}

impl TrendAnalysis {
    /// Rows flagged as anomalies, in time order.
    pub fn anomalies(&self) -> impl Iterator<Item = &TimeSeriesRow> {
        self.rows.iter().filter(|r| r.anomaly)
    }

    pub fn anomaly_count(&self) -> usize {
        self.anomalies().count()
    }

    /// Observed rows as a JSON array of records.
    pub fn rows_to_json(&self) -> Result<String> {
        to_json(&self.rows)
    }

    /// Forecast rows as a JSON array of records.
    pub fn forecast_to_json(&self) -> Result<String> {
        to_json(&self.forecast)
    }
}

/// Analyse a named value column over a named time column.
pub fn analyze_dataset(dataset: &Dataset, params: &AnalysisParams) -> Result<TrendAnalysis> {
    params.validate()?;
    let series = read_time_series(dataset, &params.time_col, &params.value_col)?;
    analyze_series(&series, params)
}

/// Compute rolling statistics, anomaly flags and the flat forecast for a
/// series sorted by timestamp. `params` must already be validated.
pub(crate) fn analyze_series(series: &TimeSeries, params: &AnalysisParams) -> Result<TrendAnalysis> {
    if series.timestamps.windows(2).any(|w| w[0] > w[1]) {
        return Err(AnalysisError::Computation(
            "time series is not sorted by timestamp".to_string(),
        ));
    }
    let last_timestamp = series.last_timestamp().ok_or(AnalysisError::EmptyDataset)?;

    let window = window_size(series.len(), params.max_window);
    if window < 2 {
        warn!(
            "rolling window degenerated to {} for {} point(s); rolling deviation is undefined",
            window,
            series.len()
        );
    }

    let means = rolling_mean(&series.values, window);
    let stds = rolling_std(&series.values, window);
    let flags = flag_anomalies(&series.values, &means, &stds, params.sigma);

    let rows: Vec<TimeSeriesRow> = series
        .timestamps
        .iter()
        .zip(&series.values)
        .zip(means.iter().zip(&stds))
        .zip(flags)
        .map(|(((timestamp, value), (mean, std)), anomaly)| TimeSeriesRow {
            timestamp: *timestamp,
            value: *value,
            rolling_mean: *mean,
            rolling_std: *std,
            anomaly,
        })
        .collect();

    let flat_value = means.last().copied().flatten();
    let forecast = forecast_flat(last_timestamp, flat_value, params.horizon)?;

    let analysis = TrendAnalysis {
        window,
        rows,
        forecast,
    };

    debug!(
        "analysed {} point(s) with window {}: {} anomal(y/ies), forecast {:?} for {} day(s)",
        analysis.rows.len(),
        window,
        analysis.anomaly_count(),
        flat_value,
        params.horizon
    );

    Ok(analysis)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AnalysisError::Computation(e.to_string()))
}
