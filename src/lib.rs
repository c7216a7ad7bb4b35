//! Rolling-average trend analysis over tabular time series.
//!
//! Given a table, a value column and a time column, [`analyze`] sorts the
//! observations by time, attaches a trailing rolling mean and sample
//! standard deviation to every row, flags rows more than two rolling
//! deviations away from their rolling mean, and extends the series with a
//! flat 30-day forecast at the last rolling mean.
//!
//! ```
//! let csv = "Date,Revenue\n2024-01-01,10\n2024-01-02,12\n2024-01-03,100\n2024-01-04,11\n";
//! let analysis = trendcast::analyze_csv(csv, "Revenue", "Date").unwrap();
//! assert_eq!(analysis.rows.len(), 4);
//! assert_eq!(analysis.forecast.len(), 30);
//! ```

pub mod common;
pub mod forecast;
pub mod trend;

pub use common::error::{AnalysisError, Result};
pub use common::params::AnalysisParams;
pub use common::table_reader::Dataset;
pub use common::types::{ForecastRow, TimeSeries, TimeSeriesRow};
pub use trend::TrendAnalysis;

/// Analyse `value_column` over `time_column` with the default window cap,
/// horizon and threshold.
pub fn analyze(dataset: &Dataset, value_column: &str, time_column: &str) -> Result<TrendAnalysis> {
    analyze_with(dataset, &AnalysisParams::new(value_column, time_column))
}

/// Analyse a dataset with explicit parameters.
pub fn analyze_with(dataset: &Dataset, params: &AnalysisParams) -> Result<TrendAnalysis> {
    trend::analyze_dataset(dataset, params)
}

/// Parse CSV text with a header row and analyse it.
pub fn analyze_csv(text: &str, value_column: &str, time_column: &str) -> Result<TrendAnalysis> {
    let dataset = Dataset::from_csv_str(text)?;
    analyze(&dataset, value_column, time_column)
}
