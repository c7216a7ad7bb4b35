use std::env;
use std::str::FromStr;

use super::error::{AnalysisError, Result};
use super::types::{DEFAULT_HORIZON, DEFAULT_MAX_WINDOW, DEFAULT_SIGMA};

/// Environment variable overriding [`AnalysisParams::max_window`].
pub const ENV_MAX_WINDOW: &str = "TRENDCAST_MAX_WINDOW";
/// Environment variable overriding [`AnalysisParams::horizon`].
pub const ENV_HORIZON: &str = "TRENDCAST_HORIZON";
/// Environment variable overriding [`AnalysisParams::sigma`].
pub const ENV_SIGMA: &str = "TRENDCAST_SIGMA";

/// Parameters for a trend analysis.
///
/// Column names are not checked here. An empty or unknown name is reported
/// as a missing column when the dataset is read.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub value_col: String,
    pub time_col: String,
    /// Upper bound on the rolling window. The window actually used is
    /// `min(max_window, rows / 2)`.
    pub max_window: usize,
    /// Number of daily forecast points.
    pub horizon: usize,
    /// Anomaly threshold in rolling standard deviations.
    pub sigma: f64,
}

impl AnalysisParams {
    /// Parameters with the default window cap, horizon and threshold.
    pub fn new(value_col: impl Into<String>, time_col: impl Into<String>) -> Self {
        AnalysisParams {
            value_col: value_col.into(),
            time_col: time_col.into(),
            max_window: DEFAULT_MAX_WINDOW,
            horizon: DEFAULT_HORIZON,
            sigma: DEFAULT_SIGMA,
        }
    }

    pub fn max_window(mut self, max_window: usize) -> Self {
        self.max_window = max_window;
        self
    }

    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Overlay values from `TRENDCAST_MAX_WINDOW`, `TRENDCAST_HORIZON` and
    /// `TRENDCAST_SIGMA`. Unset variables leave the current value alone.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_WINDOW) {
            self.max_window = parse_override(ENV_MAX_WINDOW, &raw)?;
        }
        if let Some(raw) = lookup(ENV_HORIZON) {
            self.horizon = parse_override(ENV_HORIZON, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SIGMA) {
            self.sigma = parse_override(ENV_SIGMA, &raw)?;
        }
        Ok(self)
    }

    /// Check the numeric knobs.
    pub fn validate(&self) -> Result<()> {
        if self.max_window == 0 {
            return Err(AnalysisError::invalid_parameter(
                "max_window",
                "must be a positive integer",
            ));
        }
        if self.horizon == 0 {
            return Err(AnalysisError::invalid_parameter(
                "horizon",
                "must be a positive integer",
            ));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(AnalysisError::invalid_parameter(
                "sigma",
                format!("must be a positive number, got {}", self.sigma),
            ));
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AnalysisError::invalid_parameter(name, format!("'{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let params = AnalysisParams::new("Revenue", "Date");
        assert_eq!(params.value_col, "Revenue");
        assert_eq!(params.time_col, "Date");
        assert_eq!(params.max_window, 30);
        assert_eq!(params.horizon, 30);
        assert_eq!(params.sigma, 2.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_setters() {
        let params = AnalysisParams::new("v", "t").max_window(7).horizon(14).sigma(3.0);
        assert_eq!(params.max_window, 7);
        assert_eq!(params.horizon, 14);
        assert_eq!(params.sigma, 3.0);
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let err = AnalysisParams::new("v", "t").max_window(0).validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { ref name, .. } if name == "max_window"));
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let err = AnalysisParams::new("v", "t").horizon(0).validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { ref name, .. } if name == "horizon"));
    }

    #[test]
    fn test_validate_rejects_bad_sigma() {
        for sigma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = AnalysisParams::new("v", "t").sigma(sigma).validate().unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidParameter { ref name, .. } if name == "sigma"));
        }
    }

    #[test]
    fn test_empty_column_names_pass_validation() {
        // Reported later as a missing column, not as a parameter error.
        assert!(AnalysisParams::new("", "").validate().is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let params = AnalysisParams::new("v", "t")
            .with_overrides(lookup_from(&[
                (ENV_MAX_WINDOW, "10"),
                (ENV_HORIZON, " 7 "),
                (ENV_SIGMA, "2.5"),
            ]))
            .unwrap();
        assert_eq!(params.max_window, 10);
        assert_eq!(params.horizon, 7);
        assert_eq!(params.sigma, 2.5);
    }

    #[test]
    fn test_overrides_absent_keep_values() {
        let params = AnalysisParams::new("v", "t")
            .horizon(5)
            .with_overrides(lookup_from(&[]))
            .unwrap();
        assert_eq!(params.horizon, 5);
        assert_eq!(params.max_window, 30);
    }

    #[test]
    fn test_overrides_reject_garbage() {
        let err = AnalysisParams::new("v", "t")
            .with_overrides(lookup_from(&[(ENV_HORIZON, "thirty")]))
            .unwrap_err();
        match err {
            AnalysisError::InvalidParameter { name, reason } => {
                assert_eq!(name, ENV_HORIZON);
                assert!(reason.contains("thirty"), "reason: {}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
