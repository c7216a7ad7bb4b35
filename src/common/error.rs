//! Error types for trend analysis.

use thiserror::Error;

/// Errors returned while reading a dataset or analysing a time series.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing column(s): {}", .columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    #[error("Cannot parse '{value}' in column '{column}' as a date/time")]
    Parse { column: String, value: String },

    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Computation error: {0}")]
    Computation(String),
}

impl AnalysisError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for trend analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_display() {
        let error = AnalysisError::MissingColumn {
            columns: vec!["Revenu".to_string()],
        };
        assert_eq!(error.to_string(), "Missing column(s): Revenu");
    }

    #[test]
    fn test_missing_column_lists_all() {
        let error = AnalysisError::MissingColumn {
            columns: vec!["Revenu".to_string(), "Dat".to_string()],
        };
        assert_eq!(error.to_string(), "Missing column(s): Revenu, Dat");
    }

    #[test]
    fn test_parse_display_names_value() {
        let error = AnalysisError::Parse {
            column: "Date".to_string(),
            value: "yesterday".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot parse 'yesterday' in column 'Date' as a date/time"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = AnalysisError::invalid_parameter("sigma", "must be positive");
        assert_eq!(error.to_string(), "Invalid parameter: sigma - must be positive");
    }

    #[test]
    fn test_computation_display() {
        let error = AnalysisError::Computation("bad number".to_string());
        assert_eq!(error.to_string(), "Computation error: bad number");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalysisError>();
    }
}
