use std::io;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::debug;

use super::error::{AnalysisError, Result};
use super::types::TimeSeries;

/// Cells treated as a missing observation in a numeric column.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Date-time layouts tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the time of day is midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// An in-memory table of text cells keyed by column name.
///
/// Cells are stored column by column and parsed only when a column is read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl Dataset {
    /// Parse comma-separated text with a header row.
    ///
    /// Headers and fields are trimmed. Short rows are padded with empty
    /// cells and surplus fields are dropped. Repeated header names get a
    /// `.1`, `.2`, ... suffix. Text without a header line gives an empty
    /// dataset with no columns.
    ///
    /// Quoting is lenient: an unterminated quote runs to the end of the
    /// input and a stray quote is kept with the field, so such cells fail
    /// later when the column is parsed.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes())
    }

    /// Parse CSV from any byte source, with the same rules as
    /// [`Dataset::from_csv_str`].
    ///
    /// Read failures and cells that are not valid UTF-8 are reported as
    /// [`AnalysisError::Csv`].
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let names = unique_names(rdr.headers()?.iter());
        let mut columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        let mut row_count = 0;

        for result in rdr.records() {
            let record = result?;
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or("").to_string());
            }
            row_count += 1;
        }

        debug!(
            "parsed CSV input: {} column(s), {} row(s)",
            names.len(),
            row_count
        );

        Ok(Dataset {
            names,
            columns,
            row_count,
        })
    }

    /// Build a dataset from named columns of equal length.
    pub fn from_columns<N, C>(columns: Vec<(N, Vec<C>)>) -> Result<Self>
    where
        N: Into<String>,
        C: Into<String>,
    {
        let mut names = Vec::with_capacity(columns.len());
        let mut cells = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name.into());
            cells.push(values.into_iter().map(Into::into).collect::<Vec<String>>());
        }

        let row_count = cells.first().map_or(0, Vec::len);
        if let Some(pos) = cells.iter().position(|c| c.len() != row_count) {
            return Err(AnalysisError::Computation(format!(
                "column '{}' has {} cells, expected {}",
                names[pos],
                cells[pos].len(),
                row_count
            )));
        }

        Ok(Dataset {
            names: unique_names(names.iter().map(String::as_str)),
            columns: cells,
            row_count,
        })
    }

    /// Column names in input order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of data rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The cells of a named column.
    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.position(name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| AnalysisError::MissingColumn {
                columns: vec![name.to_string()],
            })
    }

    /// Fail with a single `MissingColumn` error listing every absent name.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            if !self.has_column(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::MissingColumn { columns: missing })
        }
    }

    /// Multiply every numeric cell of a column by `factor`.
    ///
    /// `factor` must lie in `[0.5, 1.5]`. Missing cells are left as they are.
    /// On error the dataset is unchanged.
    pub fn scale_column(&mut self, name: &str, factor: f64) -> Result<()> {
        if !factor.is_finite() || !(0.5..=1.5).contains(&factor) {
            return Err(AnalysisError::invalid_parameter(
                "factor",
                format!("must be between 0.5 and 1.5, got {}", factor),
            ));
        }

        let pos = self.position(name).ok_or_else(|| AnalysisError::MissingColumn {
            columns: vec![name.to_string()],
        })?;

        let parsed = self.columns[pos]
            .iter()
            .map(|cell| parse_value(name, cell))
            .collect::<Result<Vec<_>>>()?;

        for (cell, value) in self.columns[pos].iter_mut().zip(parsed) {
            if let Some(v) = value {
                *cell = (v * factor).to_string();
            }
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.names.iter().position(|n| n == name)
    }
}

/// Read a time series from two columns of a dataset.
///
/// The result is sorted by timestamp; rows with equal timestamps keep their
/// input order.
pub fn read_time_series(dataset: &Dataset, time_col: &str, value_col: &str) -> Result<TimeSeries> {
    dataset.require_columns(&[value_col, time_col])?;

    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let raw_times = dataset.column(time_col)?;
    let raw_values = dataset.column(value_col)?;

    let timestamps = raw_times
        .iter()
        .map(|cell| {
            parse_timestamp(cell).ok_or_else(|| AnalysisError::Parse {
                column: time_col.to_string(),
                value: cell.clone(),
            })
        })
        .collect::<Result<Vec<NaiveDateTime>>>()?;

    let values = raw_values
        .iter()
        .map(|cell| parse_value(value_col, cell))
        .collect::<Result<Vec<Option<f64>>>>()?;

    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by_key(|&i| timestamps[i]);

    let series = TimeSeries {
        timestamps: order.iter().map(|&i| timestamps[i]).collect(),
        values: order.iter().map(|&i| values[i]).collect(),
    };

    debug!(
        "read time series '{}' over '{}': {} point(s), {} missing",
        value_col,
        time_col,
        series.len(),
        series.values.iter().filter(|v| v.is_none()).count()
    );

    Ok(series)
}

/// Parse a date or date-time cell.
///
/// Offsets are converted to UTC and dropped.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .or_else(|| parse_compact_date(raw))
                .or_else(|| parse_year_month(raw))
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `YYYYMMDD`.
fn parse_compact_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = raw[..4].parse().ok()?;
    let month = raw[4..6].parse().ok()?;
    let day = raw[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYY-MM`, read as the first day of the month.
fn parse_year_month(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || !(1..=2).contains(&month.len()) {
        return None;
    }
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Parse a numeric cell. NA markers and NaN become `None`.
fn parse_value(column: &str, cell: &str) -> Result<Option<f64>> {
    if NA_VALUES.contains(&cell) {
        return Ok(None);
    }
    let value = cell.parse::<f64>().map_err(|e| {
        AnalysisError::Computation(format!(
            "cannot parse '{}' in column '{}' as a number: {}",
            cell, column, e
        ))
    })?;
    Ok(if value.is_nan() { None } else { Some(value) })
}

/// Make column names unique with the `name.1`, `name.2` convention.
fn unique_names<'a, I>(names: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut result: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while result.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        result.push(candidate);
    }
    result
}
