use statrs::statistics::Statistics;

/// Rolling window length for a series of `len` points.
///
/// Half the series, capped at `max_window`. Zero for series shorter than two
/// points, in which case no rolling statistic is defined.
pub fn window_size(len: usize, max_window: usize) -> usize {
    max_window.min(len / 2)
}

/// Trailing rolling mean over `window` points ending at each index.
///
/// The first `window - 1` entries are `None`, as is any window containing a
/// missing value. A zero window yields all `None`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| Some(w.mean()))
}

/// Trailing rolling sample standard deviation (n - 1 denominator).
///
/// Same `None` rules as [`rolling_mean`]; additionally a one-point window
/// has no sample deviation.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| {
        let std = w.std_dev();
        if std.is_nan() {
            None
        } else {
            Some(std)
        }
    })
}

/// Flag points deviating from their rolling mean by more than `sigma`
/// rolling standard deviations.
///
/// The comparison is strict. A point with no value, no rolling statistics,
/// or a zero deviation is never flagged.
pub fn flag_anomalies(
    values: &[Option<f64>],
    means: &[Option<f64>],
    stds: &[Option<f64>],
    sigma: f64,
) -> Vec<bool> {
    values
        .iter()
        .zip(means)
        .zip(stds)
        .map(|((value, mean), std)| match (value, mean, std) {
            (Some(v), Some(m), Some(s)) if *s > 0.0 => (v - m).abs() > sigma * s,
            _ => false,
        })
        .collect()
}

fn rolling_apply<F>(values: &[Option<f64>], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }

    let mut buf: Vec<f64> = Vec::with_capacity(window);
    for end in window..=values.len() {
        buf.clear();
        buf.extend(values[end - window..end].iter().map_while(|v| *v));
        if buf.len() == window {
            out[end - 1] = stat(&buf);
        }
    }
    out
}
