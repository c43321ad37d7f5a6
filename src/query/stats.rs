use serde::Serialize;

/// Fixed-shape descriptive statistics for one column over a range.
///
/// Everything but `count` is computed over the non-missing values only and
/// is `null` when there are none. `std` is the sample standard deviation
/// (n − 1 denominator), so it is additionally `null` for a single value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics over the non-missing values of one column slice.
pub fn summarize(values: &[f64]) -> StatSummary {
    let count = values.len();
    if count == 0 {
        return StatSummary {
            count: 0,
            mean: None,
            std: None,
            min: None,
            p25: None,
            p50: None,
            p75: None,
            max: None,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = sample_std(values, mean);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    StatSummary {
        count,
        mean: Some(mean),
        std,
        min: Some(min),
        p25: quantile_sorted(&sorted, 0.25),
        p50: quantile_sorted(&sorted, 0.50),
        p75: quantile_sorted(&sorted, 0.75),
        max: Some(max),
    }
}

/// Sample standard deviation with Bessel's n − 1 correction; `None` below
/// two observations.
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let sum_sq = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

/// Linear-interpolation quantile (R-7, the pandas/NumPy default) over
/// pre-sorted data: `h = (n-1)p`, interpolate between `x[⌊h⌋]` and the next.
fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted[n - 1])
    } else {
        Some(sorted[j] + g * (sorted[j + 1] - sorted[j]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_summary_matches_pandas_describe() {
        // pandas: Series([2,4,4,4,5,5,7,9]).describe()
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.count, 8);
        assert_close(summary.mean, 5.0);
        assert_close(summary.std, 2.138089935299395);
        assert_close(summary.min, 2.0);
        assert_close(summary.p25, 4.0);
        assert_close(summary.p50, 4.5);
        assert_close(summary.p75, 5.5);
        assert_close(summary.max, 9.0);
    }

    #[test]
    fn test_quantiles_interpolate_linearly() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert_close(summary.p25, 1.75);
        assert_close(summary.p50, 2.5);
        assert_close(summary.p75, 3.25);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let summary = summarize(&[42.0]);
        assert_eq!(summary.count, 1);
        assert_close(summary.mean, 42.0);
        assert_eq!(summary.std, None);
        assert_close(summary.min, 42.0);
        assert_close(summary.p25, 42.0);
        assert_close(summary.p50, 42.0);
        assert_close(summary.p75, 42.0);
        assert_close(summary.max, 42.0);
    }

    #[test]
    fn test_empty_slice_is_count_zero_not_error() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.std, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.p50, None);
        assert_eq!(summary.max, None);
    }

    #[test]
    fn test_null_fields_serialize_as_json_null() {
        let json = serde_json::to_value(summarize(&[])).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["mean"].is_null());
        assert!(json["p75"].is_null());
    }

    #[test]
    fn test_unordered_input_is_sorted_internally() {
        let summary = summarize(&[9.0, 1.0, 5.0, 3.0, 7.0]);
        assert_close(summary.min, 1.0);
        assert_close(summary.p50, 5.0);
        assert_close(summary.max, 9.0);
    }
}
