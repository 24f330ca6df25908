//! Window statistics over row values. Gaps (`None`) are skipped inside a
//! window and counted against `min_periods`, never treated as zero.

/// Mean and sample standard deviation (n - 1). `None` with fewer than two values.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let variance: f64 = values
        .iter()
        .map(|value| {
            let diff = mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;

    Some((mean, variance.sqrt()))
}

/// Replaces a zero (or non-finite) standard deviation with `epsilon`.
pub fn guard_std(std: f64, epsilon: f64) -> f64 {
    if std == 0.0 || !std.is_finite() {
        epsilon
    } else {
        std
    }
}

/// Division with a zero denominator replaced by `epsilon`.
pub fn safe_div(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
    if denominator == 0.0 {
        numerator / epsilon
    } else {
        numerator / denominator
    }
}

pub fn clip(value: f64, bound: f64) -> f64 {
    value.max(-bound).min(bound)
}

/// Standardizes every present value against the mean/std of all present values.
pub fn standardize(values: &[Option<f64>], epsilon: f64) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    match mean_std(&present) {
        Some((mean, std)) => {
            let std = guard_std(std, epsilon);
            values.iter().map(|v| v.map(|x| (x - mean) / std)).collect()
        }
        None => vec![None; values.len()],
    }
}

fn rolling<F>(values: &[Option<f64>], window: usize, min_periods: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            if present.len() < min_periods.max(1) {
                None
            } else {
                reduce(&present)
            }
        })
        .collect()
}

pub fn rolling_mean(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| Some(w.iter().sum::<f64>() / w.len() as f64))
}

/// Rolling sample standard deviation; undefined until two values are present.
pub fn rolling_std(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| mean_std(w).map(|(_, std)| std))
}

pub fn rolling_sum(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| Some(w.iter().sum()))
}

/// `(v - rolling_mean) / rolling_std` with a full window required.
pub fn rolling_zscore(values: &[Option<f64>], window: usize, epsilon: f64) -> Vec<Option<f64>> {
    let means = rolling_mean(values, window, window);
    let stds = rolling_std(values, window, window);

    values
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(v, (m, s))| match (v, m, s) {
            (Some(v), Some(m), Some(s)) => Some((v - m) / guard_std(*s, epsilon)),
            _ => None,
        })
        .collect()
}

/// Percentage change against the row `periods` positions back, times 100.
///
/// Offsets are positional: a missing month shifts the comparison.
pub fn pct_change(values: &[Option<f64>], periods: usize, epsilon: f64) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if periods == 0 || i < periods {
                return None;
            }
            match (values[i], values[i - periods]) {
                (Some(now), Some(base)) => Some(safe_div(now - base, base, epsilon) * 100.0),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    #[test]
    fn test_mean_std() {
        // Mean = 20, StdDev = 10
        let (mean, std) = mean_std(&[10.0, 20.0, 30.0]).unwrap();
        assert!((mean - 20.0).abs() < 1e-9);
        assert!((std - 10.0).abs() < 1e-9);
        assert!(mean_std(&[1.0]).is_none());
    }

    #[test]
    fn test_zero_std_uses_epsilon() {
        let z = standardize(&[Some(5.0), Some(5.0), None], 1e-6);
        assert_eq!(z, vec![Some(0.0), Some(0.0), None]);
        assert_eq!(guard_std(0.0, 1e-6), 1e-6);
        assert_eq!(safe_div(1.0, 0.0, 1e-6), 1e6);
    }

    #[test]
    fn test_clip_bounds_outliers() {
        assert_eq!(clip(50.0, 3.0), 3.0);
        assert_eq!(clip(-50.0, 3.0), -3.0);
        assert_eq!(clip(1.2, 3.0), 1.2);
    }

    #[test]
    fn test_standardize_skips_gaps() {
        let z = standardize(&[Some(10.0), None, Some(20.0), Some(30.0)], 1e-6);
        assert_eq!(z[1], None);
        assert!((z[0].unwrap() + 1.0).abs() < 1e-9);
        assert!((z[3].unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_min_periods() {
        let values = some(&[1.0, 2.0, 3.0, 4.0]);
        let mean = rolling_mean(&values, 3, 3);
        assert_eq!(mean[..2], [None, None]);
        assert_eq!(mean[2], Some(2.0));
        assert_eq!(mean[3], Some(3.0));

        let expanding = rolling_mean(&values, 3, 1);
        assert_eq!(expanding[0], Some(1.0));

        // Sample std needs two values even with min_periods = 1
        let std = rolling_std(&values, 3, 1);
        assert_eq!(std[0], None);
        assert!((std[1].unwrap() - 0.5f64.sqrt()).abs() < 1e-9);

        let sum = rolling_sum(&values, 2, 2);
        assert_eq!(sum, vec![None, Some(3.0), Some(5.0), Some(7.0)]);
    }

    #[test]
    fn test_rolling_window_skips_gaps() {
        let values = vec![Some(1.0), None, Some(3.0)];
        assert_eq!(rolling_mean(&values, 3, 3)[2], None);
        assert_eq!(rolling_mean(&values, 3, 2)[2], Some(2.0));
    }

    #[test]
    fn test_rolling_zscore_requires_full_window() {
        let values = some(&[10.0, 20.0, 30.0]);
        let z = rolling_zscore(&values, 3, 1e-6);
        assert_eq!(z[..2], [None, None]);
        assert!((z[2].unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_change() {
        let values = vec![Some(100.0), Some(110.0), None, Some(121.0)];
        let pct = pct_change(&values, 1, 1e-6);
        assert_eq!(pct[0], None);
        assert!((pct[1].unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(pct[2], None);
        assert_eq!(pct[3], None);

        let two = pct_change(&values, 2, 1e-6);
        assert!((two[3].unwrap() - 10.0).abs() < 1e-9);
    }
}
