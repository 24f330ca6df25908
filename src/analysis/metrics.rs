use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-level trend label used for pressure signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLevel {
    Low,
    Moderate,
    High,
}

impl TrendLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLevel::Low => "low",
            TrendLevel::Moderate => "moderate",
            TrendLevel::High => "high",
        }
    }
}

impl fmt::Display for TrendLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `values[n-1] - values[n-2]`.
pub fn mom(values: &[Option<f64>]) -> Option<f64> {
    lagged_delta(values, 1)
}

/// `values[n-1] - values[n-13]`, by position rather than calendar.
pub fn yoy(values: &[Option<f64>]) -> Option<f64> {
    lagged_delta(values, 12)
}

fn lagged_delta(values: &[Option<f64>], lag: usize) -> Option<f64> {
    let n = values.len();
    if n <= lag {
        return None;
    }
    Some(values[n - 1]? - values[n - 1 - lag]?)
}

/// `Low` below `low`, `Moderate` in `[low, high)`, `High` from `high` up.
pub fn bucket(value: Option<f64>, low: f64, high: f64) -> Option<TrendLevel> {
    let value = value.filter(|v| !v.is_nan())?;
    Some(if value < low {
        TrendLevel::Low
    } else if value < high {
        TrendLevel::Moderate
    } else {
        TrendLevel::High
    })
}

/// Heuristic confidence in a directional reading, in `[10, 95]`.
pub fn confidence(mom: f64, yoy: Option<f64>, volatility: Option<f64>) -> u8 {
    // 1. Baseline plus strength of the move
    let mut score = 50.0 + (mom.abs() * 10.0).min(20.0);

    // 2. Confirmation from the yearly trend
    if let Some(yoy) = yoy {
        if sign(mom) == sign(yoy) {
            score += 10.0;
        } else {
            score -= 10.0;
        }
    }

    // 3. Volatility penalty
    if matches!(volatility, Some(v) if v > 2.0) {
        score -= 10.0;
    }

    score.clamp(10.0, 95.0) as u8
}

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    #[test]
    fn test_mom_needs_two_points() {
        assert_eq!(mom(&some(&[5.0])), None);
        assert_eq!(mom(&some(&[5.0, 7.5])), Some(2.5));
        assert_eq!(mom(&[Some(5.0), None]), None);
    }

    #[test]
    fn test_yoy_needs_thirteen_points() {
        let twelve: Vec<f64> = (0..12).map(|i| i as f64).collect();
        assert_eq!(yoy(&some(&twelve)), None);

        let thirteen: Vec<f64> = (0..13).map(|i| i as f64).collect();
        assert_eq!(yoy(&some(&thirteen)), Some(12.0));
    }

    #[test]
    fn test_yoy_is_positional_across_gaps() {
        // Thirteen rows where one calendar month was never recorded: the
        // comparison lands on a row that is 13 calendar months back.
        let mut rows = some(&[100.0; 13]);
        rows[0] = Some(90.0);
        assert_eq!(yoy(&rows), Some(10.0));
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket(Some(5.99), 6.0, 10.0), Some(TrendLevel::Low));
        assert_eq!(bucket(Some(6.0), 6.0, 10.0), Some(TrendLevel::Moderate));
        assert_eq!(bucket(Some(10.0), 6.0, 10.0), Some(TrendLevel::High));
        assert_eq!(bucket(None, 6.0, 10.0), None);
        assert_eq!(bucket(Some(f64::NAN), 6.0, 10.0), None);
    }

    #[test]
    fn test_confidence_scoring() {
        // 50 + 20 (capped) + 10 (confirmed)
        assert_eq!(confidence(3.0, Some(1.0), None), 80);
        // 50 + 5 - 10 (contradicted) - 10 (volatile)
        assert_eq!(confidence(0.5, Some(-1.0), Some(2.5)), 35);
        assert_eq!(confidence(0.0, None, None), 50);
    }

    #[test]
    fn test_confidence_is_clamped() {
        for mom in [-100.0, -1.0, 0.0, 1.0, 100.0] {
            for yoy in [None, Some(-5.0), Some(5.0)] {
                for vol in [None, Some(0.0), Some(10.0)] {
                    let c = confidence(mom, yoy, vol);
                    assert!((10..=95).contains(&c));
                }
            }
        }
    }
}
