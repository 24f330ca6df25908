use crate::analysis::regime::{PolicyStance, RecessionRisk};
use crate::analysis::statistics::pct_change;
use crate::config::{EngineConfig, RecessionConfig};
use crate::error::EngineError;
use crate::indicators::yield_curve::TermSpread;
use crate::indicators::CalculatedIndicator;
use crate::models::IndicatorSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// Government securities yields by tenor, keyed by slug (`yield_91d`, `yield_10y`, ...).
#[derive(Debug, Clone, Default)]
pub struct YieldTable {
    tenors: Vec<IndicatorSeries>,
}

impl YieldTable {
    pub fn new(tenors: Vec<IndicatorSeries>) -> Self {
        Self { tenors }
    }

    pub fn get(&self, slug: &str) -> Option<&IndicatorSeries> {
        self.tenors.iter().find(|s| s.slug() == slug)
    }

    pub fn short_rate(&self) -> Option<&IndicatorSeries> {
        self.get("yield_91d")
    }

    pub fn long_rate(&self) -> Option<&IndicatorSeries> {
        self.get("yield_10y")
    }

    /// Long minus short yield per row; `None` when either tenor is absent.
    pub fn term_spread(&self) -> Result<Option<IndicatorSeries>, EngineError> {
        match (self.long_rate(), self.short_rate()) {
            (Some(long), Some(short)) => Ok(Some(TermSpread.calculate(&[long, short])?)),
            _ => Ok(None),
        }
    }

    /// YoY % change of the 91-day yield on the latest row.
    pub fn short_rate_yoy(&self, lag: usize, eps: f64) -> Option<f64> {
        let short = self.short_rate()?;
        pct_change(&short.values(), lag, eps).last().copied().flatten()
    }
}

// =============================================================================
// RECESSION PROBABILITY
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecessionScore {
    pub depth: f64,
    pub duration: f64,
    pub policy: f64,
    pub probability: f64,
    /// Set when any input was undefined and scored as zero.
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecessionReport {
    pub probability: f64,
    pub band: RecessionRisk,
    pub latest_spread: Option<f64>,
    pub inversion_months: Option<usize>,
    pub short_rate_yoy: Option<f64>,
    pub score: RecessionScore,
    pub degraded: bool,
    pub commentary: String,
}

/// Weighted score from inversion depth, inversion duration and short-rate momentum.
pub fn score_recession(
    spread: Option<f64>,
    inversion_months: Option<usize>,
    short_rate_yoy: Option<f64>,
    cfg: &RecessionConfig,
) -> RecessionScore {
    let spread = spread.filter(|v| !v.is_nan());
    let short_rate_yoy = short_rate_yoy.filter(|v| !v.is_nan());
    let degraded = spread.is_none() || inversion_months.is_none() || short_rate_yoy.is_none();

    // 1. Inversion depth
    let depth = match spread {
        Some(s) if s < cfg.deep_inversion => cfg.deep_score,
        Some(s) if s < cfg.moderate_inversion => cfg.moderate_score,
        Some(s) if s < 0.0 => cfg.shallow_score,
        _ => 0.0,
    };

    // 2. Duration
    let duration = match inversion_months.map(|m| m as f64) {
        Some(m) if m >= cfg.long_duration => 1.0,
        Some(m) if m >= cfg.short_duration => cfg.short_duration_score,
        _ => 0.0,
    };

    // 3. Policy pressure
    let policy = match short_rate_yoy {
        Some(y) if y > cfg.high_pressure => 1.0,
        Some(y) if y > cfg.mid_pressure => cfg.mid_pressure_score,
        _ => 0.0,
    };

    let probability =
        (cfg.depth_weight * depth + cfg.duration_weight * duration + cfg.policy_weight * policy) * 100.0;

    RecessionScore { depth, duration, policy, probability, degraded }
}

/// Negative spreads among the last `window` rows; `None` with fewer rows.
pub fn inversion_months(spread: &IndicatorSeries, window: usize) -> Option<usize> {
    let values = spread.values();
    if window == 0 || values.len() < window {
        return None;
    }
    Some(
        values[values.len() - window..]
            .iter()
            .filter(|v| matches!(v, Some(s) if *s < 0.0))
            .count(),
    )
}

pub fn recession_probability(table: &YieldTable, cfg: &EngineConfig) -> Result<RecessionReport, EngineError> {
    let rc = &cfg.recession;

    let spread = table.term_spread()?;
    let latest_spread = spread.as_ref().and_then(|s| s.latest_value());
    let inversion = spread.as_ref().and_then(|s| inversion_months(s, rc.duration_window));
    let short_rate_yoy = table.short_rate_yoy(rc.short_rate_lag, cfg.standardization.epsilon);

    let score = score_recession(latest_spread, inversion, short_rate_yoy, rc);
    // Probability is always finite, so the band is always defined
    let band = RecessionRisk::classify(Some(score.probability), rc).unwrap_or(RecessionRisk::Low);

    if score.degraded {
        tracing::warn!(
            ?latest_spread,
            ?inversion,
            ?short_rate_yoy,
            "recession probability degraded: undefined inputs scored as zero"
        );
    }

    let mut commentary = format!(
        "Market-implied recession probability is estimated at {:.0}%. ",
        score.probability
    );
    match latest_spread {
        Some(s) => commentary.push_str(&format!(
            "The yield curve term spread stands at {:.2} percentage points, ",
            s
        )),
        None => commentary.push_str("The yield curve term spread is unavailable, "),
    }
    match inversion {
        Some(m) => commentary.push_str(&format!(
            "with inversion persisting for approximately {} months. ",
            m
        )),
        None => commentary.push_str("with too little history to measure inversion duration. "),
    }
    commentary.push_str(&format!(
        "Overall recession risk is assessed as {}.",
        band.as_str().to_lowercase()
    ));
    if score.degraded {
        commentary.push_str(" Some inputs were unavailable and scored as zero.");
    }

    Ok(RecessionReport {
        probability: score.probability,
        band,
        latest_spread,
        inversion_months: inversion,
        short_rate_yoy,
        degraded: score.degraded,
        score,
        commentary,
    })
}

// =============================================================================
// POLICY STANCE
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PolicyStanceReport {
    pub stance: Option<PolicyStance>,
    pub short_rate_yoy: Option<f64>,
    pub term_spread: Option<f64>,
    pub commentary: String,
}

pub fn classify_policy_stance(table: &YieldTable, cfg: &EngineConfig) -> Result<PolicyStanceReport, EngineError> {
    let short_rate_yoy =
        table.short_rate_yoy(cfg.recession.short_rate_lag, cfg.standardization.epsilon);
    let term_spread = table.term_spread()?.and_then(|s| s.latest_value());

    let stance = PolicyStance::classify(short_rate_yoy, term_spread, &cfg.policy_stance);

    let commentary = match (stance, short_rate_yoy, term_spread) {
        (Some(stance), Some(yoy), Some(spread)) => format!(
            "Current policy stance is assessed as {}. Short-term yields are changing at {:.1}% YoY, \
             while the yield curve spread stands at {:.2} percentage points. {}",
            stance,
            yoy,
            spread,
            stance.signal()
        ),
        _ => "Data unavailable: policy stance needs a year of short-rate history and both curve tenors."
            .to_string(),
    };

    Ok(PolicyStanceReport { stance, short_rate_yoy, term_spread, commentary })
}

/// Date and spread of the last row where both the 10-year and 91-day yields exist.
pub fn latest_valid_term_spread(table: &YieldTable) -> Result<Option<(NaiveDate, f64)>, EngineError> {
    Ok(table.term_spread()?.and_then(|s| s.last_observed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn table(short: &[f64], long: &[Option<f64>]) -> YieldTable {
        YieldTable::new(vec![
            IndicatorSeries::from_values("yield_91d", start(), short),
            IndicatorSeries::monthly("yield_10y", start(), long),
        ])
    }

    #[test]
    fn test_deep_long_inversion_is_high() {
        let cfg = EngineConfig::default().recession;
        let score = score_recession(Some(-1.2), Some(5), Some(10.0), &cfg);
        assert_eq!(score.depth, 1.0);
        assert_eq!(score.duration, 1.0);
        assert_eq!(score.policy, 0.0);
        assert!((score.probability - 80.0).abs() < 1e-9);
        assert!(!score.degraded);
        assert_eq!(RecessionRisk::classify(Some(score.probability), &cfg), Some(RecessionRisk::High));
    }

    #[test]
    fn test_recession_from_yield_table() {
        let cfg = EngineConfig::default();
        // 13 months: short rate flat at 20 then up 10% YoY; last 5 months inverted by 1.2
        let mut short = vec![20.0; 12];
        short.push(22.0);
        let long: Vec<Option<f64>> = (0..13)
            .map(|i| if i >= 8 { Some(short[i] - 1.2) } else { Some(short[i] + 1.0) })
            .collect();

        let report = recession_probability(&table(&short, &long), &cfg).unwrap();
        assert_eq!(report.inversion_months, Some(5));
        assert!((report.short_rate_yoy.unwrap() - 10.0).abs() < 1e-9);
        assert!((report.probability - 80.0).abs() < 1e-9);
        assert_eq!(report.band, RecessionRisk::High);
        assert!(!report.degraded);
        assert!(report.commentary.contains("80%"));
    }

    #[test]
    fn test_short_history_is_low_and_degraded() {
        let cfg = EngineConfig::default();
        let short = [10.0, 10.2, 10.4, 10.6, 10.8];
        let long: Vec<Option<f64>> = short.iter().map(|s| Some(s + 2.0)).collect();

        let report = recession_probability(&table(&short, &long), &cfg).unwrap();
        assert_eq!(report.band, RecessionRisk::Low);
        assert_eq!(report.inversion_months, None);
        assert_eq!(report.short_rate_yoy, None);
        assert!(report.degraded);
        assert!(report.probability.is_finite());
    }

    #[test]
    fn test_missing_tenor_is_degraded() {
        let cfg = EngineConfig::default();
        let t = YieldTable::new(vec![IndicatorSeries::from_values("yield_91d", start(), &[10.0; 13])]);
        let report = recession_probability(&t, &cfg).unwrap();
        assert!(report.degraded);
        assert_eq!(report.latest_spread, None);
        assert_eq!(latest_valid_term_spread(&t).unwrap(), None);
    }

    #[test]
    fn test_policy_stance_tight() {
        let cfg = EngineConfig::default();
        let mut short = vec![10.0; 12];
        short.push(13.0);
        let mut long: Vec<Option<f64>> = vec![Some(12.0); 12];
        long.push(Some(12.5));

        let report = classify_policy_stance(&table(&short, &long), &cfg).unwrap();
        assert_eq!(report.stance, Some(PolicyStance::Tight));
        assert!(report.commentary.contains("Tight"));
    }

    #[test]
    fn test_policy_stance_needs_history() {
        let cfg = EngineConfig::default();
        let report = classify_policy_stance(&table(&[10.0, 11.0], &[Some(12.0), Some(12.0)]), &cfg).unwrap();
        assert_eq!(report.stance, None);
        assert!(report.commentary.starts_with("Data unavailable"));
    }

    #[test]
    fn test_latest_valid_term_spread_skips_gaps() {
        let t = table(&[10.0, 11.0, 12.0], &[Some(15.0), Some(14.0), None]);
        let (date, spread) = latest_valid_term_spread(&t).unwrap().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert!((spread - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_inversion_window() {
        let spread = IndicatorSeries::monthly(
            "term_spread",
            start(),
            &[Some(-1.0), Some(1.0), None, Some(-0.1), Some(-0.2), Some(0.3)],
        );
        assert_eq!(inversion_months(&spread, 6), Some(3));
        assert_eq!(inversion_months(&spread, 7), None);
    }
}
