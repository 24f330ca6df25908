use crate::analysis::regime::FxStressLevel;
use crate::analysis::statistics::{clip, guard_std, pct_change, rolling_mean, rolling_std};
use crate::config::EngineConfig;
use crate::core::timeseries::{align_series, JoinMethod};
use crate::models::{Band, IndicatorSeries, SignalMetrics, SignalReport};
use chrono::NaiveDate;
use serde::Serialize;

/// Per-month components of the FX Stress Index, each clipped to the configured bound.
#[derive(Debug, Clone, Serialize)]
pub struct FxStressPoint {
    pub date: NaiveDate,
    pub mom_pct: Option<f64>,
    pub z_price: Option<f64>,
    pub z_volatility: Option<f64>,
    pub z_momentum: Option<f64>,
    pub z_reserves: f64,
    pub index: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FxStressReport {
    pub value: Option<f64>,
    pub mom_change: Option<f64>,
    pub level: Option<FxStressLevel>,
    pub status: Option<Band>,
    pub label: String,
    pub commentary: String,
    pub confidence: Option<u8>,
    pub history: Vec<FxStressPoint>,
}

impl FxStressReport {
    pub fn to_signal(&self) -> SignalReport {
        let metrics = SignalMetrics {
            value: self.value,
            mom: self.mom_change,
            z_score: self.value,
            ..Default::default()
        };
        match self.status {
            Some(status) => SignalReport {
                indicator: "fx_stress".to_string(),
                status: Some(status),
                commentary: self.commentary.clone(),
                confidence: self.confidence,
                metrics,
            },
            None => SignalReport::unavailable("fx_stress", metrics),
        }
    }
}

fn ratio(num: Option<f64>, den: Option<f64>, eps: f64) -> Option<f64> {
    Some(num? / guard_std(den?, eps))
}

/// Rolling std with zeros replaced by epsilon; undefined until two values exist.
fn guarded_std(values: &[Option<f64>], window: usize, eps: f64) -> Vec<Option<f64>> {
    rolling_std(values, window, 1)
        .into_iter()
        .map(|s| s.map(|s| guard_std(s, eps)))
        .collect()
}

/// Reserve stress on the reserves' own dates: `(mean - r) / std`, so falling
/// reserves score positive.
fn reserve_stress(reserves: &IndicatorSeries, window: usize, eps: f64) -> IndicatorSeries {
    let values = reserves.values();
    let means = rolling_mean(&values, window, 1);
    let stds = guarded_std(&values, window, eps);

    let z = values
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(r, (m, s))| match (r, m, s) {
            (Some(r), Some(m), Some(s)) => Some((m - r) / s),
            _ => None,
        })
        .collect();

    reserves.with_values("reserve_stress", z)
}

/// Components on the exchange rate's dates. Missing reserves contribute zero.
pub fn fx_stress_components(
    rate: &IndicatorSeries,
    reserves: Option<&IndicatorSeries>,
    cfg: &EngineConfig,
) -> Vec<FxStressPoint> {
    let eps = cfg.standardization.epsilon;
    let bound = cfg.standardization.clip;
    let w = cfg.fx_stress.window;
    let weights = &cfg.fx_stress.weights;

    let prices = rate.values();

    // 1. Price level against its rolling mean
    let mom = pct_change(&prices, 1, eps);
    let means = rolling_mean(&prices, w, 1);
    let stds = guarded_std(&prices, w, eps);

    // 2. Volatility relative to its own recent average
    let avg_std = rolling_mean(&stds, w, 1);

    // 3. Momentum scaled by its recent dispersion
    let mom_std = guarded_std(&mom, w, eps);

    // 4. Reserves, left-joined onto the rate's dates
    let reserve_z: Vec<Option<f64>> = match reserves {
        Some(r) => align_series(rate, &reserve_stress(r, w, eps), JoinMethod::Left)
            .into_iter()
            .map(|(_, _, z)| z)
            .collect(),
        None => vec![None; prices.len()],
    };

    rate.points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let z_price = match (p.value, means[i]) {
                (Some(v), Some(m)) => ratio(Some(v - m), stds[i], eps),
                _ => None,
            }
            .map(|z| clip(z, bound));
            let z_volatility = ratio(stds[i], avg_std[i], eps).map(|z| clip(z, bound));
            let z_momentum = ratio(mom[i], mom_std[i], eps).map(|z| clip(z, bound));
            let z_reserves = clip(reserve_z.get(i).copied().flatten().unwrap_or(0.0), bound);

            let index = match (z_price, z_volatility, z_momentum) {
                (Some(zp), Some(zv), Some(zm)) => Some(clip(
                    zp * weights.price
                        + zv * weights.volatility
                        + zm * weights.momentum
                        + z_reserves * weights.reserves,
                    bound,
                )),
                _ => None,
            };

            FxStressPoint {
                date: p.date,
                mom_pct: mom[i],
                z_price,
                z_volatility,
                z_momentum,
                z_reserves,
                index,
            }
        })
        .collect()
}

fn describe(level: FxStressLevel) -> &'static str {
    match level {
        FxStressLevel::Severe => "Severe FX stress with disorderly market dynamics and elevated volatility.",
        FxStressLevel::Elevated => {
            "FX pressures elevated with rising volatility and moderate currency depreciation."
        }
        FxStressLevel::Stable => "FX conditions stable within historical norms, manageable volatility.",
    }
}

pub fn fx_stress_state(
    rate: &IndicatorSeries,
    reserves: Option<&IndicatorSeries>,
    cfg: &EngineConfig,
) -> FxStressReport {
    let history = fx_stress_components(rate, reserves, cfg);

    let value = history.last().and_then(|p| p.index);
    // A single row compares against itself
    let prev = if history.len() > 1 {
        history.get(history.len() - 2).and_then(|p| p.index)
    } else {
        value
    };
    let mom_change = match (value, prev) {
        (Some(v), Some(p)) => Some(v - p),
        _ => None,
    };

    let level = FxStressLevel::classify(value, &cfg.fx_stress);
    match level {
        Some(level) => {
            tracing::debug!(?value, %level, "fx stress index computed");
            FxStressReport {
                value,
                mom_change,
                level: Some(level),
                status: Some(level.band()),
                label: level.to_string(),
                commentary: describe(level).to_string(),
                confidence: Some(level.confidence()),
                history,
            }
        }
        None => FxStressReport {
            value,
            mom_change,
            level: None,
            status: None,
            label: "Data unavailable".to_string(),
            commentary: "Data unavailable: insufficient FX history to compute the stress index."
                .to_string(),
            confidence: None,
            history,
        },
    }
}
