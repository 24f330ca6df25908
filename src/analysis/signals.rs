use crate::analysis::metrics::{self, TrendLevel};
use crate::analysis::statistics::{pct_change, rolling_zscore, safe_div};
use crate::config::{EngineConfig, FxConfig, InflationConfig};
use crate::models::{Band, IndicatorSeries, SignalMetrics, SignalReport};
use serde::Serialize;

// =============================================================================
// PER-INDICATOR SIGNAL ENGINE
// Latest reading of one macro series -> band, note and confidence
// =============================================================================

/// Band, note and confidence of a classified reading.
pub type Classification = (Band, &'static str, u8);

fn last(values: Vec<Option<f64>>) -> Option<f64> {
    values.last().copied().flatten()
}

fn report(indicator: &str, class: Classification, metrics: SignalMetrics) -> SignalReport {
    let (status, note, confidence) = class;
    SignalReport {
        indicator: indicator.to_string(),
        status: Some(status),
        commentary: note.to_string(),
        confidence: Some(confidence),
        metrics,
    }
}

// =============================================================================
// FX STATE (z-score based)
// =============================================================================

pub fn classify_fx(z: Option<f64>, mom: Option<f64>, cfg: &FxConfig) -> Option<Classification> {
    let z = z.filter(|v| !v.is_nan())?;
    let mom = mom.filter(|v| !v.is_nan())?;

    Some(if z > cfg.red_z || (z > cfg.red_combo_z && mom > cfg.red_combo_mom) {
        (Band::Red, "Kwacha under stress with sharp depreciation and elevated volatility", 85)
    } else if z > cfg.amber_z || mom > cfg.amber_mom {
        (Band::Amber, "FX pressures elevated amid seasonal demand and volatility", 70)
    } else {
        (Band::Green, "FX trading within normal volatility bands", 90)
    })
}

/// Exchange-rate state from MoM % change and the rolling z-score of the rate.
pub fn fx_state(rate: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let values = rate.values();
    let eps = cfg.standardization.epsilon;

    // 1. Derived metrics on the latest row
    let mom = last(pct_change(&values, 1, eps));
    let z = last(rolling_zscore(&values, cfg.standardization.rolling_window, eps));

    let metrics = SignalMetrics {
        value: rate.latest_value(),
        mom,
        z_score: z,
        ..Default::default()
    };

    // 2. Classify
    match classify_fx(z, mom, &cfg.fx) {
        Some(class) => report("fx_state", class, metrics),
        None => {
            tracing::debug!(slug = rate.slug(), "fx state unavailable: short history");
            SignalReport::unavailable("fx_state", metrics)
        }
    }
}

// =============================================================================
// INFLATION STATE (target band)
// =============================================================================

/// `yoy` is the annual inflation rate, `mom` the monthly rate.
pub fn classify_inflation(
    yoy: Option<f64>,
    mom: Option<f64>,
    cfg: &InflationConfig,
) -> Option<Classification> {
    let yoy = yoy.filter(|v| !v.is_nan())?;
    let hot_month = mom.is_some_and(|m| m > cfg.red_mom);

    Some(if yoy > cfg.red_level || (hot_month && yoy > cfg.band_high) {
        (Band::Red, "Inflation is materially above target and re-accelerating", 85)
    } else if yoy > cfg.band_high {
        (Band::Amber, "Inflation remains above target with limited disinflation progress", 70)
    } else if yoy >= cfg.band_low {
        (Band::Green, "Inflation is within the central bank target range", 90)
    } else {
        (Band::Green, "Inflation is below target with easing price pressures", 75)
    })
}

pub fn inflation_state(
    annual: &IndicatorSeries,
    monthly: &IndicatorSeries,
    cfg: &EngineConfig,
) -> SignalReport {
    let yoy = annual.latest_value();
    let mom = monthly.latest_value();
    let metrics = SignalMetrics { value: yoy, mom, yoy, ..Default::default() };

    match classify_inflation(yoy, mom, &cfg.inflation) {
        Some(class) => report("inflation_state", class, metrics),
        None => SignalReport::unavailable("inflation_state", metrics),
    }
}

// =============================================================================
// TRAFFIC LIGHTS
// =============================================================================

struct Reading {
    value: Option<f64>,
    mom: Option<f64>,
    yoy: Option<f64>,
}

impl Reading {
    /// Percentage moves, for prices and stocks.
    fn pct(series: &IndicatorSeries, eps: f64) -> Self {
        let values = series.values();
        Self {
            value: series.latest_value(),
            mom: last(pct_change(&values, 1, eps)),
            yoy: last(pct_change(&values, 12, eps)),
        }
    }

    /// Point moves, for series already quoted in percent.
    fn level(series: &IndicatorSeries) -> Self {
        let values = series.values();
        Self {
            value: series.latest_value(),
            mom: metrics::mom(&values),
            yoy: metrics::yoy(&values),
        }
    }

    fn metrics(&self) -> SignalMetrics {
        SignalMetrics {
            value: self.value,
            mom: self.mom,
            yoy: self.yoy,
            ..Default::default()
        }
    }

    fn confidence(&self) -> Option<u8> {
        self.mom.map(|m| metrics::confidence(m, self.yoy, None))
    }
}

fn gauge(indicator: &str, status: Option<Band>, note: String, reading: &Reading) -> SignalReport {
    gauge_with(indicator, status, note, reading, reading.metrics())
}

fn gauge_with(
    indicator: &str,
    status: Option<Band>,
    note: String,
    reading: &Reading,
    metrics: SignalMetrics,
) -> SignalReport {
    match status {
        Some(status) => SignalReport {
            indicator: indicator.to_string(),
            status: Some(status),
            commentary: note,
            confidence: reading.confidence(),
            metrics,
        },
        None => SignalReport::unavailable(indicator, metrics),
    }
}

fn step_up(value: Option<f64>, green_max: f64, amber_max: f64) -> Option<Band> {
    value.map(|v| {
        if v <= green_max {
            Band::Green
        } else if v <= amber_max {
            Band::Amber
        } else {
            Band::Red
        }
    })
}

fn step_down(value: Option<f64>, green_min: f64, amber_min: f64) -> Option<Band> {
    value.map(|v| {
        if v >= green_min {
            Band::Green
        } else if v >= amber_min {
            Band::Amber
        } else {
            Band::Red
        }
    })
}

/// Depreciation gauge: any 1-month rise of the rate is at least amber.
pub fn fx_gauge(rate: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let r = Reading::pct(rate, cfg.standardization.epsilon);
    let status = r.mom.map(|m| {
        if m < 0.0 {
            Band::Green
        } else if m < cfg.fx.gauge_amber_max {
            Band::Amber
        } else {
            Band::Red
        }
    });
    let note = format!("1-month % change: {:.2}%", r.mom.unwrap_or_default());
    gauge("fx", status, note, &r)
}

pub fn inflation_gauge(annual: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let r = Reading::level(annual);
    let c = &cfg.inflation;
    let status = step_up(r.value, c.target, c.target + c.gauge_amber_margin);
    let note = format!("Latest inflation: {:.2}%", r.value.unwrap_or_default());
    gauge("inflation", status, note, &r)
}

/// Bank reserves: growth is green, a fall up to the floor is amber.
pub fn liquidity_gauge(total_reserves: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let r = Reading::pct(total_reserves, cfg.standardization.epsilon);
    let status = r.mom.map(|m| {
        if m > 0.0 {
            Band::Green
        } else if m > cfg.liquidity.amber_floor {
            Band::Amber
        } else {
            Band::Red
        }
    });
    let note = match r.mom {
        Some(m) => format!("MoM % change in reserves: {:.2}%", m),
        None => "MoM change: n/a".to_string(),
    };
    gauge("liquidity", status, note, &r)
}

pub fn policy_rate_gauge(policy_rate: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let r = Reading::level(policy_rate);
    let status = step_up(r.value, cfg.policy_rate.green_max, cfg.policy_rate.amber_max);
    let note = format!(
        "{} policy rate: {:.2}%",
        cfg.narrative.central_bank,
        r.value.unwrap_or_default()
    );
    gauge("policy", status, note, &r)
}

/// T-bill sales relative to the opening balance of the latest month.
///
/// A zero opening balance is replaced by `standardization.epsilon`, so any
/// positive sales read as an extreme ratio and the gauge turns red. It does
/// not report a zero ratio (green) for an empty opening stock.
pub fn fiscal_gauge(
    total_sales: &IndicatorSeries,
    opening_balance: &IndicatorSeries,
    cfg: &EngineConfig,
) -> SignalReport {
    let r = Reading::pct(total_sales, cfg.standardization.epsilon);
    let ratio = match (r.value, opening_balance.latest_value()) {
        (Some(sales), Some(opening)) => Some(safe_div(sales, opening, cfg.standardization.epsilon)),
        _ => None,
    };
    let status = ratio.map(|x| {
        if x < cfg.fiscal.amber_ratio {
            Band::Green
        } else if x < cfg.fiscal.red_ratio {
            Band::Amber
        } else {
            Band::Red
        }
    });
    let note = match r.mom {
        Some(m) => format!("MoM T-bills sales change: {:.2}%", m),
        None => "MoM change: n/a".to_string(),
    };
    let metrics = SignalMetrics { ratio, ..r.metrics() };
    gauge_with("fiscal", status, note, &r, metrics)
}

/// Gross reserves, reported in billions.
pub fn external_gauge(gross_reserves: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let mut r = Reading::pct(gross_reserves, cfg.standardization.epsilon);
    r.value = r.value.map(|v| v / cfg.external.scale);
    let status = step_down(r.value, cfg.external.green_min, cfg.external.amber_min);
    let note = format!(
        "Gross reserves: {:.1} B {}",
        r.value.unwrap_or_default(),
        cfg.narrative.currency_code
    );
    gauge("external", status, note, &r)
}

pub fn copper_gauge(copper: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let r = Reading::pct(copper, cfg.standardization.epsilon);
    let c = &cfg.commodities;
    let status = step_down(r.value, c.copper_base, c.copper_base * c.copper_amber_factor);
    let note = format!("Copper: {:.2} USD/Tonne", r.value.unwrap_or_default());
    gauge("copper", status, note, &r)
}

/// Oil is an import cost, so higher prices are worse.
pub fn oil_gauge(oil: &IndicatorSeries, cfg: &EngineConfig) -> SignalReport {
    let r = Reading::pct(oil, cfg.standardization.epsilon);
    let c = &cfg.commodities;
    let status = step_up(r.value, c.oil_base, c.oil_base * c.oil_amber_factor);
    let note = format!("Oil: {:.2} USD/barrel", r.value.unwrap_or_default());
    gauge("oil", status, note, &r)
}

// =============================================================================
// DIRECTIONAL SIGNALS (narrative inputs)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FxCondition {
    Pressure,
    Relief,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxFlowSignal {
    pub level: f64,
    pub mom: f64,
    pub condition: FxCondition,
}

/// Direction of the weighted-average rate over the last two observations.
pub fn fx_flow_signal(weighted_rate: &IndicatorSeries, cfg: &EngineConfig) -> Option<FxFlowSignal> {
    let observed: Vec<Option<f64>> = weighted_rate.observed().into_iter().map(Some).collect();
    let level = last(observed.clone())?;
    let mom = metrics::mom(&observed)?;

    let condition = if mom > cfg.fx_flow.pressure {
        FxCondition::Pressure
    } else if mom < cfg.fx_flow.relief {
        FxCondition::Relief
    } else {
        FxCondition::Stable
    };

    Some(FxFlowSignal { level, mom, condition })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflationPressure {
    pub level: f64,
    pub mom: Option<f64>,
    pub yoy: Option<f64>,
    pub pressure: TrendLevel,
}

/// Annual rate bucketed into low/moderate/high pressure, gaps dropped.
pub fn inflation_pressure(
    annual: &IndicatorSeries,
    monthly: &IndicatorSeries,
    cfg: &EngineConfig,
) -> Option<InflationPressure> {
    let annual: Vec<Option<f64>> = annual.observed().into_iter().map(Some).collect();
    let monthly: Vec<Option<f64>> = monthly.observed().into_iter().map(Some).collect();

    let level = last(annual.clone())?;
    let pressure = metrics::bucket(
        Some(level),
        cfg.inflation.pressure_low,
        cfg.inflation.pressure_high,
    )?;

    Some(InflationPressure {
        level,
        mom: metrics::mom(&monthly),
        yoy: metrics::yoy(&annual),
        pressure,
    })
}
