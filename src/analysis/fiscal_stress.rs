//! Fiscal Stress Index: domestic debt-market pressure from funding cost,
//! rollover exposure and issuance intensity.

use crate::analysis::regime::FiscalRegime;
use crate::analysis::statistics::{clip, pct_change, standardize};
use crate::config::EngineConfig;
use crate::core::timeseries::{align_series_multi, JoinMethod};
use crate::error::EngineError;
use crate::indicators::debt::{IssuancePressure, ShortTermRatio};
use crate::indicators::CalculatedIndicator;
use crate::models::IndicatorSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// T-bill auction and stock columns, plus the weighted-average yield.
#[derive(Debug, Clone)]
pub struct BillsTable {
    pub total_sales: IndicatorSeries,
    pub outstanding_91d: IndicatorSeries,
    pub outstanding_182d: IndicatorSeries,
    pub outstanding_total: IndicatorSeries,
    /// From the bill-rates table; may carry its own dates.
    pub weighted_yield: IndicatorSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiscalStressPoint {
    pub date: NaiveDate,
    pub yield_yoy: f64,
    pub short_term_ratio: f64,
    pub issuance_pressure: f64,
    pub z_yield: f64,
    pub z_rollover: f64,
    pub z_issuance: f64,
    pub index: f64,
    pub regime: FiscalRegime,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiscalStressReport {
    pub index: Option<f64>,
    pub regime: Option<FiscalRegime>,
    pub commentary: String,
    pub history: Vec<FiscalStressPoint>,
}

/// Unweighted mean of components after clipping each to `[-bound, bound]`.
pub fn combine_components(components: &[f64], bound: f64) -> Option<f64> {
    if components.is_empty() {
        return None;
    }
    Some(components.iter().map(|c| clip(*c, bound)).sum::<f64>() / components.len() as f64)
}

pub fn fiscal_commentary(index: f64, regime: FiscalRegime) -> String {
    let mut text = format!(
        "The Fiscal Stress Index currently stands at {:.2}, placing the domestic financing environment in a {} regime. ",
        index, regime
    );

    text.push_str(if regime.is_elevated() {
        "This reflects rising funding costs, elevated rollover exposure, and increased issuance pressure, \
         which together signal heightened vulnerability in domestic debt markets."
    } else if regime == FiscalRegime::Tightening {
        "Financing conditions are tightening, suggesting emerging cost and liquidity pressures \
         that warrant close monitoring."
    } else {
        "Domestic financing conditions remain broadly supportive, with manageable costs and refinancing risks."
    });
    text
}

pub fn fiscal_stress_index(bills: &BillsTable, cfg: &EngineConfig) -> Result<FiscalStressReport, EngineError> {
    let eps = cfg.standardization.epsilon;
    let bound = cfg.standardization.clip;
    let fs = &cfg.fiscal_stress;

    // 1. Yield pressure: YoY % change of the weighted yield on its own table
    let yield_yoy = bills.weighted_yield.with_values(
        "weighted_yield_yoy",
        pct_change(&bills.weighted_yield.values(), fs.yield_lag, eps),
    );

    // 2. Rollover risk
    let rollover = ShortTermRatio { epsilon: eps }.calculate(&[
        &bills.outstanding_91d,
        &bills.outstanding_182d,
        &bills.outstanding_total,
    ])?;

    // 3. Issuance intensity
    let issuance = IssuancePressure { window: fs.issuance_window, epsilon: eps }
        .calculate(&[&bills.total_sales, &bills.outstanding_total])?;

    // 4. Inner join on date, drop incomplete rows
    let rows: Vec<(NaiveDate, Vec<f64>)> =
        align_series_multi(&[&yield_yoy, &rollover, &issuance], JoinMethod::Inner)
            .into_iter()
            .filter_map(|row| row.complete().map(|v| (row.date, v)))
            .collect();

    if rows.is_empty() {
        tracing::warn!("fiscal stress index unavailable: no complete rows after alignment");
        return Ok(FiscalStressReport {
            index: None,
            regime: None,
            commentary: "Data unavailable: insufficient overlapping history for the Fiscal Stress Index."
                .to_string(),
            history: Vec::new(),
        });
    }

    // 5. Standardize each component over the remaining history
    let column = |i: usize| -> Vec<Option<f64>> { rows.iter().map(|(_, v)| Some(v[i])).collect() };
    let z_yield = standardize(&column(0), eps);
    let z_rollover = standardize(&column(1), eps);
    let z_issuance = standardize(&column(2), eps);

    let mut history = Vec::with_capacity(rows.len());
    for (i, (date, raw)) in rows.iter().enumerate() {
        // A single surviving row has no spread; it reads as neutral
        let z = [
            clip(z_yield[i].unwrap_or(0.0), bound),
            clip(z_rollover[i].unwrap_or(0.0), bound),
            clip(z_issuance[i].unwrap_or(0.0), bound),
        ];
        let Some(index) = combine_components(&z, bound) else {
            continue;
        };
        let Some(regime) = FiscalRegime::classify(Some(index), fs) else {
            continue;
        };

        history.push(FiscalStressPoint {
            date: *date,
            yield_yoy: raw[0],
            short_term_ratio: raw[1],
            issuance_pressure: raw[2],
            z_yield: z[0],
            z_rollover: z[1],
            z_issuance: z[2],
            index,
            regime,
        });
    }

    let latest = history.last();
    let index = latest.map(|p| p.index);
    let regime = latest.map(|p| p.regime);
    let commentary = match latest {
        Some(p) => fiscal_commentary(p.index, p.regime),
        None => "Data unavailable: Fiscal Stress Index could not be computed.".to_string(),
    };

    tracing::debug!(?index, ?regime, rows = history.len(), "fiscal stress index computed");

    Ok(FiscalStressReport { index, regime, commentary, history })
}
