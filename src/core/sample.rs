//! Deterministic synthetic monthly snapshot for demos and integration tests.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::analysis::yield_curve::TENOR_MATURITIES;
use crate::core::orchestrator::MacroSnapshotInputs;
use crate::indicators::debt::{BILL_SALES_SLUGS, BOND_STOCK_SLUGS};
use crate::indicators::fx_flows::{INFLOW_SLUGS, OUTFLOW_SLUGS};
use crate::models::IndicatorSeries;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MONTHS: usize = 48;

/// Base yield per tenor, in `TENOR_MATURITIES` order.
const TENOR_BASE: [f64; 10] = [11.0, 12.5, 13.5, 14.0, 17.0, 19.0, 21.0, 22.5, 24.0, 25.0];

/// Mean monthly T-bill sales per tenor (millions), in `BILL_SALES_SLUGS` order.
const BILL_SALES_BASE: [f64; 4] = [450.0, 350.0, 250.0, 450.0];

/// Opening bond stock per tenor (millions), in `BOND_STOCK_SLUGS` order.
const BOND_STOCK_BASE: [f64; 6] = [8000.0, 12000.0, 15000.0, 9000.0, 20000.0, 11000.0];

/// Mean monthly FX flows (millions), inflows then outflows.
const FLOW_BASE: [f64; 8] = [300.0, 80.0, 60.0, 30.0, 200.0, 70.0, 150.0, 40.0];

pub fn sample_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

struct Generator {
    rng: StdRng,
    months: usize,
}

impl Generator {
    fn shock(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Geometric path; `drift` and `vol` are monthly fractions.
    fn growth(&mut self, start: f64, drift: f64, vol: f64) -> Vec<f64> {
        let mut level = start;
        let mut out = Vec::with_capacity(self.months);
        for _ in 0..self.months {
            out.push(level);
            level *= (1.0 + drift + vol * self.shock()).max(0.5);
        }
        out
    }

    /// Ornstein-Uhlenbeck style path pulled toward `mean`.
    fn reverting(&mut self, start: f64, mean: f64, speed: f64, vol: f64) -> Vec<f64> {
        let mut level = start;
        let mut out = Vec::with_capacity(self.months);
        for _ in 0..self.months {
            out.push(level);
            level += speed * (mean - level) + vol * self.shock();
        }
        out
    }

    /// `base` plus independent noise of scale `vol`.
    fn jitter(&mut self, base: &[f64], vol: f64) -> Vec<f64> {
        base.iter().map(|b| b + vol * self.shock()).collect()
    }
}

/// Builds `months` consecutive monthly observations of every raw input series.
///
/// Same `(months, seed)` always yields the same snapshot.
pub fn generate_sample(months: usize, seed: u64) -> MacroSnapshotInputs {
    let mut g = Generator { rng: StdRng::seed_from_u64(seed), months };
    let start = sample_start();
    let mut series = Vec::new();
    let mut push = |slug: &str, values: &[f64]| series.push(IndicatorSeries::from_values(slug, start, values));

    // 1. Exchange rate and prices
    let usd_zmw = g.growth(18.0, 0.008, 0.02);
    let weighted: Vec<f64> = usd_zmw.iter().map(|r| r * (1.0 + 0.003 * g.shock())).collect();
    let annual = g.reverting(9.0, 11.0, 0.15, 0.6);
    let monthly: Vec<f64> = annual.iter().map(|a| a / 12.0 + 0.1 * g.shock()).collect();
    let policy: Vec<f64> = g
        .reverting(9.0, 12.5, 0.08, 0.3)
        .iter()
        .map(|p| (p / 0.25).round() * 0.25)
        .collect();
    push("usd_zmw", &usd_zmw);
    push("weighted_rate", &weighted);
    push("inflation_annual", &annual);
    push("inflation_monthly", &monthly);
    push("policy_rate", &policy);

    // 2. Money and reserves
    push("total_reserves", &g.growth(5000.0, 0.004, 0.03));
    push("money_m0", &g.growth(15000.0, 0.012, 0.02));
    push("money_m1", &g.growth(40000.0, 0.010, 0.015));
    push("money_m2", &g.growth(90000.0, 0.011, 0.012));
    push("money_m3", &g.growth(130000.0, 0.012, 0.012));
    push("gross_reserves", &g.growth(4200.0, 0.003, 0.025));

    // 3. Treasury bills
    let out_91d = g.growth(2500.0, 0.004, 0.05);
    let out_182d = g.growth(3500.0, 0.004, 0.04);
    let out_longer = g.growth(18000.0, 0.006, 0.02);
    let total: Vec<f64> = (0..months).map(|i| out_91d[i] + out_182d[i] + out_longer[i]).collect();
    let opening: Vec<f64> = (0..months).map(|i| total[i.saturating_sub(1)]).collect();
    let sales: Vec<Vec<f64>> = BILL_SALES_BASE.iter().map(|b| g.growth(*b, 0.005, 0.1)).collect();
    let sales_total: Vec<f64> = (0..months).map(|i| sales.iter().map(|s| s[i]).sum::<f64>()).collect();
    for (slug, tenor) in BILL_SALES_SLUGS.iter().zip(&sales) {
        push(*slug, tenor);
    }
    push("tbill_sales_total", &sales_total);
    push("tbill_opening_balance", &opening);
    push("tbill_outstanding_91d", &out_91d);
    push("tbill_outstanding_182d", &out_182d);
    push("tbill_outstanding_total", &total);
    push("tbill_weighted_yield", &g.reverting(12.0, 14.0, 0.1, 0.4));

    // 4. Yield curve: a shared level factor plus tenor noise
    let level = g.reverting(0.0, 0.0, 0.1, 0.3);
    for ((slug, _), base) in TENOR_MATURITIES.iter().zip(TENOR_BASE) {
        let curve: Vec<f64> = level.iter().map(|l| base + l).collect();
        let quoted = g.jitter(&curve, 0.15);
        push(*slug, &quoted);
    }

    // 5. Bond stock by tenor
    for (slug, base) in BOND_STOCK_SLUGS.iter().zip(BOND_STOCK_BASE) {
        let stock = g.growth(base, 0.006, 0.02);
        push(*slug, &stock);
    }

    // 6. Commodities and FX flows
    push("copper", &g.growth(7500.0, 0.004, 0.05));
    push("oil", &g.growth(60.0, 0.002, 0.07));
    push("maize", &g.growth(250.0, 0.008, 0.05));
    for (slug, base) in INFLOW_SLUGS.iter().chain(OUTFLOW_SLUGS.iter()).zip(FLOW_BASE) {
        let flows = g.growth(base, 0.003, 0.1);
        push(*slug, &flows);
    }

    tracing::debug!(months, seed, series = series.len(), "sample snapshot generated");
    MacroSnapshotInputs::new(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::registry::{Category, Registry};

    #[test]
    fn test_same_seed_same_snapshot() {
        let a = generate_sample(24, 7);
        let b = generate_sample(24, 7);
        let c = generate_sample(24, 8);
        assert_eq!(a.get("usd_zmw"), b.get("usd_zmw"));
        assert_ne!(a.get("usd_zmw"), c.get("usd_zmw"));
    }

    #[test]
    fn test_every_raw_series_is_present() {
        let inputs = generate_sample(DEFAULT_MONTHS, DEFAULT_SEED);
        for meta in Registry::get_all_indicators() {
            if meta.calculated || meta.category == Category::Composite {
                continue;
            }
            let series = inputs.get(&meta.slug);
            assert!(series.is_some(), "missing {}", meta.slug);
            assert_eq!(series.unwrap().len(), DEFAULT_MONTHS);
        }
    }

    #[test]
    fn test_levels_stay_positive() {
        let inputs = generate_sample(120, DEFAULT_SEED);
        for slug in ["usd_zmw", "gross_reserves", "copper", "oil", "maize", "bonds_10y", "tbill_outstanding_total"] {
            assert!(inputs.get(slug).unwrap().observed().iter().all(|v| *v > 0.0), "{} went negative", slug);
        }
    }

    #[test]
    fn test_tenor_sales_add_up_to_total() {
        let inputs = generate_sample(12, DEFAULT_SEED);
        let total = inputs.get("tbill_sales_total").unwrap().observed();
        for (i, expected) in total.iter().enumerate() {
            let sum: f64 = BILL_SALES_SLUGS
                .iter()
                .map(|slug| inputs.get(slug).unwrap().observed()[i])
                .sum();
            assert!((sum - expected).abs() < 1e-9);
        }
    }
}
