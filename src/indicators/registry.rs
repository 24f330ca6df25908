use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::indicators::debt::{BondStock, IssuancePressure, ShortTermRatio};
use crate::indicators::fx_flows::NetFxFlow;
use crate::indicators::yield_curve::{CurveSlope, TermSpread};
use crate::indicators::CalculatedIndicator;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Exchange,    // FX rates & flows
    Prices,      // inflation
    Monetary,    // money supply, reserves, policy rate
    Fiscal,      // T-bills & government debt
    Rates,       // yield curve
    External,    // gross international reserves
    Commodities, // copper, oil, maize
    Composite,   // derived indices & signals
}

/// Defines how the indicator value should be formatted/displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitType {
    /// Raw value as-is
    Index,
    /// Percentage (e.g., 7.2 -> "7.2%")
    Percent,
    /// Local currency per USD
    ExchangeRate,
    /// Local currency, millions
    Millions,
    /// USD price per unit (tonne, barrel)
    UsdPrice,
    /// Local currency price per unit (50kg bag)
    LocalPrice,
    Ratio,
}

/// Which direction of the indicator signals stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StressDirection {
    HigherIsWorse,
    LowerIsWorse,
    Neutral,
}

// ============================================================================
// METADATA STRUCT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorMetadata {
    pub slug: String,
    pub name: String,
    pub category: Category,
    pub description: Option<String>,
    pub unit: UnitType,
    pub direction: StressDirection,
    pub calculated: bool,
}

impl IndicatorMetadata {
    /// Whether a change of `change` in this indicator reads as stress.
    pub fn is_adverse(&self, change: f64) -> bool {
        match self.direction {
            StressDirection::HigherIsWorse => change > 0.0,
            StressDirection::LowerIsWorse => change < 0.0,
            StressDirection::Neutral => false,
        }
    }
}

// Helper macro to reduce boilerplate
macro_rules! ind {
    ($slug:expr, $name:expr, $cat:expr, $desc:expr, $unit:expr, $dir:expr, $calc:expr) => {
        IndicatorMetadata {
            slug: $slug.to_string(),
            name: $name.to_string(),
            category: $cat,
            description: Some($desc.to_string()),
            unit: $unit,
            direction: $dir,
            calculated: $calc,
        }
    };
    // Raw input series
    ($slug:expr, $name:expr, $cat:expr, $desc:expr, $unit:expr, $dir:expr) => {
        ind!($slug, $name, $cat, $desc, $unit, $dir, false)
    };
}

// ============================================================================
// STATIC INDICATOR REGISTRY (Lazy initialization, O(1) lookup)
// ============================================================================

use self::Category::*;
use self::StressDirection::*;
use self::UnitType::*;

static INDICATORS: Lazy<Vec<IndicatorMetadata>> = Lazy::new(|| {
    vec![
        // =====================================================================
        // RAW INPUT SERIES
        // =====================================================================
        ind!("usd_zmw", "USD/ZMW", Exchange, "Official USD exchange rate. Up = depreciation", ExchangeRate, HigherIsWorse),
        ind!("weighted_rate", "Weighted Average Rate", Exchange, "Interbank weighted average exchange rate", ExchangeRate, HigherIsWorse),
        ind!("inflation_annual", "Annual Inflation", Prices, "Headline CPI inflation, year-on-year", Percent, HigherIsWorse),
        ind!("inflation_monthly", "Monthly Inflation", Prices, "Headline CPI inflation, month-on-month", Percent, HigherIsWorse),
        ind!("policy_rate", "Policy Rate", Monetary, "Central bank monetary policy rate", Percent, HigherIsWorse),
        ind!("total_reserves", "Total Reserves", Monetary, "Commercial bank reserves held at the central bank", Millions, LowerIsWorse),
        ind!("money_m0", "M0", Monetary, "Currency with non-bank public", Millions, Neutral),
        ind!("money_m1", "M1", Monetary, "Narrow money", Millions, Neutral),
        ind!("money_m2", "M2", Monetary, "Broad money", Millions, Neutral),
        ind!("money_m3", "M3", Monetary, "Broad money including foreign currency deposits", Millions, Neutral),
        ind!("gross_reserves", "Gross International Reserves", External, "Official reserve assets", Millions, LowerIsWorse),
        ind!("tbill_sales_total", "T-Bill Sales", Fiscal, "Total T-bill sales in the month", Millions, HigherIsWorse),
        ind!("tbill_sales_91d", "91-day", Fiscal, "91-day T-bill sales in the month", Millions, Neutral),
        ind!("tbill_sales_182d", "182-day", Fiscal, "182-day T-bill sales in the month", Millions, Neutral),
        ind!("tbill_sales_273d", "273-day", Fiscal, "273-day T-bill sales in the month", Millions, Neutral),
        ind!("tbill_sales_364d", "364-day", Fiscal, "364-day T-bill sales in the month", Millions, Neutral),
        ind!("tbill_opening_balance", "T-Bill Opening Balance", Fiscal, "T-bill stock at the start of the month", Millions, Neutral),
        ind!("tbill_outstanding_91d", "T-Bills Outstanding (91D)", Fiscal, "91-day bills outstanding", Millions, Neutral),
        ind!("tbill_outstanding_182d", "T-Bills Outstanding (182D)", Fiscal, "182-day bills outstanding", Millions, Neutral),
        ind!("tbill_outstanding_total", "T-Bills Outstanding", Fiscal, "Total T-bill stock outstanding", Millions, Neutral),
        ind!("tbill_weighted_yield", "T-Bill Weighted Yield", Fiscal, "Weighted average T-bill yield", Percent, HigherIsWorse),
        ind!("bonds_2y", "2-year", Fiscal, "2-year government bonds outstanding", Millions, Neutral),
        ind!("bonds_3y", "3-year", Fiscal, "3-year government bonds outstanding", Millions, Neutral),
        ind!("bonds_5y", "5-year", Fiscal, "5-year government bonds outstanding", Millions, Neutral),
        ind!("bonds_7y", "7-year", Fiscal, "7-year government bonds outstanding", Millions, Neutral),
        ind!("bonds_10y", "10-year", Fiscal, "10-year government bonds outstanding", Millions, Neutral),
        ind!("bonds_15y", "15-year", Fiscal, "15-year government bonds outstanding", Millions, Neutral),
        ind!("yield_91d", "91 days", Rates, "91-day T-bill yield", Percent, Neutral),
        ind!("yield_182d", "182 days", Rates, "182-day T-bill yield", Percent, Neutral),
        ind!("yield_273d", "273 days", Rates, "273-day T-bill yield", Percent, Neutral),
        ind!("yield_364d", "364 days", Rates, "364-day T-bill yield", Percent, Neutral),
        ind!("yield_2y", "24 months", Rates, "2-year bond yield", Percent, Neutral),
        ind!("yield_3y", "3 year", Rates, "3-year bond yield", Percent, Neutral),
        ind!("yield_5y", "5 year", Rates, "5-year bond yield", Percent, Neutral),
        ind!("yield_7y", "7 year", Rates, "7-year bond yield", Percent, Neutral),
        ind!("yield_10y", "10 year", Rates, "10-year bond yield", Percent, Neutral),
        ind!("yield_15y", "15 year", Rates, "15-year bond yield", Percent, Neutral),
        ind!("copper", "Copper", Commodities, "LME copper, USD per tonne. Main export", UsdPrice, LowerIsWorse),
        ind!("oil", "Oil", Commodities, "Brent crude, USD per barrel. Import cost", UsdPrice, HigherIsWorse),
        ind!("maize", "Maize", Commodities, "Domestic maize grain, Kwacha per 50kg bag. Food prices", LocalPrice, HigherIsWorse),
        ind!("fx_inflows_mines", "Mines", Exchange, "Central bank FX purchases from mines", Millions, LowerIsWorse),
        ind!("fx_inflows_other_non_grz", "Other Non-GRZ", Exchange, "Other non-government FX inflows", Millions, LowerIsWorse),
        ind!("fx_inflows_mining_taxes", "Mining Taxes", Exchange, "Mining tax receipts in FX", Millions, LowerIsWorse),
        ind!("fx_inflows_donor", "Donor Inflows", Exchange, "Donor support in FX", Millions, LowerIsWorse),
        ind!("fx_outflows_dealing_net_sales", "Dealing Net Sales", Exchange, "Net FX sales to the market", Millions, HigherIsWorse),
        ind!("fx_outflows_other_non_grz", "Other Non-GRZ", Exchange, "Other non-government FX outflows", Millions, HigherIsWorse),
        ind!("fx_outflows_debt_servicing", "GRZ Debt Servicing", Exchange, "Government external debt service", Millions, HigherIsWorse),
        ind!("fx_outflows_other_uses", "GRZ Other Uses", Exchange, "Other government FX uses", Millions, HigherIsWorse),

        // =====================================================================
        // CALCULATED SERIES
        // =====================================================================
        ind!("term_spread", "Term Spread (10Y - 91D)", Rates,
             "Long minus short yield. Negative = inverted curve", Percent, LowerIsWorse, true),
        ind!("curve_slope", "Yield Curve Slope", Rates,
             "Short-tenor average minus long-tenor average. Positive = inverted", Percent, HigherIsWorse, true),
        ind!("short_term_ratio", "Short-Term Debt Ratio", Fiscal,
             "Share of T-bills maturing within 182 days (rollover risk)", Ratio, HigherIsWorse, true),
        ind!("issuance_pressure", "Issuance Pressure", Fiscal,
             "12-month T-bill sales over outstanding stock", Ratio, HigherIsWorse, true),
        ind!("bond_stock", "Total Bond Stock", Fiscal,
             "Government bonds outstanding across all tenors", Millions, Neutral, true),
        ind!("net_fx_flow", "Net FX Flow", Exchange,
             "Central bank FX inflows minus outflows", Millions, LowerIsWorse, true),

        // =====================================================================
        // SIGNALS & COMPOSITES
        // =====================================================================
        ind!("fx", "FX", Composite, "Exchange rate traffic light", Percent, HigherIsWorse, true),
        ind!("inflation", "Inflation", Composite, "Inflation traffic light", Percent, HigherIsWorse, true),
        ind!("liquidity", "Liquidity", Composite, "Bank reserves traffic light", Percent, LowerIsWorse, true),
        ind!("policy", "Policy", Composite, "Policy rate traffic light", Percent, HigherIsWorse, true),
        ind!("fiscal", "Fiscal", Composite, "T-bill sales traffic light", Ratio, HigherIsWorse, true),
        ind!("external", "External", Composite, "Gross reserves traffic light", Index, LowerIsWorse, true),
        ind!("fx_state", "FX State", Composite, "Z-score based exchange rate state", Index, HigherIsWorse, true),
        ind!("inflation_state", "Inflation State", Composite, "Inflation against the target band", Percent, HigherIsWorse, true),
        ind!("fx_stress", "FX Stress Index", Composite, "Weighted price, volatility, momentum and reserves stress", Index, HigherIsWorse, true),
        ind!("fiscal_stress", "Fiscal Stress Index", Composite, "Yield, rollover and issuance pressure", Index, HigherIsWorse, true),
        ind!("recession_probability", "Recession Probability", Composite, "Yield-curve based recession score", Percent, HigherIsWorse, true),
    ]
});

static INDICATOR_MAP: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    INDICATORS
        .iter()
        .enumerate()
        .map(|(idx, ind)| (ind.slug.clone(), idx))
        .collect()
});

// ============================================================================
// REGISTRY STRUCT & IMPL
// ============================================================================

pub struct Registry;

impl Registry {
    pub fn get_all_indicators() -> &'static [IndicatorMetadata] {
        &INDICATORS
    }

    pub fn get_by_category(category: Category) -> Vec<IndicatorMetadata> {
        INDICATORS
            .iter()
            .filter(|i| i.category == category)
            .cloned()
            .collect()
    }

    /// O(1) lookup by slug
    pub fn get_metadata(slug: &str) -> Option<IndicatorMetadata> {
        INDICATOR_MAP
            .get(slug)
            .and_then(|&idx| INDICATORS.get(idx))
            .cloned()
    }

    /// Display name for a slug, falling back to the slug itself.
    pub fn display_name(slug: &str) -> String {
        INDICATOR_MAP
            .get(slug)
            .and_then(|&idx| INDICATORS.get(idx))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| slug.to_string())
    }

    /// Get calculator for derived series
    pub fn get_calculator(
        slug: &str,
        cfg: &EngineConfig,
    ) -> Option<Box<dyn CalculatedIndicator + Send + Sync>> {
        let eps = cfg.standardization.epsilon;
        match slug {
            "term_spread" => Some(Box::new(TermSpread)),
            "curve_slope" => Some(Box::new(CurveSlope)),
            "short_term_ratio" => Some(Box::new(ShortTermRatio { epsilon: eps })),
            "issuance_pressure" => Some(Box::new(IssuancePressure {
                window: cfg.fiscal_stress.issuance_window,
                epsilon: eps,
            })),
            "bond_stock" => Some(Box::new(BondStock)),
            "net_fx_flow" => Some(Box::new(NetFxFlow)),
            _ => None,
        }
    }
}
