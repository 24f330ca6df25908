use crate::analysis::fiscal_stress::{fiscal_stress_index, BillsTable, FiscalStressReport};
use crate::analysis::fx_stress::{fx_stress_state, FxStressReport};
use crate::analysis::recession::{
    classify_policy_stance, latest_valid_term_spread, recession_probability, PolicyStanceReport,
    RecessionReport, YieldTable,
};
use crate::analysis::signals::{self, FxFlowSignal, InflationPressure};
use crate::analysis::yield_curve::{curve_regime, curve_shape, CurveRegimeReport, CurveShapeReport, TENOR_MATURITIES};
use crate::commentary::headline::{macro_headline, Headline, HeadlineInputs};
use crate::commentary::sector::{
    bill_rates_commentary, bills_commentary, bonds_commentary, commodities_summary, copper_commentary,
    fx_flows_commentary, fx_summary, inflation_summary, liquidity_commentary, maize_commentary,
    money_supply_commentary, oil_commentary, reserves_commentary, SectorNote,
};
use crate::commentary::summary::{base_case, closing_summary, what_changed, ClosingSummary};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::indicators::debt::{BILL_SALES_SLUGS, BOND_STOCK_SLUGS};
use crate::indicators::fx_flows::NetFxFlow;
use crate::indicators::registry::{Category, Registry};
use crate::indicators::CalculatedIndicator;
use crate::models::{Band, IndicatorSeries, SignalMetrics, SignalReport};
use chrono::NaiveDate;
use serde::Serialize;

/// Every raw series the brief reads, keyed by registry slug.
#[derive(Debug, Clone, Default)]
pub struct MacroSnapshotInputs {
    series: Vec<IndicatorSeries>,
}

impl MacroSnapshotInputs {
    pub fn new(series: Vec<IndicatorSeries>) -> Self {
        let mut inputs = Self::default();
        for s in series {
            inputs.insert(s);
        }
        inputs
    }

    /// Adds a series, replacing any existing one with the same slug.
    pub fn insert(&mut self, series: IndicatorSeries) {
        match self.series.iter_mut().find(|s| s.slug() == series.slug()) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn get(&self, slug: &str) -> Option<&IndicatorSeries> {
        self.series.iter().find(|s| s.slug() == slug)
    }

    /// The named series, or an empty one so downstream signals report unavailable.
    fn column(&self, slug: &str) -> IndicatorSeries {
        match self.get(slug) {
            Some(s) => s.clone(),
            None => {
                tracing::warn!(slug, "series missing from snapshot, treating as empty");
                IndicatorSeries::new(slug, Vec::new())
            }
        }
    }

    /// Named columns, each cloned or empty.
    fn columns(&self, slugs: &[&str]) -> Vec<IndicatorSeries> {
        slugs.iter().map(|slug| self.column(slug)).collect()
    }

    /// Runs the registered calculator for `slug` over its declared inputs.
    /// `None` when the registry has no calculator for it.
    pub fn derive(&self, slug: &str, cfg: &EngineConfig) -> Result<Option<IndicatorSeries>, EngineError> {
        let Some(calculator) = Registry::get_calculator(slug, cfg) else {
            return Ok(None);
        };
        let columns = self.columns(&calculator.required_inputs());
        let refs: Vec<&IndicatorSeries> = columns.iter().collect();
        calculator.calculate(&refs).map(Some)
    }

    pub fn yield_table(&self) -> YieldTable {
        YieldTable::new(
            TENOR_MATURITIES
                .iter()
                .filter_map(|(slug, _)| self.get(slug).cloned())
                .collect(),
        )
    }

    pub fn bills_table(&self) -> BillsTable {
        BillsTable {
            total_sales: self.column("tbill_sales_total"),
            outstanding_91d: self.column("tbill_outstanding_91d"),
            outstanding_182d: self.column("tbill_outstanding_182d"),
            outstanding_total: self.column("tbill_outstanding_total"),
            weighted_yield: self.column("tbill_weighted_yield"),
        }
    }
}

/// Everything the engine says about one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MacroBrief {
    pub as_of: Option<NaiveDate>,
    pub gauges: Vec<SignalReport>,
    pub fx_state: SignalReport,
    pub inflation_state: SignalReport,
    pub fx_stress: FxStressReport,
    pub fiscal_stress: FiscalStressReport,
    pub recession: RecessionReport,
    pub policy_stance: PolicyStanceReport,
    pub term_spread: Option<(NaiveDate, f64)>,
    pub curve_regime: CurveRegimeReport,
    pub curve_shape: CurveShapeReport,
    pub fx_flow: Option<FxFlowSignal>,
    pub inflation_pressure: Option<InflationPressure>,
    /// Every registry-calculated series over this snapshot.
    pub derived: Vec<IndicatorSeries>,
    pub headline: Headline,
    pub base_case: String,
    pub what_changed: Vec<String>,
    pub sectors: Vec<SectorNote>,
    /// FX, inflation and commodity price overview.
    pub overview: Vec<SectorNote>,
    pub summary: ClosingSummary,
}

impl MacroBrief {
    pub fn gauge(&self, indicator: &str) -> Option<&SignalReport> {
        self.gauges.iter().find(|g| g.indicator == indicator)
    }
}

/// Composite result flattened into a signal for the closing summary.
fn composite_signal(indicator: &str, status: Option<Band>, value: Option<f64>, commentary: &str) -> SignalReport {
    let metrics = SignalMetrics { value, ..Default::default() };
    match status {
        Some(status) => SignalReport {
            indicator: indicator.to_string(),
            status: Some(status),
            commentary: commentary.to_string(),
            confidence: None,
            metrics,
        },
        None => SignalReport::unavailable(indicator, metrics),
    }
}

/// Runs every gauge, composite and narrative builder over one snapshot.
pub fn build_macro_brief(inputs: &MacroSnapshotInputs, cfg: &EngineConfig) -> Result<MacroBrief, EngineError> {
    let rate = inputs.column("usd_zmw");
    let annual = inputs.column("inflation_annual");
    let monthly = inputs.column("inflation_monthly");
    let policy = inputs.column("policy_rate");
    let reserves = inputs.column("total_reserves");
    let gross = inputs.column("gross_reserves");

    // 1. Per-indicator gauges
    let gauges = vec![
        signals::fx_gauge(&rate, cfg),
        signals::inflation_gauge(&annual, cfg),
        signals::liquidity_gauge(&reserves, cfg),
        signals::policy_rate_gauge(&policy, cfg),
        signals::fiscal_gauge(
            &inputs.column("tbill_sales_total"),
            &inputs.column("tbill_opening_balance"),
            cfg,
        ),
        signals::external_gauge(&gross, cfg),
        signals::copper_gauge(&inputs.column("copper"), cfg),
        signals::oil_gauge(&inputs.column("oil"), cfg),
    ];
    let fx_state = signals::fx_state(&rate, cfg);
    let inflation_state = signals::inflation_state(&annual, &monthly, cfg);

    // 2. Composite indices
    let fx_stress = fx_stress_state(&rate, inputs.get("gross_reserves"), cfg);
    let fiscal_stress = fiscal_stress_index(&inputs.bills_table(), cfg)?;

    let yields = inputs.yield_table();
    let recession = recession_probability(&yields, cfg)?;
    let policy_stance = classify_policy_stance(&yields, cfg)?;
    let term_spread = latest_valid_term_spread(&yields)?;
    let curve_regime = curve_regime(&yields, cfg)?;
    let curve_shape = curve_shape(&yields, cfg);

    // 3. Directional narrative inputs
    let fx_flow = signals::fx_flow_signal(&inputs.column("weighted_rate"), cfg);
    let inflation_pressure = signals::inflation_pressure(&annual, &monthly, cfg);

    // 4. Derived series through the registry calculators
    let mut derived = Vec::new();
    for meta in Registry::get_all_indicators() {
        if !meta.calculated || meta.category == Category::Composite {
            continue;
        }
        if let Some(series) = inputs.derive(&meta.slug, cfg)? {
            derived.push(series);
        }
    }

    // 5. Narrative
    let headline = macro_headline(
        &HeadlineInputs {
            fx: &gauges[0],
            inflation: &gauges[1],
            liquidity: &gauges[2],
            fiscal: &gauges[4],
            external: &gauges[5],
            copper: &gauges[6],
            oil: &gauges[7],
            policy_rate: policy.last_observed().map(|(_, v)| v),
        },
        &cfg.narrative,
    );

    let aggregates: Vec<IndicatorSeries> = ["money_m0", "money_m1", "money_m2", "money_m3"]
        .iter()
        .filter_map(|slug| inputs.get(slug).cloned())
        .collect();
    let aggregate_refs: Vec<&IndicatorSeries> = aggregates.iter().collect();

    let flow_columns = inputs.columns(&NetFxFlow.required_inputs());
    let flow_refs: Vec<&IndicatorSeries> = flow_columns.iter().collect();
    let tenor_sales = inputs.columns(&BILL_SALES_SLUGS);
    let tenor_refs: Vec<&IndicatorSeries> = tenor_sales.iter().collect();
    let bond_stocks = inputs.columns(&BOND_STOCK_SLUGS);
    let bond_refs: Vec<&IndicatorSeries> = bond_stocks.iter().collect();

    let sectors = vec![
        money_supply_commentary(&aggregate_refs, cfg),
        liquidity_commentary(&reserves, cfg),
        reserves_commentary(&gross, cfg),
        fx_flows_commentary(&flow_refs, cfg)?,
        bills_commentary(
            &inputs.column("tbill_sales_total"),
            &inputs.column("tbill_outstanding_total"),
            &tenor_refs,
            cfg,
        ),
        bill_rates_commentary(&inputs.column("tbill_weighted_yield"), cfg),
        bonds_commentary(&bond_refs, cfg)?,
        copper_commentary(&inputs.column("copper"), cfg),
        oil_commentary(&inputs.column("oil"), cfg),
        maize_commentary(&inputs.column("maize"), cfg),
    ];

    let commodity_prices: Vec<IndicatorSeries> = Registry::get_by_category(Category::Commodities)
        .into_iter()
        .filter(|meta| !meta.calculated)
        .map(|meta| inputs.column(&meta.slug))
        .collect();
    let price_refs: Vec<&IndicatorSeries> = commodity_prices.iter().collect();
    let overview = vec![
        fx_summary(&rate, cfg),
        inflation_summary(&annual),
        commodities_summary(&price_refs, cfg),
    ];

    let mut risk_signals = gauges.clone();
    risk_signals.push(fx_state.clone());
    risk_signals.push(inflation_state.clone());
    risk_signals.push(fx_stress.to_signal());
    risk_signals.push(composite_signal(
        "fiscal_stress",
        fiscal_stress.regime.map(|r| r.band()),
        fiscal_stress.index,
        &fiscal_stress.commentary,
    ));
    risk_signals.push(composite_signal(
        "recession_probability",
        Some(recession.band.band()),
        Some(recession.probability),
        &recession.commentary,
    ));
    let summary = closing_summary(&risk_signals);

    let as_of = rate.last_observed().map(|(d, _)| d);
    tracing::info!(
        ?as_of,
        risks = summary.risks.len(),
        "macro brief assembled"
    );

    Ok(MacroBrief {
        as_of,
        gauges,
        fx_state,
        inflation_state,
        base_case: base_case(fx_flow.as_ref(), inflation_pressure.as_ref()),
        what_changed: what_changed(fx_flow.as_ref(), inflation_pressure.as_ref(), &cfg.narrative),
        fx_stress,
        fiscal_stress,
        recession,
        policy_stance,
        term_spread,
        curve_regime,
        curve_shape,
        fx_flow,
        inflation_pressure,
        derived,
        headline,
        sectors,
        overview,
        summary,
    })
}
