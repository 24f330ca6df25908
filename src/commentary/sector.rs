use super::thousands;
use crate::analysis::statistics::{pct_change, safe_div};
use crate::config::{EngineConfig, NarrativeConfig};
use crate::core::timeseries::{align_series_multi, JoinMethod};
use crate::error::EngineError;
use crate::indicators::debt::BondStock;
use crate::indicators::fx_flows::{NetFxFlow, INFLOW_SLUGS};
use crate::indicators::registry::{Registry, UnitType};
use crate::indicators::CalculatedIndicator;
use crate::models::{IndicatorSeries, Observation};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorNote {
    pub topic: String,
    pub text: String,
}

impl SectorNote {
    fn new(topic: &str, text: String) -> Self {
        Self { topic: topic.to_string(), text }
    }
}

/// Last row of a series with its `periods`-row percentage change.
struct Latest {
    date: NaiveDate,
    value: f64,
    change: f64,
}

fn latest_change(series: &IndicatorSeries, periods: usize, eps: f64) -> Option<Latest> {
    let change = pct_change(&series.values(), periods, eps).last().copied().flatten()?;
    let last = series.latest()?;
    Some(Latest { date: last.date, value: last.value?, change })
}

/// Latest 12-row percentage change plus the latest row value.
fn latest_yoy(series: &IndicatorSeries, eps: f64) -> Option<(f64, f64)> {
    latest_change(series, 12, eps).map(|l| (l.value, l.change))
}

/// Last row value and the row before it (the last row again when there is only one).
fn last_two(series: &IndicatorSeries) -> Option<(NaiveDate, f64, Option<f64>)> {
    let points = series.points();
    let last = points.last()?;
    let previous = match points.len() {
        1 => last.value,
        n => points[n - 2].value,
    };
    Some((last.date, last.value?, previous))
}

fn trend_word(yoy: f64) -> &'static str {
    if yoy > 0.0 {
        "increased"
    } else if yoy < 0.0 {
        "decreased"
    } else {
        "stable"
    }
}

// =============================================================================
// MONEY SUPPLY
// =============================================================================

/// YoY moves across the monetary aggregates (M0..M3, any subset).
pub fn money_supply_commentary(aggregates: &[&IndicatorSeries], cfg: &EngineConfig) -> SectorNote {
    let eps = cfg.standardization.epsilon;
    let code = &cfg.narrative.currency_code;

    let readings: Vec<(&str, String, Option<(f64, f64)>)> = aggregates
        .iter()
        .map(|s| (s.slug(), Registry::display_name(s.slug()), latest_yoy(s, eps)))
        .collect();
    let yoy_of = |slug: &str| {
        readings
            .iter()
            .find(|(s, _, _)| *s == slug)
            .and_then(|(_, _, r)| r.map(|(_, yoy)| yoy))
    };

    let mut lines = Vec::new();

    // 1. Level and YoY for the narrow and broad aggregates
    for (slug, name, reading) in &readings {
        if *slug == "money_m0" {
            continue;
        }
        match reading {
            Some((value, yoy)) => lines.push(format!(
                "{} has {} by {:.2}% YoY to {} {}.",
                name,
                trend_word(*yoy),
                yoy.abs(),
                thousands(*value),
                code
            )),
            None => lines.push(format!("{} data unavailable.", name)),
        }
    }

    // 2. Broad vs narrow money
    if let (Some(m1), Some(m2), Some(m3)) = (yoy_of("money_m1"), yoy_of("money_m2"), yoy_of("money_m3")) {
        if m2 > m1 && m3 > m1 {
            lines.push(
                "Broad money (M2 and M3) is expanding faster than narrow money (M1), \
                 indicating growth in savings and time deposits."
                    .to_string(),
            );
        } else if m1 > m2 && m1 > m3 {
            lines.push(
                "Narrow money (M1) is growing faster than broad money, \
                 pointing to stronger transactional demand."
                    .to_string(),
            );
        }
    }

    // 3. Sharp moves on any aggregate
    for (_, name, reading) in &readings {
        let Some((_, yoy)) = reading else { continue };
        if *yoy > 20.0 {
            lines.push(format!(
                "{} is rising sharply ({:+.2}% YoY), signaling rapid liquidity growth.",
                name, yoy
            ));
        } else if *yoy < -10.0 {
            lines.push(format!(
                "{} has contracted significantly ({:.2}% YoY), signaling tightening liquidity.",
                name, yoy
            ));
        }
    }

    if lines.is_empty() {
        lines.push("Data unavailable: no monetary aggregates supplied.".to_string());
    }
    SectorNote::new("money_supply", lines.join(" "))
}

// =============================================================================
// RESERVES
// =============================================================================

/// Commercial bank reserve balances from `liquidity.history_start_year` onward.
pub fn liquidity_commentary(total_reserves: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let start_year = cfg.liquidity.history_start_year;
    let points: Vec<Observation> = total_reserves
        .points()
        .iter()
        .filter(|p| p.date.year() >= start_year)
        .copied()
        .collect();
    let window = IndicatorSeries::new(total_reserves.slug(), points);

    let Some((value, yoy)) = latest_yoy(&window, cfg.standardization.epsilon) else {
        return SectorNote::new(
            "liquidity",
            format!("Data unavailable: total reserves need at least 13 months of history from {}.", start_year),
        );
    };

    let first = window.observed().first().copied().unwrap_or(value);
    let movement = if value > first {
        "accumulation in"
    } else if value < first {
        "drawdown in"
    } else {
        "no net change in"
    };

    SectorNote::new(
        "liquidity",
        format!(
            "Total reserves have {} by {:.2}% YoY to {} {}. \
             Over the period from {}, liquidity trends show {} reserves.",
            trend_word(yoy),
            yoy.abs(),
            thousands(value),
            cfg.narrative.currency_code,
            start_year,
            movement
        ),
    )
}

/// Gross international reserves, reported in billions.
pub fn reserves_commentary(gross_reserves: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let Some((value, yoy)) = latest_yoy(gross_reserves, cfg.standardization.epsilon) else {
        return SectorNote::new(
            "reserves",
            "Data unavailable: gross reserves need at least 13 months of history.".to_string(),
        );
    };

    let assessment = if yoy > 5.0 {
        "This robust growth indicates a strong external buffer and improved liquidity."
    } else if yoy < 0.0 {
        "Declining reserves may signal pressure on external stability and require monitoring."
    } else {
        "Reserves remain broadly stable, supporting exchange rate stability."
    };

    SectorNote::new(
        "reserves",
        format!(
            "Gross International Reserves stand at {:.2} B {} with a YoY change of {:.2}%. {}",
            value / 1e3,
            cfg.narrative.currency_code,
            yoy,
            assessment
        ),
    )
}

// =============================================================================
// FX FLOWS
// =============================================================================

/// Largest column on the latest complete row of `inputs[range]`.
fn dominant(inputs: &[&IndicatorSeries], range: std::ops::Range<usize>) -> Option<String> {
    let rows = align_series_multi(inputs, JoinMethod::Inner);
    let row = rows.last()?;
    range
        .filter_map(|i| row.values[i].map(|v| (i, v)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| Registry::display_name(inputs[i].slug()))
}

/// Net central bank FX position. `inputs` follow [`NetFxFlow`]'s declared order.
pub fn fx_flows_commentary(
    inputs: &[&IndicatorSeries],
    cfg: &EngineConfig,
) -> Result<SectorNote, EngineError> {
    let net = NetFxFlow.calculate(inputs)?;
    let narrative: &NarrativeConfig = &cfg.narrative;

    let Some((value, yoy)) = latest_yoy(&net, cfg.standardization.epsilon) else {
        return Ok(SectorNote::new(
            "fx_flows",
            "Data unavailable: FX flows need at least 13 months of history.".to_string(),
        ));
    };

    let split = INFLOW_SLUGS.len();
    let assessment = if yoy > 0.0 {
        format!(
            "FX inflows exceeded outflows, primarily driven by {}. This supports external stability.",
            dominant(inputs, 0..split).unwrap_or_else(|| "inflows".to_string())
        )
    } else if yoy < 0.0 {
        format!(
            "FX outflows exceeded inflows, mainly due to {}. This may exert pressure on the exchange rate.",
            dominant(inputs, split..inputs.len()).unwrap_or_else(|| "outflows".to_string())
        )
    } else {
        "FX inflows and outflows are broadly balanced.".to_string()
    };

    Ok(SectorNote::new(
        "fx_flows",
        format!(
            "Latest Net FX position: {:.2} B {} with a YoY change of {:.2}%. {}",
            value / 1e3,
            narrative.currency_code,
            yoy,
            assessment
        ),
    ))
}

// =============================================================================
// DEBT MARKETS
// =============================================================================

/// T-bill issuance. `tenor_sales` are the per-tenor sales series.
pub fn bills_commentary(
    sales_total: &IndicatorSeries,
    outstanding_total: &IndicatorSeries,
    tenor_sales: &[&IndicatorSeries],
    cfg: &EngineConfig,
) -> SectorNote {
    let eps = cfg.standardization.epsilon;
    let (Some((_, sales_yoy)), Some((_, stock_yoy))) =
        (latest_yoy(sales_total, eps), latest_yoy(outstanding_total, eps))
    else {
        return SectorNote::new(
            "bills",
            "Data unavailable: T-bill sales and balances need at least 13 months of history.".to_string(),
        );
    };

    let mut text = format!(
        "Total T-Bill sales changed {:.2}% YoY, with outstanding balances changing {:.2}% YoY.",
        sales_yoy, stock_yoy
    );
    if let Some(tenor) = dominant(tenor_sales, 0..tenor_sales.len()) {
        text.push_str(&format!(" The {} tenor dominates recent issuance.", tenor));
    }
    SectorNote::new("bills", text)
}

pub fn bill_rates_commentary(weighted_yield: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let text = match latest_yoy(weighted_yield, cfg.standardization.epsilon) {
        Some((_, yoy)) => format!(
            "Weighted average T-Bill yields changed {:.2}% YoY, indicating market cost of short-term funding.",
            yoy
        ),
        None => "Data unavailable: T-bill yields need at least 13 months of history.".to_string(),
    };
    SectorNote::new("bill_rates", text)
}

/// Government bond stock. `stocks` follow [`BondStock`]'s declared order.
pub fn bonds_commentary(stocks: &[&IndicatorSeries], cfg: &EngineConfig) -> Result<SectorNote, EngineError> {
    let total = BondStock.calculate(stocks)?;

    let Some((_, yoy)) = latest_yoy(&total, cfg.standardization.epsilon) else {
        return Ok(SectorNote::new(
            "bonds",
            "Data unavailable: bond stock needs at least 13 months of history.".to_string(),
        ));
    };

    let mut text = format!("Total government bond stock changed {:.2}% YoY.", yoy);
    if let Some(tenor) = dominant(stocks, 0..stocks.len()) {
        text.push_str(&format!(
            " The {} tenor represents the largest portion of outstanding bonds.",
            tenor
        ));
    }
    Ok(SectorNote::new("bonds", text))
}

// =============================================================================
// COMMODITIES
// =============================================================================

pub fn copper_commentary(copper: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let Some(latest) = latest_change(copper, 12, cfg.standardization.epsilon) else {
        return SectorNote::new(
            "copper",
            "Data unavailable: copper prices need at least 13 months of history.".to_string(),
        );
    };

    SectorNote::new(
        "copper",
        format!(
            "Copper prices averaged USD {} per tonne in {}. \
             Prices are {} by {:.1}% year-on-year, with implications for export earnings, \
             fiscal revenues, and foreign exchange inflows.",
            thousands(latest.value),
            latest.date.format("%B %Y"),
            if latest.change > 0.0 { "higher" } else { "lower" },
            latest.change.abs()
        ),
    )
}

pub fn oil_commentary(oil: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let Some(latest) = latest_change(oil, 1, cfg.standardization.epsilon) else {
        return SectorNote::new(
            "oil",
            "Data unavailable: oil prices need at least two months of history.".to_string(),
        );
    };

    SectorNote::new(
        "oil",
        format!(
            "Global oil prices stood at USD {:.2} per barrel in {}. \
             Month-on-month prices moved {:+.1}%, with direct pass-through risks to fuel prices, \
             transport costs, and headline inflation.",
            latest.value,
            latest.date.format("%B %Y"),
            latest.change
        ),
    )
}

/// Domestic maize prices. The closing sentence follows the registry stress direction.
pub fn maize_commentary(maize: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let Some(latest) = latest_change(maize, 12, cfg.standardization.epsilon) else {
        return SectorNote::new(
            "maize",
            "Data unavailable: maize prices need at least 13 months of history.".to_string(),
        );
    };

    let adverse = Registry::get_metadata(maize.slug())
        .map(|meta| meta.is_adverse(latest.change))
        .unwrap_or(latest.change > 0.0);
    let closing = if adverse {
        "Elevated maize prices increase risks to food inflation and household welfare."
    } else {
        "Easing maize prices relieve pressure on food inflation and household welfare."
    };

    SectorNote::new(
        "maize",
        format!(
            "Maize prices averaged {} {:.2} per 50kg bag in {}. \
             Prices are {} {:.1}% year-on-year, reflecting domestic supply conditions, \
             seasonal factors, and food security dynamics. {}",
            cfg.narrative.currency_code,
            latest.value,
            latest.date.format("%B %Y"),
            if latest.change > 0.0 { "up" } else { "down" },
            latest.change.abs(),
            closing
        ),
    )
}

// =============================================================================
// OVERVIEW
// =============================================================================

/// Exchange rate level and its move on the previous row.
pub fn fx_summary(rate: &IndicatorSeries, cfg: &EngineConfig) -> SectorNote {
    let code = &cfg.narrative.currency_code;
    let Some((date, latest, previous)) = last_two(rate) else {
        return SectorNote::new("fx", format!("Data unavailable: no USD/{} rate supplied.", code));
    };

    let mom = previous.map(|p| safe_div(latest - p, p, cfg.standardization.epsilon) * 100.0);
    let comparison = match mom {
        Some(m) if m > 0.0 => format!("weakened by {:.2}%", m.abs()),
        Some(m) if m < 0.0 => format!("strengthened by {:.2}%", m.abs()),
        Some(_) => "remained stable".to_string(),
        None => "has no comparable reading".to_string(),
    };

    SectorNote::new(
        "fx",
        format!(
            "As of {}, the {} vs USD stands at {:.2}. Compared to last month the {} {}.",
            date.format("%b %Y"),
            code,
            latest,
            code,
            comparison
        ),
    )
}

/// Headline inflation and its percentage-point change on the previous row.
pub fn inflation_summary(annual: &IndicatorSeries) -> SectorNote {
    let Some((date, latest, previous)) = last_two(annual) else {
        return SectorNote::new("inflation", "Data unavailable: no inflation readings supplied.".to_string());
    };

    let change = match previous {
        Some(p) => format!("{:.2}%", latest - p),
        None => "n/a".to_string(),
    };
    SectorNote::new(
        "inflation",
        format!(
            "As of {}, headline inflation is {:.2}%. Month-on-month change: {}.",
            date.format("%b %Y"),
            latest,
            change
        ),
    )
}

/// Price suffix for a commodity quote.
fn per_unit(slug: &str) -> &'static str {
    match slug {
        "copper" => "/t",
        "oil" => "/barrel",
        "maize" => " per 50kg",
        _ => "",
    }
}

/// Latest price of every commodity series, one line each.
pub fn commodities_summary(prices: &[&IndicatorSeries], cfg: &EngineConfig) -> SectorNote {
    let Some(as_of) = prices.iter().filter_map(|s| s.last_observed()).map(|(d, _)| d).max() else {
        return SectorNote::new("commodities", "Data unavailable: no commodity prices supplied.".to_string());
    };

    let mut lines = vec![format!("As of {}, commodity prices are:", as_of.format("%b %Y"))];
    for series in prices {
        let slug = series.slug();
        let name = Registry::display_name(slug);
        let unit = Registry::get_metadata(slug).map(|m| m.unit);
        let quote = match (series.last_observed(), unit) {
            (Some((_, v)), Some(UnitType::UsdPrice)) => format!("${:.2}{}", v, per_unit(slug)),
            (Some((_, v)), Some(UnitType::LocalPrice)) => {
                format!("{} {:.2}{}", cfg.narrative.currency_code, v, per_unit(slug))
            }
            (Some((_, v)), _) => format!("{:.2}", v),
            (None, _) => "n/a".to_string(),
        };
        lines.push(format!("- {}: {}", name, quote));
    }
    SectorNote::new("commodities", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::debt::{BILL_SALES_SLUGS, BOND_STOCK_SLUGS};
    use crate::indicators::fx_flows::OUTFLOW_SLUGS;
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    /// 13 months growing linearly from `base` to `base * (1 + growth)`.
    fn growing(slug: &str, base: f64, growth: f64) -> IndicatorSeries {
        let values: Vec<f64> = (0..13).map(|i| base * (1.0 + growth * i as f64 / 12.0)).collect();
        IndicatorSeries::from_values(slug, start(), &values)
    }

    #[test]
    fn test_money_supply_sentences() {
        let cfg = EngineConfig::default();
        let m0 = growing("money_m0", 1000.0, 0.25);
        let m1 = growing("money_m1", 20000.0, 0.05);
        let m2 = growing("money_m2", 50000.0, 0.10);
        let m3 = growing("money_m3", 80000.0, -0.12);

        let note = money_supply_commentary(&[&m0, &m1, &m2, &m3], &cfg);
        assert_eq!(note.topic, "money_supply");
        assert!(note.text.contains("M1 has increased by 5.00% YoY to 21,000 ZMW."));
        assert!(note.text.contains("M3 has decreased by 12.00% YoY to 70,400 ZMW."));
        assert!(!note.text.contains("decreased by -"));
        assert!(note.text.contains("M0 is rising sharply (+25.00% YoY)"));
        assert!(note.text.contains("M3 has contracted significantly (-12.00% YoY)"));
        // M3 lags M1, so neither broad-vs-narrow sentence applies
        assert!(!note.text.contains("Broad money"));
    }

    #[test]
    fn test_reserves_assessment() {
        let cfg = EngineConfig::default();
        let gir = growing("gross_reserves", 4000.0, 0.10);
        let note = reserves_commentary(&gir, &cfg);
        assert!(note.text.starts_with("Gross International Reserves stand at 4.40 B ZMW with a YoY change of 10.00%."));
        assert!(note.text.contains("robust growth"));

        let falling = growing("gross_reserves", 4000.0, -0.02);
        assert!(reserves_commentary(&falling, &cfg).text.contains("Declining reserves"));

        let short = IndicatorSeries::from_values("gross_reserves", start(), &[1.0, 2.0]);
        assert!(reserves_commentary(&short, &cfg).text.starts_with("Data unavailable"));
    }

    #[test]
    fn test_liquidity_commentary() {
        let cfg = EngineConfig::default();
        let reserves = growing("total_reserves", 5000.0, 0.04);
        let note = liquidity_commentary(&reserves, &cfg);
        assert_eq!(
            note.text,
            "Total reserves have increased by 4.00% YoY to 5,200 ZMW. \
             Over the period from 2016, liquidity trends show accumulation in reserves."
        );

        let falling = growing("total_reserves", 5000.0, -0.04);
        let text = liquidity_commentary(&falling, &cfg).text;
        assert!(text.starts_with("Total reserves have decreased by 4.00% YoY to 4,800 ZMW."));
        assert!(text.contains("drawdown in reserves"));
    }

    #[test]
    fn test_liquidity_window_starts_at_configured_year() {
        let mut cfg = EngineConfig::default();
        // 2015 sits far above the 2016-2017 path; only the window decides the trend
        let values: Vec<f64> = (0..30)
            .map(|i| if i < 12 { 10_000.0 } else { 4000.0 + 50.0 * (i - 12) as f64 })
            .collect();
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let reserves = IndicatorSeries::from_values("total_reserves", start, &values);

        let note = liquidity_commentary(&reserves, &cfg);
        assert!(note.text.starts_with("Total reserves have increased by 14.12% YoY to 4,850 ZMW."));
        assert!(note.text.ends_with("Over the period from 2016, liquidity trends show accumulation in reserves."));

        // Six months of 2017 cannot carry a 12-row change
        cfg.liquidity.history_start_year = 2017;
        let note = liquidity_commentary(&reserves, &cfg);
        assert!(note.text.starts_with("Data unavailable"));
        assert!(note.text.contains("from 2017"));
    }

    #[test]
    fn test_fx_flows_dominant_inflow() {
        let cfg = EngineConfig::default();
        let mut series: Vec<IndicatorSeries> = INFLOW_SLUGS
            .iter()
            .map(|slug| growing(slug, 100.0, 0.0))
            .chain(OUTFLOW_SLUGS.iter().map(|slug| growing(slug, 50.0, 0.0)))
            .collect();
        series[0] = growing(INFLOW_SLUGS[0], 400.0, 0.5);

        let inputs: Vec<&IndicatorSeries> = series.iter().collect();
        let note = fx_flows_commentary(&inputs, &cfg).unwrap();
        assert!(note.text.starts_with("Latest Net FX position: 0.70 B ZMW"));
        assert!(note.text.contains("primarily driven by Mines"));
    }

    #[test]
    fn test_fx_flows_missing_column_is_an_error() {
        let cfg = EngineConfig::default();
        let only = growing(INFLOW_SLUGS[0], 100.0, 0.0);
        assert!(fx_flows_commentary(&[&only], &cfg).is_err());
    }

    #[test]
    fn test_bills_commentary_names_dominant_tenor() {
        let cfg = EngineConfig::default();
        let sales = growing("tbill_sales_total", 1000.0, 0.10);
        let stock = growing("tbill_outstanding_total", 5000.0, -0.05);
        let tenors: Vec<IndicatorSeries> = BILL_SALES_SLUGS
            .iter()
            .zip([100.0, 200.0, 300.0, 400.0])
            .map(|(slug, base)| growing(slug, base, 0.0))
            .collect();
        let tenor_refs: Vec<&IndicatorSeries> = tenors.iter().collect();

        let note = bills_commentary(&sales, &stock, &tenor_refs, &cfg);
        assert_eq!(
            note.text,
            "Total T-Bill sales changed 10.00% YoY, with outstanding balances changing -5.00% YoY. \
             The 364-day tenor dominates recent issuance."
        );

        // No tenor breakdown: the YoY sentence stands alone
        let note = bills_commentary(&sales, &stock, &[], &cfg);
        assert!(note.text.ends_with("changing -5.00% YoY."));

        let short = IndicatorSeries::from_values("tbill_sales_total", start(), &[1.0]);
        assert!(bills_commentary(&short, &stock, &tenor_refs, &cfg).text.starts_with("Data unavailable"));
    }

    #[test]
    fn test_bill_rates_commentary() {
        let cfg = EngineConfig::default();
        let yields = growing("tbill_weighted_yield", 12.0, 0.25);
        assert_eq!(
            bill_rates_commentary(&yields, &cfg).text,
            "Weighted average T-Bill yields changed 25.00% YoY, indicating market cost of short-term funding."
        );
    }

    #[test]
    fn test_bonds_commentary_names_largest_tenor() {
        let cfg = EngineConfig::default();
        let stocks: Vec<IndicatorSeries> = BOND_STOCK_SLUGS
            .iter()
            .zip([100.0, 100.0, 100.0, 100.0, 500.0, 100.0])
            .map(|(slug, base)| growing(slug, base, 0.10))
            .collect();
        let refs: Vec<&IndicatorSeries> = stocks.iter().collect();

        let note = bonds_commentary(&refs, &cfg).unwrap();
        assert_eq!(note.topic, "bonds");
        assert_eq!(
            note.text,
            "Total government bond stock changed 10.00% YoY. \
             The 10-year tenor represents the largest portion of outstanding bonds."
        );
        assert!(bonds_commentary(&refs[..3], &cfg).is_err());
    }

    #[test]
    fn test_copper_and_oil_commentary() {
        let cfg = EngineConfig::default();
        let copper = growing("copper", 8000.0, -0.05);
        let text = copper_commentary(&copper, &cfg).text;
        assert!(text.starts_with(
            "Copper prices averaged USD 7,600 per tonne in January 2024. Prices are lower by 5.0% year-on-year"
        ));

        let oil = IndicatorSeries::from_values("oil", start(), &[80.0, 84.0]);
        let text = oil_commentary(&oil, &cfg).text;
        assert!(text.starts_with(
            "Global oil prices stood at USD 84.00 per barrel in February 2023. Month-on-month prices moved +5.0%"
        ));

        let one = IndicatorSeries::from_values("oil", start(), &[80.0]);
        assert!(oil_commentary(&one, &cfg).text.starts_with("Data unavailable"));
    }

    #[test]
    fn test_maize_closing_follows_stress_direction() {
        let cfg = EngineConfig::default();
        let rising = growing("maize", 200.0, 0.15);
        let text = maize_commentary(&rising, &cfg).text;
        assert!(text.starts_with(
            "Maize prices averaged ZMW 230.00 per 50kg bag in January 2024. Prices are up 15.0% year-on-year"
        ));
        assert!(text.ends_with("Elevated maize prices increase risks to food inflation and household welfare."));

        let falling = growing("maize", 200.0, -0.10);
        let text = maize_commentary(&falling, &cfg).text;
        assert!(text.contains("Prices are down 10.0% year-on-year"));
        assert!(text.ends_with("Easing maize prices relieve pressure on food inflation and household welfare."));
    }

    #[test]
    fn test_fx_summary_direction() {
        let cfg = EngineConfig::default();
        let rate = IndicatorSeries::from_values("usd_zmw", start(), &[20.0, 19.0]);
        assert_eq!(
            fx_summary(&rate, &cfg).text,
            "As of Feb 2023, the ZMW vs USD stands at 19.00. Compared to last month the ZMW strengthened by 5.00%."
        );

        let weaker = IndicatorSeries::from_values("usd_zmw", start(), &[20.0, 21.0]);
        assert!(fx_summary(&weaker, &cfg).text.ends_with("the ZMW weakened by 5.00%."));

        let single = IndicatorSeries::from_values("usd_zmw", start(), &[20.0]);
        assert!(fx_summary(&single, &cfg).text.ends_with("the ZMW remained stable."));

        let empty = IndicatorSeries::new("usd_zmw", Vec::new());
        assert!(fx_summary(&empty, &cfg).text.starts_with("Data unavailable"));
    }

    #[test]
    fn test_inflation_summary() {
        let annual = IndicatorSeries::from_values("inflation_annual", start(), &[12.0, 12.6]);
        assert_eq!(
            inflation_summary(&annual).text,
            "As of Feb 2023, headline inflation is 12.60%. Month-on-month change: 0.60%."
        );

        let gap = IndicatorSeries::monthly("inflation_annual", start(), &[None, Some(12.6)]);
        assert!(inflation_summary(&gap).text.ends_with("Month-on-month change: n/a."));
    }

    #[test]
    fn test_commodities_summary_lists_every_price() {
        let cfg = EngineConfig::default();
        let copper = IndicatorSeries::from_values("copper", start(), &[8000.0, 8100.5]);
        let oil = IndicatorSeries::from_values("oil", start(), &[70.0, 75.25]);
        let maize = IndicatorSeries::from_values("maize", start(), &[230.0]);

        let note = commodities_summary(&[&copper, &oil, &maize], &cfg);
        assert_eq!(
            note.text,
            "As of Feb 2023, commodity prices are:\n\
             - Copper: $8100.50/t\n\
             - Oil: $75.25/barrel\n\
             - Maize: ZMW 230.00 per 50kg"
        );
        assert!(commodities_summary(&[], &cfg).text.starts_with("Data unavailable"));
    }
}
