use super::signed;
use crate::config::NarrativeConfig;
use crate::indicators::registry::Registry;
use crate::models::{Band, SignalReport};
use serde::Serialize;

/// Traffic-light readings the headline paragraph is built from.
#[derive(Debug, Clone, Copy)]
pub struct HeadlineInputs<'a> {
    pub fx: &'a SignalReport,
    pub inflation: &'a SignalReport,
    pub liquidity: &'a SignalReport,
    pub fiscal: &'a SignalReport,
    pub external: &'a SignalReport,
    pub copper: &'a SignalReport,
    pub oil: &'a SignalReport,
    /// Latest policy rate; adds a closing policy sentence when present.
    pub policy_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineDetail {
    pub indicator: String,
    pub commentary: String,
    pub mom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub paragraph: String,
    pub details: Vec<HeadlineDetail>,
}

fn unavailable(report: &SignalReport) -> String {
    format!("{} data unavailable", Registry::display_name(&report.indicator))
}

fn fx_sentence(r: &SignalReport, n: &NarrativeConfig) -> String {
    let mom = signed(r.metrics.mom);
    match r.status {
        Some(Band::Red) => format!(
            "The {} experienced significant depreciation ({}% MoM), reflecting elevated FX market pressures",
            n.currency_name, mom
        ),
        Some(Band::Amber) => format!(
            "The {} traded with moderate depreciation ({}% MoM) amid seasonal FX demand",
            n.currency_name, mom
        ),
        Some(Band::Green) => format!("FX conditions remained broadly stable ({}% MoM)", mom),
        None => unavailable(r),
    }
}

fn inflation_sentence(r: &SignalReport) -> String {
    let value = r.metrics.value.unwrap_or_default();
    let mom = signed(r.metrics.mom);
    match r.status {
        Some(Band::Red) => format!(
            "Inflation remains elevated at {:.1}%, above the central bank target, with {}% MoM pressure",
            value, mom
        ),
        Some(Band::Amber) => format!(
            "Inflation slightly exceeds target at {:.1}%, with persistent MoM price pressures ({}%)",
            value, mom
        ),
        Some(Band::Green) => format!(
            "Inflation is within target at {:.1}%, with MoM trends easing ({}%)",
            value, mom
        ),
        None => unavailable(r),
    }
}

fn liquidity_sentence(r: &SignalReport) -> String {
    let mom = signed(r.metrics.mom);
    match r.status {
        Some(Band::Red) => format!(
            "Banking system liquidity remains strained, with total reserves changing {}% MoM",
            mom
        ),
        Some(Band::Amber) => format!(
            "Liquidity conditions are somewhat tight, total reserves moved {}% MoM",
            mom
        ),
        Some(Band::Green) => format!("Liquidity is broadly stable, total reserves changed {}% MoM", mom),
        None => unavailable(r),
    }
}

fn fiscal_sentence(r: &SignalReport) -> String {
    let mom = signed(r.metrics.mom);
    match r.status {
        Some(Band::Red) => format!(
            "Fiscal operations show high pressure, with T-bills sales increasing {}% MoM",
            mom
        ),
        Some(Band::Amber) => format!("Fiscal position is moderately tight, T-bills sales moved {}% MoM", mom),
        Some(Band::Green) => format!("Fiscal flows remain manageable, T-bills sales changed {}% MoM", mom),
        None => unavailable(r),
    }
}

fn external_sentence(r: &SignalReport, n: &NarrativeConfig) -> String {
    let level = format!(
        "gross reserves {:.1} B {} ({}% MoM)",
        r.metrics.value.unwrap_or_default(),
        n.currency_code,
        signed(r.metrics.mom)
    );
    match r.status {
        Some(Band::Red) => format!("External sector under significant pressure, {}", level),
        Some(Band::Amber) => format!("External sector shows moderate stress, {}", level),
        Some(Band::Green) => format!("External sector is stable, {}", level),
        None => unavailable(r),
    }
}

fn commodity_sentence(r: &SignalReport, name: &str) -> String {
    let mom = signed(r.metrics.mom);
    match r.status {
        Some(Band::Red) => format!("{} prices show significant volatility, changing {}% MoM", name, mom),
        Some(Band::Amber) => format!("{} prices moderately volatile, MoM change {}%", name, mom),
        Some(Band::Green) => format!("{} prices remain stable, MoM change {}%", name, mom),
        None => unavailable(r),
    }
}

/// One paragraph covering every gauge, plus the per-indicator sentences.
pub fn macro_headline(inputs: &HeadlineInputs<'_>, narrative: &NarrativeConfig) -> Headline {
    let mut details = vec![
        ("FX", fx_sentence(inputs.fx, narrative), inputs.fx.metrics.mom),
        ("Inflation", inflation_sentence(inputs.inflation), inputs.inflation.metrics.mom),
        ("Liquidity", liquidity_sentence(inputs.liquidity), inputs.liquidity.metrics.mom),
        ("Fiscal", fiscal_sentence(inputs.fiscal), inputs.fiscal.metrics.mom),
        ("External", external_sentence(inputs.external, narrative), inputs.external.metrics.mom),
        ("Copper", commodity_sentence(inputs.copper, "Copper"), inputs.copper.metrics.mom),
        ("Oil", commodity_sentence(inputs.oil, "Oil"), inputs.oil.metrics.mom),
    ];

    if let Some(rate) = inputs.policy_rate {
        details.push((
            "Policy",
            format!(
                "Monetary policy remains accommodative with {} policy rate at {:.2}%",
                narrative.central_bank, rate
            ),
            None,
        ));
    }

    let sentences: Vec<&str> = details.iter().map(|(_, text, _)| text.as_str()).collect();
    let paragraph = format!("{}.", sentences.join(". "));

    Headline {
        paragraph,
        details: details
            .into_iter()
            .map(|(indicator, commentary, mom)| HeadlineDetail {
                indicator: indicator.to_string(),
                commentary,
                mom,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalMetrics;

    fn reading(indicator: &str, status: Option<Band>, value: f64, mom: f64) -> SignalReport {
        SignalReport {
            indicator: indicator.to_string(),
            status,
            commentary: String::new(),
            confidence: None,
            metrics: SignalMetrics { value: Some(value), mom: Some(mom), ..Default::default() },
        }
    }

    #[test]
    fn test_headline_paragraph() {
        let fx = reading("fx", Some(Band::Red), 27.0, 4.5);
        let inflation = reading("inflation", Some(Band::Amber), 9.4, 0.3);
        let liquidity = reading("liquidity", Some(Band::Green), 5000.0, 1.2);
        let fiscal = reading("fiscal", Some(Band::Green), 900.0, -3.0);
        let external = reading("external", Some(Band::Amber), 4.3, -0.8);
        let copper = reading("copper", None, 0.0, 0.0);
        let oil = reading("oil", Some(Band::Green), 65.0, 1.0);

        let inputs = HeadlineInputs {
            fx: &fx,
            inflation: &inflation,
            liquidity: &liquidity,
            fiscal: &fiscal,
            external: &external,
            copper: &copper,
            oil: &oil,
            policy_rate: Some(14.5),
        };
        let headline = macro_headline(&inputs, &NarrativeConfig::default());

        assert!(headline.paragraph.starts_with("The Kwacha experienced significant depreciation (+4.50% MoM)"));
        assert!(headline.paragraph.contains("Inflation slightly exceeds target at 9.4%"));
        assert!(headline.paragraph.contains("gross reserves 4.3 B ZMW (-0.80% MoM)"));
        assert!(headline.paragraph.contains("Copper data unavailable"));
        assert!(headline.paragraph.ends_with("BoZ policy rate at 14.50%."));
        assert_eq!(headline.details.len(), 8);
        assert_eq!(headline.details[0].indicator, "FX");
        assert_eq!(headline.details[0].mom, Some(4.5));
    }

    #[test]
    fn test_headline_without_policy() {
        let green = reading("fx", Some(Band::Green), 1.0, -0.2);
        let inputs = HeadlineInputs {
            fx: &green,
            inflation: &green,
            liquidity: &green,
            fiscal: &green,
            external: &green,
            copper: &green,
            oil: &green,
            policy_rate: None,
        };
        let headline = macro_headline(&inputs, &NarrativeConfig::default());
        assert_eq!(headline.details.len(), 7);
        assert!(headline.paragraph.starts_with("FX conditions remained broadly stable (-0.20% MoM)."));
        assert!(headline.paragraph.ends_with("MoM change -0.20%."));
    }
}
