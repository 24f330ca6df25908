use crate::analysis::signals::{FxCondition, FxFlowSignal, InflationPressure};
use crate::analysis::metrics::TrendLevel;
use crate::config::NarrativeConfig;
use crate::models::{Band, SignalReport};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosingSummary {
    /// Indicators currently in the red band.
    pub risks: Vec<String>,
    pub text: String,
}

/// Names every red indicator, or reports risks as contained.
pub fn closing_summary(reports: &[SignalReport]) -> ClosingSummary {
    let risks: Vec<String> = reports
        .iter()
        .filter(|r| r.status == Some(Band::Red))
        .map(|r| r.indicator.replace('_', " "))
        .collect();

    let text = if risks.is_empty() {
        "Risks remain broadly contained.".to_string()
    } else {
        format!(
            "Elevated risks observed in {}. Policy coordination remains critical.",
            risks.join(", ")
        )
    };

    ClosingSummary { risks, text }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One-line outlook from the FX flow direction and inflation pressure.
pub fn base_case(fx: Option<&FxFlowSignal>, inflation: Option<&InflationPressure>) -> String {
    let fx_view = fx.map(|s| match s.condition {
        FxCondition::Pressure => "gradual FX pressure",
        FxCondition::Relief => "improving FX conditions",
        FxCondition::Stable => "stable FX conditions",
    });
    let inflation_view = inflation.map(|p| match p.pressure {
        TrendLevel::High => "sticky inflation",
        TrendLevel::Moderate => "easing inflation",
        TrendLevel::Low => "contained inflation",
    });

    let parts: Vec<&str> = [fx_view, inflation_view].into_iter().flatten().collect();
    if parts.is_empty() {
        return "Data unavailable.".to_string();
    }
    format!("{}.", capitalize(&parts.join(", ")))
}

/// Month-on-month direction bullets for the currency and monthly inflation.
pub fn what_changed(
    fx: Option<&FxFlowSignal>,
    inflation: Option<&InflationPressure>,
    narrative: &NarrativeConfig,
) -> Vec<String> {
    let mut bullets = Vec::new();

    if let Some(fx) = fx {
        bullets.push(if fx.mom > 0.0 {
            format!("{} weakened on month-on-month basis", narrative.currency_name)
        } else {
            format!("{} stabilized compared to previous month", narrative.currency_name)
        });
    }

    if let Some(mom) = inflation.and_then(|p| p.mom) {
        bullets.push(if mom > 0.0 {
            "Monthly inflation accelerated".to_string()
        } else {
            "Monthly inflation eased".to_string()
        });
    }

    bullets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalMetrics;

    fn report(indicator: &str, status: Option<Band>) -> SignalReport {
        SignalReport {
            indicator: indicator.to_string(),
            status,
            commentary: String::new(),
            confidence: None,
            metrics: SignalMetrics::default(),
        }
    }

    fn fx(condition: FxCondition, mom: f64) -> FxFlowSignal {
        FxFlowSignal { level: 25.0, mom, condition }
    }

    fn inflation(pressure: TrendLevel, mom: Option<f64>) -> InflationPressure {
        InflationPressure { level: 12.0, mom, yoy: None, pressure }
    }

    #[test]
    fn test_closing_summary_lists_red_indicators() {
        let reports = vec![
            report("fx_stress", Some(Band::Red)),
            report("inflation", Some(Band::Amber)),
            report("fiscal_stress", Some(Band::Red)),
            report("copper", None),
        ];
        let summary = closing_summary(&reports);
        assert_eq!(summary.risks, vec!["fx stress", "fiscal stress"]);
        assert_eq!(
            summary.text,
            "Elevated risks observed in fx stress, fiscal stress. Policy coordination remains critical."
        );
    }

    #[test]
    fn test_closing_summary_contained() {
        let summary = closing_summary(&[report("fx", Some(Band::Green)), report("oil", None)]);
        assert!(summary.risks.is_empty());
        assert_eq!(summary.text, "Risks remain broadly contained.");
    }

    #[test]
    fn test_base_case() {
        let text = base_case(
            Some(&fx(FxCondition::Pressure, 1.2)),
            Some(&inflation(TrendLevel::High, Some(0.4))),
        );
        assert_eq!(text, "Gradual FX pressure, sticky inflation.");

        let text = base_case(None, Some(&inflation(TrendLevel::Low, None)));
        assert_eq!(text, "Contained inflation.");

        assert_eq!(base_case(None, None), "Data unavailable.");
    }

    #[test]
    fn test_what_changed() {
        let narrative = NarrativeConfig::default();
        let bullets = what_changed(
            Some(&fx(FxCondition::Relief, -0.8)),
            Some(&inflation(TrendLevel::Moderate, Some(0.3))),
            &narrative,
        );
        assert_eq!(
            bullets,
            vec!["Kwacha stabilized compared to previous month", "Monthly inflation accelerated"]
        );

        let bullets = what_changed(Some(&fx(FxCondition::Pressure, 2.0)), None, &narrative);
        assert_eq!(bullets, vec!["Kwacha weakened on month-on-month basis"]);
    }
}
