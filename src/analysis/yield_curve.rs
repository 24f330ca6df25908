use crate::analysis::recession::YieldTable;
use crate::analysis::regime::CurveRegime;
use crate::config::EngineConfig;
use crate::core::timeseries::{align_series_multi, JoinMethod};
use crate::error::EngineError;
use crate::indicators::row_mean;
use crate::indicators::yield_curve::{CurveSlope, LONG_TENORS, SHORT_TENORS};
use crate::indicators::CalculatedIndicator;
use crate::models::IndicatorSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// Curve tenors in maturity order, with maturity in months.
pub const TENOR_MATURITIES: [(&str, u32); 10] = [
    ("yield_91d", 3),
    ("yield_182d", 6),
    ("yield_273d", 9),
    ("yield_364d", 12),
    ("yield_2y", 24),
    ("yield_3y", 36),
    ("yield_5y", 60),
    ("yield_7y", 84),
    ("yield_10y", 120),
    ("yield_15y", 180),
];

#[derive(Debug, Clone, Serialize)]
pub struct CurveRegimeReport {
    pub regime: Option<CurveRegime>,
    pub slope: Option<f64>,
    pub short_average: Option<f64>,
    pub long_average: Option<f64>,
    pub commentary: String,
}

/// Regime of the latest row from the short-minus-long slope.
pub fn curve_regime(table: &YieldTable, cfg: &EngineConfig) -> Result<CurveRegimeReport, EngineError> {
    let short: Vec<&IndicatorSeries> = SHORT_TENORS.iter().filter_map(|t| table.get(t)).collect();
    let long: Vec<&IndicatorSeries> = LONG_TENORS.iter().filter_map(|t| table.get(t)).collect();

    let (slope, short_average, long_average) = if short.len() == SHORT_TENORS.len() && long.len() == LONG_TENORS.len() {
        let inputs: Vec<&IndicatorSeries> = short.iter().chain(long.iter()).copied().collect();
        let slope = CurveSlope.calculate(&inputs)?.latest_value();

        let latest = align_series_multi(&inputs, JoinMethod::Inner).pop();
        let (s, l) = match latest {
            Some(row) => (row_mean(&row.values[..short.len()]), row_mean(&row.values[short.len()..])),
            None => (None, None),
        };
        (slope, s, l)
    } else {
        (None, None, None)
    };

    let regime = CurveRegime::classify(slope, &cfg.yield_curve);

    let commentary = match (regime, short_average, long_average) {
        (Some(regime), Some(s), Some(l)) => {
            let tail = match regime {
                CurveRegime::Inverted => {
                    "This configuration increases rollover risk and amplifies fiscal stress, \
                     especially where short-term issuance dominates."
                }
                CurveRegime::Flat => {
                    "This suggests uncertainty in market expectations and limited scope \
                     for cost-efficient debt terming."
                }
                CurveRegime::Normal => {
                    "This supports stable financing conditions and reduces short-term refinancing pressure."
                }
            };
            format!(
                "The yield curve is currently {}, with short-term yields averaging {:.2}% \
                 and long-term yields at {:.2}%. {}",
                regime.as_str().to_lowercase(),
                s,
                l,
                tail
            )
        }
        _ => "Data unavailable: yield curve regime needs both short and long tenors.".to_string(),
    };

    Ok(CurveRegimeReport { regime, slope, short_average, long_average, commentary })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    UpwardSloping,
    Flat,
    Inverted,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurvePoint {
    pub tenor: String,
    pub maturity_months: u32,
    pub yield_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveShapeReport {
    pub date: Option<NaiveDate>,
    pub points: Vec<CurvePoint>,
    pub shape: Option<CurveShape>,
    pub commentary: String,
}

/// Shape of the latest cross-section, from the longest minus the shortest quoted yield.
pub fn curve_shape(table: &YieldTable, cfg: &EngineConfig) -> CurveShapeReport {
    // 1. Latest date on which any tenor is quoted
    let date = TENOR_MATURITIES
        .iter()
        .filter_map(|(slug, _)| table.get(slug))
        .filter_map(|s| s.last_observed().map(|(d, _)| d))
        .max();

    let Some(date) = date else {
        return CurveShapeReport {
            date: None,
            points: Vec::new(),
            shape: None,
            commentary: "Insufficient data to determine the yield curve shape.".to_string(),
        };
    };

    // 2. Cross-section on that date, in maturity order
    let points: Vec<CurvePoint> = TENOR_MATURITIES
        .iter()
        .filter_map(|(slug, months)| {
            let series = table.get(slug)?;
            let value = series.points().iter().rev().find(|p| p.date == date)?.value?;
            Some(CurvePoint {
                tenor: crate::indicators::registry::Registry::display_name(slug),
                maturity_months: *months,
                yield_pct: value,
            })
        })
        .collect();

    let tol = cfg.yield_curve.shape_tolerance;
    let shape = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => {
            let slope = last.yield_pct - first.yield_pct;
            Some(if slope > tol {
                CurveShape::UpwardSloping
            } else if slope < -tol {
                CurveShape::Inverted
            } else {
                CurveShape::Flat
            })
        }
        _ => None,
    };

    let shape_comment = match shape {
        Some(CurveShape::UpwardSloping) => {
            "The yield curve is upward sloping (normal), indicating positive growth and moderate inflation expectations."
        }
        Some(CurveShape::Inverted) => {
            "The yield curve is inverted, signaling expectations of slowing growth or potential recession."
        }
        Some(CurveShape::Flat) => {
            "The yield curve is relatively flat, suggesting uncertainty in the economic outlook."
        }
        None => "Insufficient data to determine the yield curve shape.",
    };

    let quotes: Vec<String> = points
        .iter()
        .map(|p| format!("{}: {:.2}%", p.tenor, p.yield_pct))
        .collect();
    let commentary = format!(
        "As of {}, the yield curve shows: {}. {}",
        date.format("%b %Y"),
        quotes.join(", "),
        shape_comment
    );

    CurveShapeReport { date: Some(date), points, shape, commentary }
}
