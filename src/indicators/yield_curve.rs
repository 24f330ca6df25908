use super::{check_inputs, row_mean, CalculatedIndicator};
use crate::core::timeseries::{align_series, align_series_multi, JoinMethod};
use crate::error::EngineError;
use crate::models::{IndicatorSeries, Observation};

/// Tenors averaged into the short end of the curve.
pub const SHORT_TENORS: [&str; 4] = ["yield_91d", "yield_182d", "yield_273d", "yield_364d"];
/// Tenors averaged into the long end of the curve.
pub const LONG_TENORS: [&str; 4] = ["yield_5y", "yield_7y", "yield_10y", "yield_15y"];

/// 10-year bond yield minus 91-day bill yield.
pub struct TermSpread;

impl CalculatedIndicator for TermSpread {
    fn slug(&self) -> &str {
        "term_spread"
    }
    fn name(&self) -> &str {
        "Term Spread (10Y - 91D)"
    }
    fn required_inputs(&self) -> Vec<&str> {
        vec!["yield_10y", "yield_91d"]
    }
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError> {
        check_inputs(self, inputs)?;
        Ok(calculate_spread(inputs[0], inputs[1], self.slug()))
    }
}

/// Helper to calculate spread between two series (A - B)
fn calculate_spread(series_a: &IndicatorSeries, series_b: &IndicatorSeries, slug: &str) -> IndicatorSeries {
    // inner join keeps the rate table's rows; a gap in either tenor stays a gap
    let points = align_series(series_a, series_b, JoinMethod::Inner)
        .into_iter()
        .map(|(date, a, b)| {
            let spread = match (a, b) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            };
            Observation::new(date, spread)
        })
        .collect();

    IndicatorSeries::new(slug, points)
}

/// Short-end average minus long-end average. Positive means inverted.
pub struct CurveSlope;

impl CalculatedIndicator for CurveSlope {
    fn slug(&self) -> &str {
        "curve_slope"
    }
    fn name(&self) -> &str {
        "Yield Curve Slope (Short - Long)"
    }
    fn required_inputs(&self) -> Vec<&str> {
        SHORT_TENORS.iter().chain(LONG_TENORS.iter()).copied().collect()
    }
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError> {
        check_inputs(self, inputs)?;

        let split = SHORT_TENORS.len();
        let points = align_series_multi(inputs, JoinMethod::Inner)
            .into_iter()
            .map(|row| {
                let slope = match (row_mean(&row.values[..split]), row_mean(&row.values[split..])) {
                    (Some(short), Some(long)) => Some(short - long),
                    _ => None,
                };
                Observation::new(row.date, slope)
            })
            .collect();

        Ok(IndicatorSeries::new(self.slug(), points))
    }
}
