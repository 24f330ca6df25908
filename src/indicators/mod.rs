use crate::error::EngineError;
use crate::models::IndicatorSeries;

pub mod debt;
pub mod fx_flows;
pub mod registry;
pub mod yield_curve;

pub trait CalculatedIndicator {
    /// Returns the unique slug (e.g., "term_spread")
    fn slug(&self) -> &str;

    /// Returns the display name
    fn name(&self) -> &str;

    /// Slugs of the input series, in the order `calculate` expects them
    fn required_inputs(&self) -> Vec<&str>;

    /// Derive the indicator series from its inputs.
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError>;
}

/// Fails with `MissingInput` unless exactly the declared inputs were passed.
pub(crate) fn check_inputs<I>(indicator: &I, inputs: &[&IndicatorSeries]) -> Result<(), EngineError>
where
    I: CalculatedIndicator + ?Sized,
{
    let required = indicator.required_inputs();
    if inputs.len() != required.len() {
        return Err(EngineError::MissingInput {
            indicator: indicator.slug().to_string(),
            required: required.join(", "),
            expected: required.len(),
            actual: inputs.len(),
        });
    }
    Ok(())
}

/// Mean of the present values, `None` when every value is missing.
pub(crate) fn row_mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Sum of the present values, `None` when every value is missing.
pub(crate) fn row_sum(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum())
    }
}
