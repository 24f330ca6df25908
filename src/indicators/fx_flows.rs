use super::{check_inputs, row_sum, CalculatedIndicator};
use crate::core::timeseries::{align_series_multi, JoinMethod};
use crate::error::EngineError;
use crate::models::{IndicatorSeries, Observation};

pub const INFLOW_SLUGS: [&str; 4] = [
    "fx_inflows_mines",
    "fx_inflows_other_non_grz",
    "fx_inflows_mining_taxes",
    "fx_inflows_donor",
];

pub const OUTFLOW_SLUGS: [&str; 4] = [
    "fx_outflows_dealing_net_sales",
    "fx_outflows_other_non_grz",
    "fx_outflows_debt_servicing",
    "fx_outflows_other_uses",
];

/// Total central bank FX inflows minus total outflows.
pub struct NetFxFlow;

impl NetFxFlow {
    /// Per-row totals of the inflow and outflow columns, in that order.
    pub fn totals(
        &self,
        inputs: &[&IndicatorSeries],
    ) -> Result<(IndicatorSeries, IndicatorSeries), EngineError> {
        check_inputs(self, inputs)?;

        let split = INFLOW_SLUGS.len();
        let rows = align_series_multi(inputs, JoinMethod::Inner);

        let inflows = rows
            .iter()
            .map(|r| Observation::new(r.date, row_sum(&r.values[..split])))
            .collect();
        let outflows = rows
            .iter()
            .map(|r| Observation::new(r.date, row_sum(&r.values[split..])))
            .collect();

        Ok((
            IndicatorSeries::new("fx_inflows_total", inflows),
            IndicatorSeries::new("fx_outflows_total", outflows),
        ))
    }
}

impl CalculatedIndicator for NetFxFlow {
    fn slug(&self) -> &str {
        "net_fx_flow"
    }
    fn name(&self) -> &str {
        "Net FX Flow"
    }
    fn required_inputs(&self) -> Vec<&str> {
        INFLOW_SLUGS.iter().chain(OUTFLOW_SLUGS.iter()).copied().collect()
    }
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError> {
        let (inflows, outflows) = self.totals(inputs)?;

        let points = inflows
            .points()
            .iter()
            .zip(outflows.points())
            .map(|(i, o)| {
                let net = match (i.value, o.value) {
                    (Some(i), Some(o)) => Some(i - o),
                    _ => None,
                };
                Observation::new(i.date, net)
            })
            .collect();

        Ok(IndicatorSeries::new(self.slug(), points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_net_flow_skips_missing_columns() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut series: Vec<IndicatorSeries> = INFLOW_SLUGS
            .iter()
            .chain(OUTFLOW_SLUGS.iter())
            .map(|slug| IndicatorSeries::from_values(*slug, start, &[10.0]))
            .collect();
        series[0] = IndicatorSeries::from_values(INFLOW_SLUGS[0], start, &[50.0]);
        series[7] = IndicatorSeries::monthly(OUTFLOW_SLUGS[3], start, &[None]);

        let inputs: Vec<&IndicatorSeries> = series.iter().collect();
        let net = NetFxFlow.calculate(&inputs).unwrap();
        // (50 + 30) - 30
        assert_eq!(net.latest_value(), Some(50.0));
    }
}
