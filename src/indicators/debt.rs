use super::{check_inputs, row_sum, CalculatedIndicator};
use crate::analysis::statistics::{rolling_sum, safe_div};
use crate::core::timeseries::{align_series_multi, JoinMethod};
use crate::error::EngineError;
use crate::models::{IndicatorSeries, Observation};

/// Monthly T-bill sales by tenor, shortest first.
pub const BILL_SALES_SLUGS: [&str; 4] = ["tbill_sales_91d", "tbill_sales_182d", "tbill_sales_273d", "tbill_sales_364d"];

/// Government bond stock by tenor, shortest first.
pub const BOND_STOCK_SLUGS: [&str; 6] = ["bonds_2y", "bonds_3y", "bonds_5y", "bonds_7y", "bonds_10y", "bonds_15y"];

/// Rollover risk: share of the T-bill stock maturing within 182 days.
pub struct ShortTermRatio {
    pub epsilon: f64,
}

impl CalculatedIndicator for ShortTermRatio {
    fn slug(&self) -> &str {
        "short_term_ratio"
    }
    fn name(&self) -> &str {
        "Short-Term Debt Ratio"
    }
    fn required_inputs(&self) -> Vec<&str> {
        vec!["tbill_outstanding_91d", "tbill_outstanding_182d", "tbill_outstanding_total"]
    }
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError> {
        check_inputs(self, inputs)?;

        let points = align_series_multi(inputs, JoinMethod::Inner)
            .into_iter()
            .map(|row| {
                let ratio = row
                    .complete()
                    .map(|v| safe_div(v[0] + v[1], v[2], self.epsilon));
                Observation::new(row.date, ratio)
            })
            .collect();

        Ok(IndicatorSeries::new(self.slug(), points))
    }
}

/// Issuance intensity: trailing `window`-month T-bill sales over the outstanding stock.
pub struct IssuancePressure {
    pub window: usize,
    pub epsilon: f64,
}

impl CalculatedIndicator for IssuancePressure {
    fn slug(&self) -> &str {
        "issuance_pressure"
    }
    fn name(&self) -> &str {
        "T-Bill Issuance Pressure"
    }
    fn required_inputs(&self) -> Vec<&str> {
        vec!["tbill_sales_total", "tbill_outstanding_total"]
    }
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError> {
        check_inputs(self, inputs)?;

        // 1. Align sales and stock on the bills table's dates
        let rows = align_series_multi(inputs, JoinMethod::Inner);
        let sales: Vec<Option<f64>> = rows.iter().map(|r| r.values[0]).collect();

        // 2. Full trailing window of sales
        let issuance = rolling_sum(&sales, self.window, self.window);

        let points = rows
            .iter()
            .zip(issuance)
            .map(|(row, issued)| {
                let pressure = match (issued, row.values[1]) {
                    (Some(issued), Some(stock)) => Some(safe_div(issued, stock, self.epsilon)),
                    _ => None,
                };
                Observation::new(row.date, pressure)
            })
            .collect();

        Ok(IndicatorSeries::new(self.slug(), points))
    }
}

/// Total government bond stock: row sum of the present tenors.
pub struct BondStock;

impl CalculatedIndicator for BondStock {
    fn slug(&self) -> &str {
        "bond_stock"
    }
    fn name(&self) -> &str {
        "Total Bond Stock"
    }
    fn required_inputs(&self) -> Vec<&str> {
        BOND_STOCK_SLUGS.to_vec()
    }
    fn calculate(&self, inputs: &[&IndicatorSeries]) -> Result<IndicatorSeries, EngineError> {
        check_inputs(self, inputs)?;

        let points = align_series_multi(inputs, JoinMethod::Inner)
            .into_iter()
            .map(|row| Observation::new(row.date, row_sum(&row.values)))
            .collect();

        Ok(IndicatorSeries::new(self.slug(), points))
    }
}
