pub mod fiscal_stress;
pub mod fx_stress;
pub mod metrics;
pub mod recession;
pub mod regime;
pub mod signals;
pub mod statistics;
pub mod yield_curve;
