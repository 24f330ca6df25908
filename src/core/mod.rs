pub mod orchestrator;
pub mod sample;
pub mod timeseries;
