pub mod analysis;
pub mod commentary;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod models;

pub use crate::config::{load_config, EngineConfig};
pub use crate::core::orchestrator::{build_macro_brief, MacroBrief, MacroSnapshotInputs};
pub use crate::core::sample::generate_sample;
pub use crate::error::{ConfigError, EngineError};
pub use crate::models::{Band, IndicatorSeries, Observation, SignalMetrics, SignalReport};

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("macrogauge_lib=info,macro_brief=info"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
