use std::path::PathBuf;

use anyhow::Context;
use macrogauge_lib::core::sample::{DEFAULT_MONTHS, DEFAULT_SEED};
use macrogauge_lib::{build_macro_brief, generate_sample, init_tracing, load_config};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Optional config path as the first argument, otherwise ./macrogauge.toml if present
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path.as_deref()).context("failed to load engine configuration")?;

    let seed = match std::env::var("SAMPLE_SEED") {
        Ok(raw) => raw.parse().with_context(|| format!("SAMPLE_SEED is not a number: {raw}"))?,
        Err(_) => DEFAULT_SEED,
    };

    tracing::info!(seed, months = DEFAULT_MONTHS, "building brief from sample snapshot");
    let inputs = generate_sample(DEFAULT_MONTHS, seed);
    let brief = build_macro_brief(&inputs, &cfg).context("failed to build macro brief")?;

    let json = serde_json::to_string_pretty(&brief).context("failed to serialize brief")?;
    println!("{json}");
    Ok(())
}
