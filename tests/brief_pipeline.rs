use chrono::NaiveDate;
use macrogauge_lib::analysis::metrics;
use macrogauge_lib::analysis::regime::RecessionRisk;
use macrogauge_lib::core::sample::{DEFAULT_MONTHS, DEFAULT_SEED};
use macrogauge_lib::{build_macro_brief, generate_sample, load_config, Band, EngineConfig, IndicatorSeries, Observation};

#[test]
fn brief_is_deterministic_for_a_seed() {
    let cfg = EngineConfig::default();
    let a = build_macro_brief(&generate_sample(DEFAULT_MONTHS, DEFAULT_SEED), &cfg).unwrap();
    let b = build_macro_brief(&generate_sample(DEFAULT_MONTHS, DEFAULT_SEED), &cfg).unwrap();

    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn every_gauge_is_classified_on_the_sample() {
    let cfg = EngineConfig::default();
    let brief = build_macro_brief(&generate_sample(DEFAULT_MONTHS, DEFAULT_SEED), &cfg).unwrap();

    let names: Vec<&str> = brief.gauges.iter().map(|g| g.indicator.as_str()).collect();
    assert_eq!(
        names,
        vec!["fx", "inflation", "liquidity", "policy", "fiscal", "external", "copper", "oil"]
    );
    for gauge in &brief.gauges {
        assert!(gauge.status.is_some(), "{} unclassified", gauge.indicator);
        let confidence = gauge.confidence.unwrap();
        assert!((10..=95).contains(&confidence));
    }

    assert!(brief.fx_state.is_available());
    assert!(brief.inflation_state.is_available());
    assert!(brief.fx_stress.level.is_some());
    assert!(brief.fiscal_stress.regime.is_some());
    assert!(!brief.recession.degraded);
    assert!(brief.curve_regime.regime.is_some());
    assert_eq!(brief.curve_shape.points.len(), 10);
    assert_eq!(brief.as_of, NaiveDate::from_ymd_opt(2023, 12, 1));

    // Seven gauges plus the policy sentence
    assert_eq!(brief.headline.details.len(), 8);
    assert!(brief.headline.paragraph.ends_with('.'));
    let topics: Vec<&str> = brief.sectors.iter().map(|s| s.topic.as_str()).collect();
    assert_eq!(
        topics,
        vec![
            "money_supply", "liquidity", "reserves", "fx_flows", "bills", "bill_rates", "bonds", "copper",
            "oil", "maize"
        ]
    );
    assert!(brief.sectors.iter().all(|s| !s.text.starts_with("Data unavailable")));
    assert_eq!(brief.overview.len(), 3);
    assert!(brief.overview.iter().all(|s| s.text.starts_with("As of Dec 2023")));

    let derived: Vec<&str> = brief.derived.iter().map(|s| s.slug()).collect();
    assert_eq!(
        derived,
        vec!["term_spread", "curve_slope", "short_term_ratio", "issuance_pressure", "bond_stock", "net_fx_flow"]
    );
    assert!(brief.derived.iter().all(|s| s.len() == DEFAULT_MONTHS));
}

#[test]
fn brief_serializes_with_optional_fields() {
    let cfg = EngineConfig::default();
    let brief = build_macro_brief(&generate_sample(DEFAULT_MONTHS, DEFAULT_SEED), &cfg).unwrap();
    let json = serde_json::to_value(&brief).unwrap();

    assert!(json["gauges"].as_array().unwrap().len() == 8);
    assert!(json["fx_stress"]["history"].is_array());
    assert!(json["summary"]["text"].is_string());
    let status = json["gauges"][0]["status"].as_str().unwrap();
    assert!(["green", "amber", "red"].contains(&status));
}

#[test]
fn short_history_degrades_recession_score() {
    let cfg = EngineConfig::default();
    let brief = build_macro_brief(&generate_sample(5, DEFAULT_SEED), &cfg).unwrap();

    // Sample curve is upward sloping, so only the missing short-rate YoY is at play
    assert!(brief.recession.degraded);
    assert_eq!(brief.recession.band, RecessionRisk::Low);
    assert_eq!(brief.recession.short_rate_yoy, None);

    // Gauges still classify on level and MoM alone
    assert!(brief.gauges.iter().all(|g| g.status.is_some()));
    assert!(brief.fiscal_stress.index.is_none());
}

#[test]
fn yoy_is_positional_across_a_missing_month() {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    // Value equals the month index; June is missing from the table
    let points: Vec<Observation> = (0..14u32)
        .filter(|m| *m != 5)
        .map(|m| {
            let date = start.checked_add_months(chrono::Months::new(m)).unwrap();
            Observation::new(date, Some(m as f64))
        })
        .collect();
    let series = IndicatorSeries::new("inflation_annual", points);

    // Twelve rows back is thirteen calendar months back
    assert_eq!(metrics::yoy(&series.values()), Some(13.0));
}

#[test]
fn config_overrides_change_classification() {
    let cfg = EngineConfig::from_toml_str(
        r#"
        [policy_rate]
        green_max = 50.0
        amber_max = 60.0

        [narrative]
        currency_name = "Rand"
        "#,
    )
    .unwrap();
    assert_eq!(cfg.narrative.currency_code, "ZMW");

    let brief = build_macro_brief(&generate_sample(DEFAULT_MONTHS, DEFAULT_SEED), &cfg).unwrap();
    assert_eq!(brief.gauge("policy").unwrap().status, Some(Band::Green));

    let mentions_rand = brief.headline.paragraph.contains("Rand")
        || brief.what_changed.iter().any(|b| b.starts_with("Rand"));
    assert!(mentions_rand);
}

#[test]
fn non_monotonic_ladder_is_rejected() {
    let err = EngineConfig::from_toml_str(
        r#"
        [fiscal_stress]
        neutral_max = 2.0
        tightening_max = 1.0
        "#,
    );
    assert!(err.is_err());
}

#[test]
fn environment_overrides_a_threshold() {
    // The only test in this binary that touches MACROGAUGE__* variables
    std::env::set_var("MACROGAUGE__POLICY_RATE__GREEN_MAX", "8.5");
    let loaded = load_config(None);
    std::env::remove_var("MACROGAUGE__POLICY_RATE__GREEN_MAX");

    let cfg = loaded.unwrap();
    assert_eq!(cfg.policy_rate.green_max, 8.5);
    assert_eq!(cfg.policy_rate.amber_max, 10.0);
    assert_eq!(cfg.fx, EngineConfig::default().fx);
}
