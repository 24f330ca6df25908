//! Threshold configuration for every classifier in the engine.
//!
//! Defaults reproduce the production dashboard's cut points. A TOML file and
//! `MACROGAUGE__SECTION__FIELD` environment variables can override any field;
//! anything left unspecified keeps its default.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up in the working directory (`macrogauge.toml`).
pub const DEFAULT_CONFIG_NAME: &str = "macrogauge";
pub const ENV_PREFIX: &str = "MACROGAUGE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub standardization: StandardizationConfig,
    pub fx: FxConfig,
    pub inflation: InflationConfig,
    pub liquidity: LiquidityConfig,
    pub policy_rate: PolicyRateConfig,
    pub fiscal: FiscalConfig,
    pub external: ExternalConfig,
    pub commodities: CommodityConfig,
    pub fiscal_stress: FiscalStressConfig,
    pub fx_stress: FxStressConfig,
    pub recession: RecessionConfig,
    pub policy_stance: PolicyStanceConfig,
    pub yield_curve: YieldCurveConfig,
    pub fx_flow: FxFlowConfig,
    pub narrative: NarrativeConfig,
}

/// Z-score handling shared by all composite builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizationConfig {
    /// Components are clipped to `[-clip, clip]`.
    pub clip: f64,
    /// Substituted for zero standard deviations and zero denominators.
    pub epsilon: f64,
    pub rolling_window: usize,
}

impl Default for StandardizationConfig {
    fn default() -> Self {
        Self { clip: 3.0, epsilon: 1e-6, rolling_window: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    pub red_z: f64,
    pub red_combo_z: f64,
    pub red_combo_mom: f64,
    pub amber_z: f64,
    pub amber_mom: f64,
    /// 1-month % change upper bound of the amber gauge zone.
    pub gauge_amber_max: f64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            red_z: 2.0,
            red_combo_z: 1.5,
            red_combo_mom: 2.0,
            amber_z: 1.0,
            amber_mom: 1.0,
            gauge_amber_max: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationConfig {
    pub target: f64,
    pub band_low: f64,
    pub band_high: f64,
    pub red_level: f64,
    pub red_mom: f64,
    /// Gauge is amber up to `target + gauge_amber_margin`.
    pub gauge_amber_margin: f64,
    pub pressure_low: f64,
    pub pressure_high: f64,
}

impl Default for InflationConfig {
    fn default() -> Self {
        Self {
            target: 7.0,
            band_low: 6.0,
            band_high: 8.0,
            red_level: 12.0,
            red_mom: 0.4,
            gauge_amber_margin: 3.0,
            pressure_low: 6.0,
            pressure_high: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityConfig {
    /// MoM % change of reserves below which the gauge turns red.
    pub amber_floor: f64,
    /// First calendar year of the reserves window used by the liquidity commentary.
    pub history_start_year: i32,
}

impl Default for LiquidityConfig {
    fn default() -> Self {
        Self { amber_floor: -5.0, history_start_year: 2016 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyRateConfig {
    pub green_max: f64,
    pub amber_max: f64,
}

impl Default for PolicyRateConfig {
    fn default() -> Self {
        Self { green_max: 7.0, amber_max: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalConfig {
    /// T-bill sales / opening balance.
    pub amber_ratio: f64,
    pub red_ratio: f64,
}

impl Default for FiscalConfig {
    fn default() -> Self {
        Self { amber_ratio: 0.2, red_ratio: 0.4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    /// Divisor converting raw reserves (millions) into billions.
    pub scale: f64,
    pub green_min: f64,
    pub amber_min: f64,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self { scale: 1e3, green_min: 5.0, amber_min: 4.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommodityConfig {
    pub copper_base: f64,
    pub copper_amber_factor: f64,
    pub oil_base: f64,
    pub oil_amber_factor: f64,
}

impl Default for CommodityConfig {
    fn default() -> Self {
        Self {
            copper_base: 8000.0,
            copper_amber_factor: 0.9,
            oil_base: 70.0,
            oil_amber_factor: 1.1,
        }
    }
}

/// Regime ladder; each bound is inclusive on the upper side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalStressConfig {
    pub accommodative_max: f64,
    pub neutral_max: f64,
    pub tightening_max: f64,
    pub stressed_max: f64,
    pub yield_lag: usize,
    pub issuance_window: usize,
}

impl Default for FiscalStressConfig {
    fn default() -> Self {
        Self {
            accommodative_max: -0.5,
            neutral_max: 0.5,
            tightening_max: 1.5,
            stressed_max: 2.5,
            yield_lag: 12,
            issuance_window: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxStressWeights {
    pub price: f64,
    pub volatility: f64,
    pub momentum: f64,
    pub reserves: f64,
}

impl Default for FxStressWeights {
    fn default() -> Self {
        Self { price: 0.35, volatility: 0.25, momentum: 0.25, reserves: 0.15 }
    }
}

impl FxStressWeights {
    pub fn total(&self) -> f64 {
        self.price + self.volatility + self.momentum + self.reserves
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxStressConfig {
    pub weights: FxStressWeights,
    pub elevated: f64,
    pub severe: f64,
    pub window: usize,
}

impl Default for FxStressConfig {
    fn default() -> Self {
        Self { weights: FxStressWeights::default(), elevated: 1.0, severe: 2.0, window: 12 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecessionConfig {
    /// Term spread cut points, most inverted first.
    pub deep_inversion: f64,
    pub moderate_inversion: f64,
    pub deep_score: f64,
    pub moderate_score: f64,
    pub shallow_score: f64,
    pub duration_window: usize,
    pub long_duration: f64,
    pub short_duration: f64,
    pub short_duration_score: f64,
    pub short_rate_lag: usize,
    pub high_pressure: f64,
    pub mid_pressure: f64,
    pub mid_pressure_score: f64,
    pub depth_weight: f64,
    pub duration_weight: f64,
    pub policy_weight: f64,
    pub high_band: f64,
    pub elevated_band: f64,
    pub moderate_band: f64,
}

impl Default for RecessionConfig {
    fn default() -> Self {
        Self {
            deep_inversion: -1.0,
            moderate_inversion: -0.5,
            deep_score: 1.0,
            moderate_score: 0.7,
            shallow_score: 0.4,
            duration_window: 6,
            long_duration: 4.0,
            short_duration: 2.0,
            short_duration_score: 0.6,
            short_rate_lag: 12,
            high_pressure: 30.0,
            mid_pressure: 15.0,
            mid_pressure_score: 0.5,
            depth_weight: 0.4,
            duration_weight: 0.4,
            policy_weight: 0.2,
            high_band: 60.0,
            elevated_band: 40.0,
            moderate_band: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyStanceConfig {
    pub tight_short_yoy: f64,
    pub neutral_spread: f64,
    pub neutral_short_yoy: f64,
}

impl Default for PolicyStanceConfig {
    fn default() -> Self {
        Self { tight_short_yoy: 20.0, neutral_spread: 0.5, neutral_short_yoy: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldCurveConfig {
    /// Short-minus-long slope above which the curve counts as inverted.
    pub inverted_slope: f64,
    /// Short-minus-long slope at or below which the curve is normal.
    pub normal_slope: f64,
    /// Long-minus-short tolerance for the cross-section shape reading.
    pub shape_tolerance: f64,
}

impl Default for YieldCurveConfig {
    fn default() -> Self {
        Self { inverted_slope: 0.5, normal_slope: -0.5, shape_tolerance: 0.25 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxFlowConfig {
    pub pressure: f64,
    pub relief: f64,
}

impl Default for FxFlowConfig {
    fn default() -> Self {
        Self { pressure: 0.5, relief: -0.3 }
    }
}

/// Names used when rendering sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub currency_name: String,
    pub currency_code: String,
    pub central_bank: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            currency_name: "Kwacha".to_string(),
            currency_code: "ZMW".to_string(),
            central_bank: "BoZ".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document on top of the defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let cfg: EngineConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects ladders whose cut points would overlap or invert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.standardization;
        if s.clip.is_nan() || s.clip <= 0.0 || s.epsilon.is_nan() || s.epsilon <= 0.0 || s.rolling_window < 2 {
            return Err(ConfigError::ValidationError(
                "standardization needs clip > 0, epsilon > 0 and rolling_window >= 2".to_string(),
            ));
        }

        ascending("fx amber/red z", &[self.fx.amber_z, self.fx.red_z])?;
        ascending(
            "inflation band",
            &[self.inflation.band_low, self.inflation.band_high, self.inflation.red_level],
        )?;
        ascending(
            "inflation pressure",
            &[self.inflation.pressure_low, self.inflation.pressure_high],
        )?;
        ascending("policy rate", &[self.policy_rate.green_max, self.policy_rate.amber_max])?;
        ascending("fiscal ratio", &[self.fiscal.amber_ratio, self.fiscal.red_ratio])?;
        ascending("external reserves", &[self.external.amber_min, self.external.green_min])?;
        if self.external.scale == 0.0 {
            return Err(ConfigError::ValidationError("external.scale must be non-zero".to_string()));
        }

        let fs = &self.fiscal_stress;
        ascending(
            "fiscal stress regimes",
            &[fs.accommodative_max, fs.neutral_max, fs.tightening_max, fs.stressed_max],
        )?;
        if fs.issuance_window == 0 || fs.yield_lag == 0 {
            return Err(ConfigError::ValidationError(
                "fiscal_stress windows must be positive".to_string(),
            ));
        }

        let fx = &self.fx_stress;
        ascending("fx stress bands", &[fx.elevated, fx.severe])?;
        weights_sum_to_one("fx_stress.weights", fx.weights.total())?;
        if fx.window < 2 {
            return Err(ConfigError::ValidationError("fx_stress.window must be >= 2".to_string()));
        }

        let r = &self.recession;
        ascending("recession depth", &[r.deep_inversion, r.moderate_inversion, 0.0])?;
        ascending("recession duration", &[r.short_duration, r.long_duration])?;
        ascending("recession policy pressure", &[r.mid_pressure, r.high_pressure])?;
        ascending("recession bands", &[r.moderate_band, r.elevated_band, r.high_band])?;
        weights_sum_to_one(
            "recession weights",
            r.depth_weight + r.duration_weight + r.policy_weight,
        )?;
        if r.duration_window == 0 || r.short_rate_lag == 0 {
            return Err(ConfigError::ValidationError(
                "recession windows must be positive".to_string(),
            ));
        }

        ascending("yield curve slope", &[self.yield_curve.normal_slope, self.yield_curve.inverted_slope])?;
        ascending("fx flow", &[self.fx_flow.relief, self.fx_flow.pressure])?;

        Ok(())
    }
}

fn ascending(name: &str, cuts: &[f64]) -> Result<(), ConfigError> {
    if cuts.iter().any(|c| !c.is_finite()) || cuts.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ConfigError::ValidationError(format!(
            "{} cut points must be finite and strictly increasing: {:?}",
            name, cuts
        )));
    }
    Ok(())
}

fn weights_sum_to_one(name: &str, total: f64) -> Result<(), ConfigError> {
    if (total - 1.0).abs() > 1e-9 {
        return Err(ConfigError::ValidationError(format!(
            "{} must sum to 1.0, got {:.4}",
            name, total
        )));
    }
    Ok(())
}

/// Loads configuration from `path` (required) or `macrogauge.toml` in the
/// working directory (optional), then applies `MACROGAUGE__*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: EngineConfig = settings.try_deserialize()?;
    cfg.validate()?;

    tracing::debug!(?path, "engine configuration loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.inflation.target, 7.0);
        assert!((cfg.fx_stress.weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_toml_overrides_keep_other_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [inflation]
            target = 5.0
            band_low = 4.0
            band_high = 6.0

            [narrative]
            currency_name = "Rand"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.inflation.target, 5.0);
        assert_eq!(cfg.inflation.band_high, 6.0);
        assert_eq!(cfg.inflation.red_level, 12.0);
        assert_eq!(cfg.narrative.currency_name, "Rand");
        assert_eq!(cfg.fx, FxConfig::default());
    }

    #[test]
    fn test_non_monotonic_ladder_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [fiscal_stress]
            neutral_max = 2.0
            tightening_max = 1.5
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut cfg = EngineConfig::default();
        cfg.fx_stress.weights.reserves = 0.5;
        assert!(cfg.validate().is_err());
    }
}
