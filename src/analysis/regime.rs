//! Step functions from a continuous reading to an ordinal label.
//!
//! Every classifier takes an `Option<f64>`; a missing or NaN input yields
//! `None`, never the least severe label.

use crate::config::{
    FiscalStressConfig, FxStressConfig, PolicyStanceConfig, RecessionConfig, YieldCurveConfig,
};
use crate::models::Band;
use serde::{Deserialize, Serialize};
use std::fmt;

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

macro_rules! labelled {
    ($ty:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// =============================================================================
// FISCAL STRESS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FiscalRegime {
    Accommodative,
    Neutral,
    Tightening,
    Stressed,
    Critical,
}

labelled!(FiscalRegime {
    Accommodative => "Accommodative",
    Neutral => "Neutral",
    Tightening => "Tightening",
    Stressed => "Stressed",
    Critical => "Critical",
});

impl FiscalRegime {
    /// Upper bounds are inclusive: exactly `0.5` is still Neutral.
    pub fn classify(index: Option<f64>, cfg: &FiscalStressConfig) -> Option<Self> {
        let x = defined(index)?;
        Some(if x <= cfg.accommodative_max {
            FiscalRegime::Accommodative
        } else if x <= cfg.neutral_max {
            FiscalRegime::Neutral
        } else if x <= cfg.tightening_max {
            FiscalRegime::Tightening
        } else if x <= cfg.stressed_max {
            FiscalRegime::Stressed
        } else {
            FiscalRegime::Critical
        })
    }

    pub fn is_elevated(&self) -> bool {
        *self >= FiscalRegime::Stressed
    }

    pub fn band(&self) -> Band {
        match self {
            FiscalRegime::Accommodative | FiscalRegime::Neutral => Band::Green,
            FiscalRegime::Tightening => Band::Amber,
            FiscalRegime::Stressed | FiscalRegime::Critical => Band::Red,
        }
    }
}

// =============================================================================
// FX STRESS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FxStressLevel {
    Stable,
    Elevated,
    Severe,
}

labelled!(FxStressLevel {
    Stable => "FX Stable",
    Elevated => "Elevated FX Pressure",
    Severe => "Severe FX Stress",
});

impl FxStressLevel {
    pub fn classify(index: Option<f64>, cfg: &FxStressConfig) -> Option<Self> {
        let x = defined(index)?;
        Some(if x >= cfg.severe {
            FxStressLevel::Severe
        } else if x >= cfg.elevated {
            FxStressLevel::Elevated
        } else {
            FxStressLevel::Stable
        })
    }

    pub fn band(&self) -> Band {
        match self {
            FxStressLevel::Stable => Band::Green,
            FxStressLevel::Elevated => Band::Amber,
            FxStressLevel::Severe => Band::Red,
        }
    }

    pub fn confidence(&self) -> u8 {
        match self {
            FxStressLevel::Stable => 90,
            FxStressLevel::Elevated => 70,
            FxStressLevel::Severe => 85,
        }
    }
}

// =============================================================================
// RECESSION RISK
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecessionRisk {
    Low,
    Moderate,
    Elevated,
    High,
}

labelled!(RecessionRisk {
    Low => "Low",
    Moderate => "Moderate",
    Elevated => "Elevated",
    High => "High",
});

impl RecessionRisk {
    pub fn classify(probability: Option<f64>, cfg: &RecessionConfig) -> Option<Self> {
        let p = defined(probability)?;
        Some(if p >= cfg.high_band {
            RecessionRisk::High
        } else if p >= cfg.elevated_band {
            RecessionRisk::Elevated
        } else if p >= cfg.moderate_band {
            RecessionRisk::Moderate
        } else {
            RecessionRisk::Low
        })
    }

    pub fn band(&self) -> Band {
        match self {
            RecessionRisk::Low => Band::Green,
            RecessionRisk::Moderate | RecessionRisk::Elevated => Band::Amber,
            RecessionRisk::High => Band::Red,
        }
    }
}

// =============================================================================
// POLICY STANCE
// =============================================================================

/// Not ordinal: the stance reads direction, not severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyStance {
    Accommodative,
    Neutral,
    Tight,
}

labelled!(PolicyStance {
    Accommodative => "Accommodative",
    Neutral => "Neutral",
    Tight => "Tight",
});

impl PolicyStance {
    pub fn classify(
        short_rate_yoy: Option<f64>,
        term_spread: Option<f64>,
        cfg: &PolicyStanceConfig,
    ) -> Option<Self> {
        let yoy = defined(short_rate_yoy)?;
        let spread = defined(term_spread)?;

        Some(if yoy > cfg.tight_short_yoy && spread < 0.0 {
            PolicyStance::Tight
        } else if spread.abs() < cfg.neutral_spread && yoy.abs() < cfg.neutral_short_yoy {
            PolicyStance::Neutral
        } else {
            PolicyStance::Accommodative
        })
    }

    pub fn signal(&self) -> &'static str {
        match self {
            PolicyStance::Tight => "Restrictive financial conditions with elevated recession risk.",
            PolicyStance::Neutral => "Balanced policy stance with no strong directional pressure.",
            PolicyStance::Accommodative => "Supportive policy stance aimed at stimulating growth.",
        }
    }
}

// =============================================================================
// YIELD CURVE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurveRegime {
    Normal,
    Flat,
    Inverted,
}

labelled!(CurveRegime {
    Normal => "Normal",
    Flat => "Flat",
    Inverted => "Inverted",
});

impl CurveRegime {
    /// `slope` is short-tenor average minus long-tenor average; positive is inverted.
    pub fn classify(slope: Option<f64>, cfg: &YieldCurveConfig) -> Option<Self> {
        let s = defined(slope)?;
        Some(if s > cfg.inverted_slope {
            CurveRegime::Inverted
        } else if s > cfg.normal_slope {
            CurveRegime::Flat
        } else {
            CurveRegime::Normal
        })
    }
}
