//! Tunable rule constants, loaded from TOML.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::rules::abilities::DEFAULT_POINT_BUY_BUDGET;

pub const DEFAULT_STARTING_GOLD: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub point_buy_budget: i32,
    /// Used when a class declares no starting wealth.
    pub default_starting_gold: f64,
    /// Races that receive the bonus feat at first level.
    pub bonus_feat_races: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            point_buy_budget: DEFAULT_POINT_BUY_BUDGET,
            default_starting_gold: DEFAULT_STARTING_GOLD,
            bonus_feat_races: vec!["human".to_string()],
        }
    }
}

impl RulesConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(text).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = fs::read_to_string(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&text)
    }

    pub fn grants_bonus_feat(&self, race_id: &str) -> bool {
        self.bonus_feat_races.iter().any(|r| r == race_id)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.point_buy_budget < 0 {
            return Err(CoreError::validation(format!(
                "point_buy_budget must not be negative, got {}",
                self.point_buy_budget
            )));
        }
        if !self.default_starting_gold.is_finite() || self.default_starting_gold < 0.0 {
            return Err(CoreError::validation(format!(
                "default_starting_gold must be a non-negative number, got {}",
                self.default_starting_gold
            )));
        }
        Ok(())
    }
}

/// Named point-buy budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointBuyPreset {
    Low,
    Standard,
    High,
    Epic,
}

impl PointBuyPreset {
    pub const ALL: [PointBuyPreset; 4] = [Self::Low, Self::Standard, Self::High, Self::Epic];

    pub fn budget(self) -> i32 {
        match self {
            Self::Low => 10,
            Self::Standard => 15,
            Self::High => 20,
            Self::Epic => 25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Standard => "standard",
            Self::High => "high",
            Self::Epic => "epic",
        }
    }
}

impl fmt::Display for PointBuyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointBuyPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| s.eq_ignore_ascii_case(p.as_str()))
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "unknown point-buy preset '{s}' (expected low, standard, high or epic)"
                ))
            })
    }
}

/// Accepts a preset name or a plain non-negative number.
pub fn parse_point_buy_budget(value: &str) -> Result<i32, CoreError> {
    if let Ok(n) = value.trim().parse::<i32>() {
        if n < 0 {
            return Err(CoreError::validation(format!(
                "point-buy budget must not be negative, got {n}"
            )));
        }
        return Ok(n);
    }
    value.trim().parse::<PointBuyPreset>().map(PointBuyPreset::budget)
}
