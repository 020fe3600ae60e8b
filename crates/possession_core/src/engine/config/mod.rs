//! # Phase Configuration
//!
//! Tuning constants for phase resolution, with presets.
//!
//! ## Usage
//! ```rust
//! use possession_core::engine::config::PhaseConfig;
//!
//! let config = PhaseConfig::default();
//! let arcade = PhaseConfig::arcade();
//! assert!(arcade.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `POSSESSION_PROFILE`: select preset (`arcade`, `cautious`, anything else = default).
//!   Read only by [`PhaseConfig::from_env_or_default`]; the JSON API never consults it.

mod pass_thresholds;
mod shot_config;

pub use pass_thresholds::{PassBand, PassThresholds};
pub use shot_config::ShotConfig;

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{EngineError, Result};

/// Hard cap on decision iterations per phase
pub const DEFAULT_MAX_ITERATIONS: u32 = 15;

/// Half-width of the uniform jitter added to each edge
pub const DEFAULT_JITTER: f64 = 500.0;

/// Players considered for a back-line reset
pub const DEFAULT_BACK_LINE_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub max_iterations: u32,
    /// Jitter is drawn from `[-jitter, jitter)`
    pub jitter: f64,
    #[serde(default)]
    pub thresholds: PassThresholds,
    #[serde(default)]
    pub shot: ShotConfig,
    pub back_line_size: usize,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            jitter: DEFAULT_JITTER,
            thresholds: PassThresholds::default(),
            shot: ShotConfig::default(),
            back_line_size: DEFAULT_BACK_LINE_SIZE,
        }
    }
}

impl PhaseConfig {
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Shots convert more often and passes complete more easily
    pub fn arcade() -> Self {
        Self {
            thresholds: PassThresholds {
                safe_turnover_below: 400.0,
                reset_below: 800.0,
                ..PassThresholds::default()
            },
            shot: ShotConfig { midpoint: 1200.0, max_goal_probability: 0.95, ..ShotConfig::default() },
            ..Self::default()
        }
    }

    /// Harder to play through and to score
    pub fn cautious() -> Self {
        Self {
            thresholds: PassThresholds {
                safe_turnover_below: 600.0,
                reset_below: 1300.0,
                ..PassThresholds::default()
            },
            shot: ShotConfig { midpoint: 3000.0, steepness: 2.0, max_goal_probability: 0.8 },
            ..Self::default()
        }
    }

    pub fn from_profile(profile: &str) -> Self {
        match profile.trim().to_lowercase().as_str() {
            "arcade" => Self::arcade(),
            "cautious" => Self::cautious(),
            _ => Self::default(),
        }
    }

    /// Load from environment variable POSSESSION_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var("POSSESSION_PROFILE").unwrap_or_default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(EngineError::InvalidConfig("max_iterations must be at least 1".into()));
        }
        if !self.jitter.is_finite() || self.jitter <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "jitter must be positive and finite, got {}",
                self.jitter
            )));
        }
        if !self.thresholds.is_ordered() {
            return Err(EngineError::InvalidConfig(format!(
                "pass thresholds must be finite and ascending: {:?}",
                self.thresholds
            )));
        }
        if !self.shot.is_valid() {
            return Err(EngineError::InvalidConfig(format!("invalid shot model: {:?}", self.shot)));
        }
        if self.back_line_size == 0 {
            return Err(EngineError::InvalidConfig("back_line_size must be at least 1".into()));
        }
        Ok(())
    }
}
