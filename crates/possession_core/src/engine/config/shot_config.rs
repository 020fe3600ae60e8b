//! Shot conversion model

use serde::{Deserialize, Serialize};

/// Goal probability as a function of the shot option value.
///
/// `p = max_goal_probability / (1 + (midpoint / option)^steepness)` for a
/// positive option, 0 otherwise. Non-decreasing in `option`; an infinite
/// option converts with `max_goal_probability`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotConfig {
    /// Option value with a 50% (before cap) conversion chance (default: 2000)
    pub midpoint: f64,
    /// Sharpness of the curve around the midpoint (default: 1.5)
    pub steepness: f64,
    /// Upper bound on conversion (default: 0.9)
    pub max_goal_probability: f64,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self { midpoint: 2000.0, steepness: 1.5, max_goal_probability: 0.9 }
    }
}

impl ShotConfig {
    pub fn goal_probability(&self, shot_option: f64) -> f64 {
        if shot_option.is_nan() || shot_option <= 0.0 {
            return 0.0;
        }

        let p = 1.0 / (1.0 + (self.midpoint / shot_option).powf(self.steepness));
        (p * self.max_goal_probability).clamp(0.0, 1.0)
    }

    pub fn is_valid(&self) -> bool {
        self.midpoint.is_finite()
            && self.midpoint > 0.0
            && self.steepness.is_finite()
            && self.steepness > 0.0
            && (0.0..=1.0).contains(&self.max_goal_probability)
    }
}
