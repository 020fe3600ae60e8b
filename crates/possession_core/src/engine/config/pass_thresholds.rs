//! Pass value bands

use serde::{Deserialize, Serialize};

/// Outcome class of the best jittered pass option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassBand {
    /// Intercepted in a dangerous area; the opposition attacks
    Intercepted,
    /// Possession lost where the opposition can only start from the back
    SafeTurnover,
    /// Loose ball recovered by our own back line
    Reset,
    /// Pass reaches the receiver
    Completed,
}

/// Boundaries between the four bands. Each band is half-open `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassThresholds {
    /// Below this the pass is intercepted (default: 0)
    pub interception_below: f64,
    /// Below this possession is lost safely (default: 500)
    pub safe_turnover_below: f64,
    /// Below this the ball goes back to the defence (default: 1000)
    pub reset_below: f64,
}

impl Default for PassThresholds {
    fn default() -> Self {
        Self { interception_below: 0.0, safe_turnover_below: 500.0, reset_below: 1000.0 }
    }
}

impl PassThresholds {
    pub fn classify(&self, option: f64) -> PassBand {
        if option < self.interception_below {
            PassBand::Intercepted
        } else if option < self.safe_turnover_below {
            PassBand::SafeTurnover
        } else if option < self.reset_below {
            PassBand::Reset
        } else if option >= self.reset_below {
            PassBand::Completed
        } else {
            // NaN compares false everywhere
            PassBand::Intercepted
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.interception_below.is_finite()
            && self.safe_turnover_below.is_finite()
            && self.reset_below.is_finite()
            && self.interception_below <= self.safe_turnover_below
            && self.safe_turnover_below <= self.reset_below
    }
}
