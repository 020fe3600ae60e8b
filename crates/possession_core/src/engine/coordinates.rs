//! Pitch coordinates
//!
//! Positions are normalized to the unit square:
//! - x: 0 = left touchline, 1 = right touchline
//! - y: 0 = one goal line, 1 = the other goal line
//!
//! Which goal line a team attacks is decided by
//! [`AttackDirection`](super::tactics::AttackDirection), not by the coordinate.

use serde::{Deserialize, Serialize};

/// Centre of the goal mouth on the x axis
pub const GOAL_CENTER_X: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate
    #[inline]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Bearing of `other` measured from the y axis.
    ///
    /// Returns 0.0 for coincident points.
    #[inline]
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        (other.x - self.x).atan2(other.y - self.y)
    }

    /// Half-turn reflection through the centre spot.
    ///
    /// This is the view of the same position after the teams swap ends.
    #[inline]
    pub fn mirrored(&self) -> Coordinate {
        Coordinate::new(1.0 - self.x, 1.0 - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
