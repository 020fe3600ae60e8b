//! Player snapshot used during a single phase

use serde::{Deserialize, Serialize};
use std::fmt;

use super::coordinates::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of a player for one phase of play.
///
/// `rating` is an open continuous scale; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePlayer {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    pub rating: f64,
    pub location: Coordinate,
}

impl PhasePlayer {
    pub fn new(id: u32, rating: f64, location: Coordinate) -> Self {
        Self { id: PlayerId(id), name: String::new(), rating, location }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Same player after the teams swap ends
    pub fn mirrored(&self) -> Self {
        Self { location: self.location.mirrored(), ..self.clone() }
    }
}

impl fmt::Display for PhasePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}
