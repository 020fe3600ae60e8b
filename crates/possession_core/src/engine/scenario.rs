//! Phase scenarios
//!
//! A scenario is the raw snapshot of both teams: rosters plus shape
//! modifiers. It validates the snapshot and turns it into a
//! [`TacticalContext`] backed by [`FormationAttributes`].
//!
//! ```rust
//! use possession_core::engine::{AttackDirection, PhaseScenario, TeamSide};
//!
//! let scenario = PhaseScenario::four_four_two(7);
//! let ctx = scenario.context(TeamSide::Home, AttackDirection::TowardsOne).unwrap();
//! assert_eq!(ctx.attacking_players().len(), 11);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::context::TacticalContext;
use super::coordinates::Coordinate;
use super::player::PhasePlayer;
use super::tactics::{AttackDirection, FormationAttributes, TeamShape, TeamSide};
use crate::error::{EngineError, Result};

/// 4-4-2 slots for a team defending y = 0: (x, y, base rating)
const FOUR_FOUR_TWO: [(f64, f64, f64); 11] = [
    (0.50, 0.05, 68.0),
    (0.15, 0.25, 66.0),
    (0.38, 0.20, 72.0),
    (0.62, 0.20, 71.0),
    (0.85, 0.25, 65.0),
    (0.15, 0.48, 70.0),
    (0.38, 0.44, 74.0),
    (0.62, 0.44, 73.0),
    (0.85, 0.48, 69.0),
    (0.40, 0.68, 77.0),
    (0.60, 0.70, 75.0),
];

const DEMO_NAMES: [&str; 11] = [
    "Keeper", "Left Back", "Centre Back", "Centre Back", "Right Back", "Left Mid",
    "Centre Mid", "Centre Mid", "Right Mid", "Striker", "Striker",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseScenario {
    pub home_players: Vec<PhasePlayer>,
    pub away_players: Vec<PhasePlayer>,
    #[serde(default)]
    pub home_shape: TeamShape,
    #[serde(default)]
    pub away_shape: TeamShape,
}

impl PhaseScenario {
    pub fn new(home_players: Vec<PhasePlayer>, away_players: Vec<PhasePlayer>) -> Self {
        Self {
            home_players,
            away_players,
            home_shape: TeamShape::default(),
            away_shape: TeamShape::default(),
        }
    }

    pub fn with_shapes(mut self, home: TeamShape, away: TeamShape) -> Self {
        self.home_shape = home;
        self.away_shape = away;
        self
    }

    /// Two 4-4-2 sides, home defending y = 0 and away mirrored.
    ///
    /// `seed` nudges positions and ratings so repeated demos differ.
    pub fn four_four_two(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut side = |id_base: u32, mirror: bool, prefix: &str| -> Vec<PhasePlayer> {
            FOUR_FOUR_TWO
                .iter()
                .zip(DEMO_NAMES.iter())
                .enumerate()
                .map(|(i, (&(x, y, rating), name))| {
                    let location = Coordinate::new(
                        (x + rng.gen_range(-0.03..0.03)).clamp(0.0, 1.0),
                        (y + rng.gen_range(-0.03..0.03)).clamp(0.0, 1.0),
                    );
                    let location = if mirror { location.mirrored() } else { location };
                    PhasePlayer::new(id_base + i as u32, rating + rng.gen_range(-5.0..5.0), location)
                        .with_name(format!("{} {}", prefix, name))
                })
                .collect()
        };

        let home = side(1, false, "Home");
        let away = side(12, true, "Away");
        Self::new(home, away)
    }

    pub fn roster(&self, side: TeamSide) -> &[PhasePlayer] {
        match side {
            TeamSide::Home => &self.home_players,
            TeamSide::Away => &self.away_players,
        }
    }

    /// Non-empty rosters, finite values, unique ids across both teams
    pub fn validate(&self) -> Result<()> {
        for side in [TeamSide::Home, TeamSide::Away] {
            if self.roster(side).is_empty() {
                return Err(EngineError::InvalidRoster { side });
            }
        }

        self.home_shape.validate()?;
        self.away_shape.validate()?;

        let mut seen = HashSet::new();
        for player in self.home_players.iter().chain(self.away_players.iter()) {
            if !player.rating.is_finite() {
                return Err(EngineError::InvalidRequest(format!(
                    "player {} has a non-finite rating",
                    player.id
                )));
            }
            if !player.location.is_finite() {
                return Err(EngineError::InvalidRequest(format!(
                    "player {} has a non-finite location",
                    player.id
                )));
            }
            if !seen.insert(player.id) {
                return Err(EngineError::InvalidRequest(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
        }

        Ok(())
    }

    pub fn attributes(&self) -> Result<FormationAttributes> {
        FormationAttributes::new(
            &self.home_players,
            &self.away_players,
            self.home_shape,
            self.away_shape,
        )
    }

    /// Validated context for `side` attacking toward `direction`
    pub fn context(
        &self,
        side: TeamSide,
        direction: AttackDirection,
    ) -> Result<TacticalContext<FormationAttributes>> {
        self.validate()?;
        Ok(TacticalContext::new(
            side,
            direction,
            self.home_players.clone(),
            self.away_players.clone(),
            self.attributes()?,
        ))
    }

    /// Same snapshot after the teams swap ends and sides
    pub fn mirrored(&self) -> Self {
        Self {
            home_players: self.away_players.iter().map(PhasePlayer::mirrored).collect(),
            away_players: self.home_players.iter().map(PhasePlayer::mirrored).collect(),
            home_shape: self.away_shape,
            away_shape: self.home_shape,
        }
    }
}
