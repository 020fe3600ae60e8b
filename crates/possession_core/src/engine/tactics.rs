//! Tactical attribute providers
//!
//! The engine reads tactics through the [`TacticalAttributes`] trait only.
//! Two providers ship with the crate:
//! - [`FormationAttributes`]: strength field derived from both rosters
//! - [`FixedAttributes`]: constant values, for tests and calibration

use serde::{Deserialize, Serialize};

use super::coordinates::{Coordinate, GOAL_CENTER_X};
use super::player::PhasePlayer;
use crate::error::{EngineError, Result};

/// Lowest strength any provider should report.
///
/// Strength appears in denominators of the shot model.
pub const MIN_STRENGTH: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    #[inline]
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    #[inline]
    pub fn is_home(self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

/// End of the pitch a team is attacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttackDirection {
    /// Defending y = 0, attacking y = 1
    #[default]
    TowardsOne,
    /// Defending y = 1, attacking y = 0
    TowardsZero,
}

impl AttackDirection {
    pub fn from_defending_zero(defending_zero: bool) -> Self {
        if defending_zero {
            AttackDirection::TowardsOne
        } else {
            AttackDirection::TowardsZero
        }
    }

    pub fn defending_zero(self) -> bool {
        matches!(self, AttackDirection::TowardsOne)
    }

    /// Position along the attacking axis; larger is further forward
    #[inline]
    pub fn forwardness(self, c: &Coordinate) -> f64 {
        match self {
            AttackDirection::TowardsOne => c.y,
            AttackDirection::TowardsZero => -c.y,
        }
    }

    /// Centre of the goal being attacked
    pub fn goal_point(self) -> Coordinate {
        match self {
            AttackDirection::TowardsOne => Coordinate::new(GOAL_CENTER_X, 1.0),
            AttackDirection::TowardsZero => Coordinate::new(GOAL_CENTER_X, 0.0),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            AttackDirection::TowardsOne => AttackDirection::TowardsZero,
            AttackDirection::TowardsZero => AttackDirection::TowardsOne,
        }
    }
}

/// Read-only tactical queries consumed by the cost model and resolver
pub trait TacticalAttributes {
    /// Control quality of `side` at `point`
    fn team_strength(&self, side: TeamSide, point: &Coordinate) -> f64;

    fn attacking_shape(&self, side: TeamSide) -> f64;

    fn defending_shape(&self, side: TeamSide) -> f64;

    fn positional_balance(&self, side: TeamSide) -> f64;
}

impl<T: TacticalAttributes + ?Sized> TacticalAttributes for &T {
    fn team_strength(&self, side: TeamSide, point: &Coordinate) -> f64 {
        (**self).team_strength(side, point)
    }

    fn attacking_shape(&self, side: TeamSide) -> f64 {
        (**self).attacking_shape(side)
    }

    fn defending_shape(&self, side: TeamSide) -> f64 {
        (**self).defending_shape(side)
    }

    fn positional_balance(&self, side: TeamSide) -> f64 {
        (**self).positional_balance(side)
    }
}

/// Scalar shape modifiers for one team
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamShape {
    pub attacking: f64,
    pub defending: f64,
    pub balance: f64,
}

impl Default for TeamShape {
    fn default() -> Self {
        Self { attacking: 1.0, defending: 1.0, balance: 1.0 }
    }
}

impl TeamShape {
    pub fn new(attacking: f64, defending: f64, balance: f64) -> Self {
        Self { attacking, defending, balance }
    }

    /// All three modifiers must be finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        for (name, value) in
            [("attacking", self.attacking), ("defending", self.defending), ("balance", self.balance)]
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} shape must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Formation-derived provider
// ============================================================================

/// Default radius of a player's influence, in normalized pitch units
pub const DEFAULT_INFLUENCE_RADIUS: f64 = 0.15;

/// Strength field built from the rosters of both teams.
///
/// Each player projects a Gaussian influence scaled by rating. A side's
/// strength at a point is its own influence divided by one plus the
/// opposition's, floored at [`MIN_STRENGTH`].
#[derive(Debug, Clone)]
pub struct FormationAttributes {
    home: Vec<(Coordinate, f64)>,
    away: Vec<(Coordinate, f64)>,
    home_shape: TeamShape,
    away_shape: TeamShape,
    influence_radius: f64,
}

impl FormationAttributes {
    pub fn new(
        home_players: &[PhasePlayer],
        away_players: &[PhasePlayer],
        home_shape: TeamShape,
        away_shape: TeamShape,
    ) -> Result<Self> {
        home_shape.validate()?;
        away_shape.validate()?;

        Ok(Self {
            home: home_players.iter().map(|p| (p.location, p.rating)).collect(),
            away: away_players.iter().map(|p| (p.location, p.rating)).collect(),
            home_shape,
            away_shape,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
        })
    }

    pub fn with_influence_radius(mut self, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "influence radius must be positive, got {}",
                radius
            )));
        }
        self.influence_radius = radius;
        Ok(self)
    }

    pub fn influence_radius(&self) -> f64 {
        self.influence_radius
    }

    fn shape(&self, side: TeamSide) -> &TeamShape {
        match side {
            TeamSide::Home => &self.home_shape,
            TeamSide::Away => &self.away_shape,
        }
    }

    fn roster(&self, side: TeamSide) -> &[(Coordinate, f64)] {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// Summed rating-weighted influence of one side at a point
    fn influence(&self, side: TeamSide, point: &Coordinate) -> f64 {
        let two_r2 = 2.0 * self.influence_radius * self.influence_radius;
        self.roster(side)
            .iter()
            .map(|(loc, rating)| {
                let d = loc.distance(point);
                rating.max(0.0) * (-(d * d) / two_r2).exp()
            })
            .sum()
    }
}

impl TacticalAttributes for FormationAttributes {
    fn team_strength(&self, side: TeamSide, point: &Coordinate) -> f64 {
        let own = self.influence(side, point);
        let opposition = self.influence(side.opponent(), point);
        let strength = own / (1.0 + opposition);

        if strength.is_finite() {
            strength.max(MIN_STRENGTH)
        } else {
            MIN_STRENGTH
        }
    }

    fn attacking_shape(&self, side: TeamSide) -> f64 {
        self.shape(side).attacking
    }

    fn defending_shape(&self, side: TeamSide) -> f64 {
        self.shape(side).defending
    }

    fn positional_balance(&self, side: TeamSide) -> f64 {
        self.shape(side).balance
    }
}

// ============================================================================
// Constant provider
// ============================================================================

/// Provider with position-independent strength
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAttributes {
    pub home_strength: f64,
    pub away_strength: f64,
    pub home_shape: TeamShape,
    pub away_shape: TeamShape,
}

impl Default for FixedAttributes {
    fn default() -> Self {
        Self {
            home_strength: 1.0,
            away_strength: 1.0,
            home_shape: TeamShape::default(),
            away_shape: TeamShape::default(),
        }
    }
}

impl FixedAttributes {
    pub fn uniform(strength: f64) -> Self {
        Self { home_strength: strength, away_strength: strength, ..Self::default() }
    }

    /// Same values with the sides exchanged
    pub fn swapped(&self) -> Self {
        Self {
            home_strength: self.away_strength,
            away_strength: self.home_strength,
            home_shape: self.away_shape,
            away_shape: self.home_shape,
        }
    }
}

impl TacticalAttributes for FixedAttributes {
    fn team_strength(&self, side: TeamSide, _point: &Coordinate) -> f64 {
        match side {
            TeamSide::Home => self.home_strength,
            TeamSide::Away => self.away_strength,
        }
    }

    fn attacking_shape(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home_shape.attacking,
            TeamSide::Away => self.away_shape.attacking,
        }
    }

    fn defending_shape(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home_shape.defending,
            TeamSide::Away => self.away_shape.defending,
        }
    }

    fn positional_balance(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home_shape.balance,
            TeamSide::Away => self.away_shape.balance,
        }
    }
}
