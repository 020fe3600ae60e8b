//! Per-phase snapshot handed to the graph builder and resolver

use super::player::PhasePlayer;
use super::tactics::{AttackDirection, TacticalAttributes, TeamSide};
use crate::error::{EngineError, Result};
use std::collections::HashSet;

/// Immutable bundle describing one phase of play.
///
/// `side` is the team in possession; `direction` is the end it attacks.
#[derive(Debug, Clone)]
pub struct TacticalContext<A> {
    pub side: TeamSide,
    pub direction: AttackDirection,
    pub home_players: Vec<PhasePlayer>,
    pub away_players: Vec<PhasePlayer>,
    pub attributes: A,
}

impl<A: TacticalAttributes> TacticalContext<A> {
    pub fn new(
        side: TeamSide,
        direction: AttackDirection,
        home_players: Vec<PhasePlayer>,
        away_players: Vec<PhasePlayer>,
        attributes: A,
    ) -> Self {
        Self { side, direction, home_players, away_players, attributes }
    }

    pub fn is_home(&self) -> bool {
        self.side.is_home()
    }

    pub fn roster(&self, side: TeamSide) -> &[PhasePlayer] {
        match side {
            TeamSide::Home => &self.home_players,
            TeamSide::Away => &self.away_players,
        }
    }

    pub fn attacking_players(&self) -> &[PhasePlayer] {
        self.roster(self.side)
    }

    pub fn defending_players(&self) -> &[PhasePlayer] {
        self.roster(self.side.opponent())
    }

    /// Both rosters non-empty, player ids unique across both teams
    pub fn validate(&self) -> Result<()> {
        for side in [TeamSide::Home, TeamSide::Away] {
            if self.roster(side).is_empty() {
                return Err(EngineError::InvalidRoster { side });
            }
        }

        let mut seen = HashSet::new();
        for player in self.home_players.iter().chain(self.away_players.iter()) {
            if !seen.insert(player.id) {
                return Err(EngineError::InvalidRequest(format!(
                    "duplicate player id {}",
                    player.id
                )));
            }
        }
        Ok(())
    }
}
