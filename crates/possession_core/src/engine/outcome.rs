//! Result of one resolved phase

use serde::{Deserialize, Serialize};

use super::config::PassBand;
use super::coordinates::Coordinate;
use super::player::PlayerId;
use super::tactics::TeamSide;

/// How the phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Goal,
    ShotMissed,
    /// Intercepted; the opposition breaks with the ball
    TurnoverToAttack,
    /// Lost in a harmless area; the opposition builds from the back
    TurnoverToDefence,
    /// Decision cap hit; reported as a defensive turnover
    IterationCap,
}

impl Termination {
    pub const ALL: [Termination; 5] = [
        Termination::Goal,
        Termination::ShotMissed,
        Termination::TurnoverToAttack,
        Termination::TurnoverToDefence,
        Termination::IterationCap,
    ];

    pub fn is_shot(self) -> bool {
        matches!(self, Termination::Goal | Termination::ShotMissed)
    }

    /// Whether the opposition gets the ball in their defensive third
    pub fn is_defensive_turnover(self) -> bool {
        matches!(self, Termination::TurnoverToDefence | Termination::IterationCap)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Termination::Goal => "goal",
            Termination::ShotMissed => "shot_missed",
            Termination::TurnoverToAttack => "turnover_to_attack",
            Termination::TurnoverToDefence => "turnover_to_defence",
            Termination::IterationCap => "iteration_cap",
        }
    }
}

/// What the possessor chose on one iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDecision {
    Shot { scored: bool },
    /// `receiver` is set only when the pass was completed
    Pass { band: PassBand, receiver: Option<PlayerId> },
}

/// One iteration of the decision loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseStep {
    pub iteration: u32,
    pub possessor: PlayerId,
    /// `f64::MIN` when the possessor had no forward option
    pub pass_option: f64,
    pub shot_option: f64,
    pub decision: StepDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOutcome {
    pub side: TeamSide,
    /// Player holding the ball when the phase ended
    pub final_possessor: PlayerId,
    pub chances: u32,
    pub goals: u32,
    /// Ball positions from the starting possessor onwards
    pub route: Vec<Coordinate>,
    pub scorer: Option<PlayerId>,
    pub termination: Termination,
    pub iterations: u32,
    pub passes: u32,
    pub restarts: u32,
    #[serde(default)]
    pub steps: Vec<PhaseStep>,
}

impl PhaseOutcome {
    pub fn is_goal(&self) -> bool {
        self.termination == Termination::Goal
    }

    /// Where the ball was when the phase ended
    pub fn last_position(&self) -> Option<Coordinate> {
        self.route.last().copied()
    }
}
