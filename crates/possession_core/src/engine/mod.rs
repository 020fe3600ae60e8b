//! Possession phase engine
//!
//! ```text
//! PhaseScenario ──► TacticalContext ──► PossessionGraph ──► PhaseResolver ──► PhaseOutcome
//!                    (rosters, side,     (forward DAG,        (bounded,
//!                     direction, tactics) edge costs)          seeded walk)
//! ```
//!
//! - `coordinates`, `player`: spatial model
//! - `tactics`: tactical attribute trait and providers
//! - `cost`: pass value of one edge
//! - `graph`: forward-only pass graph for the team in possession
//! - `resolver`: decision loop producing a [`PhaseOutcome`]
//! - `batch`: parallel resolution and summaries

pub mod batch;
pub mod config;
pub mod context;
pub mod coordinates;
pub mod cost;
pub mod graph;
pub mod outcome;
pub mod player;
pub mod resolver;
pub mod scenario;
pub mod tactics;

pub use batch::{phase_rng, resolve_batch, PhaseSummary};
pub use config::{PassBand, PassThresholds, PhaseConfig, ShotConfig};
pub use context::TacticalContext;
pub use coordinates::Coordinate;
pub use cost::{edge_cost, evaluate_edge, EdgeCost};
pub use graph::{Edge, PossessionGraph};
pub use outcome::{PhaseOutcome, PhaseStep, StepDecision, Termination};
pub use player::{PhasePlayer, PlayerId};
pub use resolver::PhaseResolver;
pub use scenario::PhaseScenario;
pub use tactics::{
    AttackDirection, FixedAttributes, FormationAttributes, TacticalAttributes, TeamShape, TeamSide,
};
