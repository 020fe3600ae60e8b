//! # possession_core - Possession Phase Simulation Engine
//!
//! Models one phase of football possession as a weighted directed acyclic
//! graph over the team in possession and resolves it into a shot, a
//! turnover or the iteration cap.
//!
//! ## Features
//! - Deterministic resolution (same seed = same outcome, route included)
//! - Total on degenerate input: coincident players, no forward outlet
//! - Bounded: at most 15 decisions per phase by default
//! - JSON API and parallel batch runner

pub mod api;
pub mod engine;
pub mod error;

pub use api::{resolve_phase_json, simulate_phases_json, PhaseRequest, PhaseResponse};
pub use engine::{
    AttackDirection, Coordinate, PhaseConfig, PhaseOutcome, PhasePlayer, PhaseResolver,
    PhaseScenario, PlayerId, PossessionGraph, TacticalAttributes, TacticalContext, TeamSide,
    Termination,
};
pub use error::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
