//! JSON entry points for phase resolution
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "seed": 42,
//!   "side": "home",
//!   "direction": "towards_one",
//!   "possessor_id": 3,
//!   "home_players": [{ "id": 3, "rating": 72.0, "location": { "x": 0.4, "y": 0.2 } }],
//!   "away_players": [{ "id": 14, "rating": 70.0, "location": { "x": 0.5, "y": 0.8 } }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{
    resolve_batch, AttackDirection, FormationAttributes, PhaseConfig, PhaseOutcome, PhasePlayer,
    PhaseResolver, PhaseScenario, PhaseSummary, PlayerId, PossessionGraph, TacticalContext,
    TeamShape, TeamSide,
};
use crate::error::{EngineError, Result};
use crate::SCHEMA_VERSION;

/// Upper bound on phases per batch request
pub const MAX_BATCH_PHASES: u64 = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRequest {
    pub schema_version: u8,
    pub seed: u64,
    #[serde(default)]
    pub side: TeamSide,
    #[serde(default)]
    pub direction: AttackDirection,
    pub possessor_id: PlayerId,
    pub home_players: Vec<PhasePlayer>,
    pub away_players: Vec<PhasePlayer>,
    #[serde(default)]
    pub home_shape: TeamShape,
    #[serde(default)]
    pub away_shape: TeamShape,
    /// Preset name; ignored when `config` is given
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub config: Option<PhaseConfig>,
    #[serde(default)]
    pub influence_radius: Option<f64>,
    /// Batch size for `simulate_phases_json`
    #[serde(default)]
    pub phases: Option<u64>,
    /// Keep per-iteration decisions in the response
    #[serde(default)]
    pub include_steps: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub players: usize,
    pub edges: usize,
    pub terminal_players: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub graph: GraphStats,
    pub outcome: PhaseOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub graph: GraphStats,
    pub summary: PhaseSummary,
}

impl PhaseRequest {
    pub fn scenario(&self) -> PhaseScenario {
        PhaseScenario::new(self.home_players.clone(), self.away_players.clone())
            .with_shapes(self.home_shape, self.away_shape)
    }

    /// Explicit `config`, else the named `profile`, else the default preset
    pub fn phase_config(&self) -> PhaseConfig {
        match (&self.config, &self.profile) {
            (Some(config), _) => config.clone(),
            (None, Some(profile)) => PhaseConfig::from_profile(profile),
            (None, None) => PhaseConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(EngineError::InvalidRequest(format!(
                "unsupported schema_version {}, expected {}",
                self.schema_version, SCHEMA_VERSION
            )));
        }

        if let Some(phases) = self.phases {
            if phases == 0 || phases > MAX_BATCH_PHASES {
                return Err(EngineError::InvalidRequest(format!(
                    "phases must be between 1 and {}, got {}",
                    MAX_BATCH_PHASES, phases
                )));
            }
        }

        self.scenario().validate()?;

        let attacking = match self.side {
            TeamSide::Home => &self.home_players,
            TeamSide::Away => &self.away_players,
        };
        if !attacking.iter().any(|p| p.id == self.possessor_id) {
            return Err(EngineError::UnknownPossessor { id: self.possessor_id });
        }

        Ok(())
    }

    fn context(&self) -> Result<TacticalContext<FormationAttributes>> {
        let mut ctx = self.scenario().context(self.side, self.direction)?;
        if let Some(radius) = self.influence_radius {
            ctx.attributes = ctx.attributes.with_influence_radius(radius)?;
        }
        Ok(ctx)
    }
}

impl GraphStats {
    pub fn from_graph(graph: &PossessionGraph) -> Self {
        Self {
            players: graph.len(),
            edges: graph.edge_count(),
            terminal_players: (0..graph.len())
                .filter(|&i| graph.is_terminal(i))
                .map(|i| graph.player(i).id)
                .collect(),
        }
    }
}

/// Resolve one phase from a typed request
pub fn resolve_request(request: &PhaseRequest) -> Result<PhaseResponse> {
    request.validate()?;

    let ctx = request.context()?;
    let graph = PossessionGraph::build(&ctx)?;
    let resolver = PhaseResolver::new(request.phase_config())?;

    let mut rng = crate::engine::phase_rng(request.seed, 0);
    let mut outcome = resolver.resolve_phase(request.possessor_id, &graph, &ctx, &mut rng)?;
    if !request.include_steps {
        outcome.steps.clear();
    }

    info!(
        seed = request.seed,
        termination = outcome.termination.as_str(),
        passes = outcome.passes,
        "phase request resolved"
    );

    Ok(PhaseResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        graph: GraphStats::from_graph(&graph),
        outcome,
    })
}

/// Resolve `request.phases` phases (default 1) and summarize them
pub fn simulate_request(request: &PhaseRequest) -> Result<BatchResponse> {
    request.validate()?;

    let ctx = request.context()?;
    let graph = PossessionGraph::build(&ctx)?;
    let resolver = PhaseResolver::new(request.phase_config())?;
    let phases = request.phases.unwrap_or(1);

    debug!(phases, seed = request.seed, "running phase batch");
    let outcomes =
        resolve_batch(&resolver, &graph, &ctx.attributes, request.possessor_id, request.seed, phases)?;
    let summary = PhaseSummary::from_outcomes(&outcomes);

    info!(phases, goals = summary.goals, chances = summary.chances, "phase batch finished");

    Ok(BatchResponse {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        graph: GraphStats::from_graph(&graph),
        summary,
    })
}

pub fn resolve_phase_json(request_json: &str) -> Result<String> {
    let request: PhaseRequest = serde_json::from_str(request_json)?;
    let response = resolve_request(&request)?;
    Ok(serde_json::to_string(&response)?)
}

pub fn simulate_phases_json(request_json: &str) -> Result<String> {
    let request: PhaseRequest = serde_json::from_str(request_json)?;
    let response = simulate_request(&request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_json(possessor: u32) -> serde_json::Value {
        json!({
            "schema_version": 1,
            "seed": 42,
            "side": "home",
            "direction": "towards_one",
            "possessor_id": possessor,
            "home_players": [
                { "id": 1, "rating": 70.0, "location": { "x": 0.5, "y": 0.1 } },
                { "id": 2, "rating": 74.0, "location": { "x": 0.4, "y": 0.45 } },
                { "id": 3, "rating": 80.0, "location": { "x": 0.55, "y": 0.8 } }
            ],
            "away_players": [
                { "id": 11, "rating": 72.0, "location": { "x": 0.5, "y": 0.9 } },
                { "id": 12, "rating": 68.0, "location": { "x": 0.45, "y": 0.6 } }
            ],
            "profile": "default"
        })
    }

    #[test]
    fn test_resolve_phase_json() {
        let result = resolve_phase_json(&request_json(1).to_string());
        assert!(result.is_ok(), "{:?}", result.err());

        let parsed: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["graph"]["players"], 3);
        assert_eq!(parsed["graph"]["edges"], 3);
        assert_eq!(parsed["graph"]["terminal_players"], json!([3]));
        assert!(parsed["outcome"]["route"].as_array().map_or(false, |r| !r.is_empty()));
        assert_eq!(parsed["outcome"]["steps"], json!([]));
    }

    #[test]
    fn test_same_seed_same_json() {
        let body = request_json(1).to_string();
        assert_eq!(resolve_phase_json(&body).unwrap(), resolve_phase_json(&body).unwrap());
    }

    #[test]
    fn test_unknown_possessor_rejected() {
        let err = resolve_phase_json(&request_json(11).to_string()).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_POSSESSOR");
    }

    #[test]
    fn test_schema_version_checked() {
        let mut body = request_json(1);
        body["schema_version"] = json!(9);
        let err = resolve_phase_json(&body.to_string()).unwrap_err();
        assert_eq!(err.code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_empty_away_rejected() {
        let mut body = request_json(1);
        body["away_players"] = json!([]);
        let err = resolve_phase_json(&body.to_string()).unwrap_err();
        assert_eq!(err.code(), "INVALID_ROSTER");
    }

    #[test]
    fn test_malformed_json() {
        let err = resolve_phase_json("{ not json").unwrap_err();
        assert_eq!(err.code(), "JSON_ERROR");
    }

    #[test]
    fn test_bad_influence_radius() {
        let mut body = request_json(1);
        body["influence_radius"] = json!(-0.1);
        let err = resolve_phase_json(&body.to_string()).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_simulate_phases_json() {
        let mut body = request_json(1);
        body["phases"] = json!(50);
        let result = simulate_phases_json(&body.to_string()).unwrap();
        let parsed: BatchResponse = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed.summary.phases, 50);
        assert!(parsed.summary.goals <= parsed.summary.chances);
    }

    #[test]
    fn test_batch_size_limits() {
        let mut body = request_json(1);
        body["phases"] = json!(0);
        assert!(simulate_phases_json(&body.to_string()).is_err());
        body["phases"] = json!(MAX_BATCH_PHASES + 1);
        assert!(simulate_phases_json(&body.to_string()).is_err());
    }

    #[test]
    fn test_explicit_config_overrides_profile() {
        let mut request: PhaseRequest = serde_json::from_value(request_json(1)).unwrap();
        request.profile = Some("arcade".into());
        request.config = Some(PhaseConfig { max_iterations: 3, ..PhaseConfig::default() });
        assert_eq!(request.phase_config().max_iterations, 3);

        request.config = None;
        assert_eq!(request.phase_config(), PhaseConfig::arcade());
    }

    #[test]
    fn test_missing_profile_means_realistic() {
        let mut implicit = request_json(1);
        implicit.as_object_mut().unwrap().remove("profile");
        let mut explicit = request_json(1);
        explicit["profile"] = json!("realistic");

        let request: PhaseRequest = serde_json::from_value(implicit.clone()).unwrap();
        assert_eq!(request.phase_config(), PhaseConfig::realistic());

        for seed in 0..20u64 {
            implicit["seed"] = json!(seed);
            explicit["seed"] = json!(seed);
            assert_eq!(
                resolve_phase_json(&implicit.to_string()).unwrap(),
                resolve_phase_json(&explicit.to_string()).unwrap()
            );
        }
    }
}
