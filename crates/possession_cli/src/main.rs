//! Possession CLI
//!
//! Resolves phases of play from JSON requests, or from a built-in 4-4-2 demo.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use possession_core::api::{resolve_request, simulate_request, BatchResponse, PhaseRequest};
use possession_core::engine::{PassBand, PhaseConfig, PhaseOutcome, PhaseScenario, StepDecision};
use possession_core::{AttackDirection, TeamSide, SCHEMA_VERSION};

#[derive(Parser)]
#[command(name = "possession")]
#[command(about = "Resolve football possession phases", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single phase from a JSON request
    Resolve {
        /// Request JSON file path
        #[arg(long)]
        input: PathBuf,

        /// Pretty-print the response
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Resolve many phases in parallel and print a summary
    Batch {
        /// Request JSON file path
        #[arg(long)]
        input: PathBuf,

        /// Number of phases (overrides the request)
        #[arg(long)]
        phases: Option<u64>,
    },

    /// Resolve one phase of the built-in 4-4-2 scenario
    Demo {
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Team in possession: home or away
        #[arg(long, default_value = "home")]
        side: String,

        /// Preset: realistic, arcade or cautious (defaults to POSSESSION_PROFILE)
        #[arg(long)]
        profile: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve { input, pretty } => {
            let mut request = load_request(&input)?;
            apply_env_profile(&mut request);
            let response = resolve_request(&request)?;
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", json);
        }

        Commands::Batch { input, phases } => {
            let mut request = load_request(&input)?;
            apply_env_profile(&mut request);
            if phases.is_some() {
                request.phases = phases;
            }
            let response = simulate_request(&request)?;
            print_summary(&response);
        }

        Commands::Demo { seed, side, profile } => {
            let mut request = demo_request(seed, &side, profile)?;
            apply_env_profile(&mut request);
            let response = resolve_request(&request)?;

            println!("Demo phase (seed {}, {} in possession)", seed, side);
            println!(
                "   Graph: {} players, {} pass options",
                response.graph.players, response.graph.edges
            );
            print_outcome(&response.outcome);
        }
    }

    Ok(())
}

fn load_request(path: &Path) -> Result<PhaseRequest> {
    debug!(path = %path.display(), "loading request");
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&body).with_context(|| format!("invalid request in {}", path.display()))
}

/// Fills in the `POSSESSION_PROFILE` preset when the request names neither
/// a config nor a profile
fn apply_env_profile(request: &mut PhaseRequest) {
    if request.config.is_none() && request.profile.is_none() {
        request.config = Some(PhaseConfig::from_env_or_default());
    }
}

fn demo_request(seed: u64, side: &str, profile: Option<String>) -> Result<PhaseRequest> {
    let (side, direction) = match side.to_lowercase().as_str() {
        "home" => (TeamSide::Home, AttackDirection::TowardsOne),
        "away" => (TeamSide::Away, AttackDirection::TowardsZero),
        other => anyhow::bail!("unknown side '{}', expected home or away", other),
    };

    let scenario = PhaseScenario::four_four_two(seed);
    let keeper = scenario.roster(side)[0].id;

    Ok(PhaseRequest {
        schema_version: SCHEMA_VERSION,
        seed,
        side,
        direction,
        possessor_id: keeper,
        home_players: scenario.home_players,
        away_players: scenario.away_players,
        home_shape: scenario.home_shape,
        away_shape: scenario.away_shape,
        config: profile.as_deref().map(PhaseConfig::from_profile),
        profile,
        influence_radius: None,
        phases: None,
        include_steps: true,
    })
}

fn print_outcome(outcome: &PhaseOutcome) {
    for step in &outcome.steps {
        let decision = match step.decision {
            StepDecision::Shot { scored: true } => "shot, scored".to_string(),
            StepDecision::Shot { scored: false } => "shot, missed".to_string(),
            StepDecision::Pass { receiver: Some(to), .. } => format!("pass to {}", to),
            StepDecision::Pass { band, receiver: None } => band_label(band).to_string(),
        };
        println!("   {:>2}. {} -> {}", step.iteration, step.possessor, decision);
    }

    println!("\nResult: {}", outcome.termination.as_str());
    println!("   Passes:   {}", outcome.passes);
    println!("   Restarts: {}", outcome.restarts);
    println!("   Chances:  {}", outcome.chances);
    println!("   Goals:    {}", outcome.goals);
    if let Some(scorer) = outcome.scorer {
        println!("   Scorer:   {}", scorer);
    }
    if let Some(end) = outcome.last_position() {
        println!("   Ball at:  ({:.2}, {:.2})", end.x, end.y);
    }
    let route: Vec<String> =
        outcome.route.iter().map(|c| format!("({:.2}, {:.2})", c.x, c.y)).collect();
    println!("   Route:    {}", route.join(" -> "));
}

fn band_label(band: PassBand) -> &'static str {
    match band {
        PassBand::Intercepted => "pass intercepted",
        PassBand::SafeTurnover => "safe turnover",
        PassBand::Reset => "reset to the back line",
        PassBand::Completed => "pass completed",
    }
}

fn print_summary(response: &BatchResponse) {
    let summary = &response.summary;
    println!("Batch of {} phases (seed {})", summary.phases, response.seed);
    println!("   Chances:       {}", summary.chances);
    println!("   Goals:         {}", summary.goals);
    println!("   Conversion:    {:.1}%", summary.conversion_rate() * 100.0);
    println!("   Mean route:    {:.2}", summary.mean_route_length);
    println!("   Mean decisions:{:.2}", summary.mean_iterations);
    for (termination, count) in &summary.terminations {
        println!("   {:<20} {}", termination, count);
    }
    if let Some(scorer) = summary.top_scorer {
        println!("   Top scorer:    {}", scorer);
    }
}
