pub mod phase_json;

pub use phase_json::{
    resolve_phase_json, resolve_request, simulate_phases_json, simulate_request, BatchResponse,
    GraphStats, PhaseRequest, PhaseResponse, MAX_BATCH_PHASES,
};
