use thiserror::Error;

use crate::engine::{AttackDirection, PlayerId, TeamSide};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid roster: {side:?} team has no players")]
    InvalidRoster { side: TeamSide },

    #[error("Possessor {id} is not in the attacking roster")]
    UnknownPossessor { id: PlayerId },

    #[error("Context {context:?} does not match graph built for {graph:?}")]
    ContextMismatch {
        context: (TeamSide, AttackDirection),
        graph: (TeamSide, AttackDirection),
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Short machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidRoster { .. } => "INVALID_ROSTER",
            EngineError::UnknownPossessor { .. } => "UNKNOWN_POSSESSOR",
            EngineError::ContextMismatch { .. } => "CONTEXT_MISMATCH",
            EngineError::InvalidConfig(_) => "INVALID_CONFIG",
            EngineError::InvalidRequest(_) => "INVALID_REQUEST",
            EngineError::Json(_) => "JSON_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
