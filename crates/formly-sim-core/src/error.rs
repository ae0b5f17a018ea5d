use thiserror::Error;

/// Failures surfaced by a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("variable '{key}' must be numeric: {reason}")]
    InvalidVariable { key: String, reason: String },
    #[error("{0}")]
    Internal(String),
}

impl SimulationError {
    pub fn invalid_variable(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVariable {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status class this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidVariable { .. } => 400,
            Self::Internal(_) => 500,
        }
    }
}
