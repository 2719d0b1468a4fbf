//! Error types and handling
//!
//! Errors here cover setup and teardown only. Runtime trouble inside the
//! park is deliberately not an error: a breakdown is a ride *state* that
//! heals itself, and a visitor who cannot afford lunch gets a failure
//! notification, not an `Err`. No error ever crosses an agent-loop boundary.

use thiserror::Error;

/// Result alias for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors that can occur while setting up or shutting down a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A facility could not be constructed
    #[error("Facility error: {0}")]
    FacilityError(String),

    /// An agent thread could not be spawned or joined
    #[error("Agent error: {0}")]
    AgentError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<String> for SimulationError {
    fn from(s: String) -> Self {
        SimulationError::FacilityError(s)
    }
}

impl From<&str> for SimulationError {
    fn from(s: &str) -> Self {
        SimulationError::FacilityError(s.to_string())
    }
}

impl From<anyhow::Error> for SimulationError {
    fn from(error: anyhow::Error) -> Self {
        SimulationError::FacilityError(error.to_string())
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a facility error
    pub fn facility_error(msg: impl Into<String>) -> Self {
        Self::FacilityError(msg.into())
    }

    /// Create an agent error
    pub fn agent_error(msg: impl Into<String>) -> Self {
        Self::AgentError(msg.into())
    }
}
