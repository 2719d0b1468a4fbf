//! Simulation orchestration and control
//!
//! The glue around the concurrency core:
//!
//! - **Park**: builds facilities from configuration, spawns and joins agents
//! - **Agent / spawn_agent**: the polling thread-body shared by every entity
//! - **MetricsSink / SimulationStatistics**: fire-and-forget metrics surface
//! - **SimulationError**: setup/teardown error handling
//! - **LoggingConfig**: tracing-subscriber setup

pub mod agent;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod statistics;

pub use agent::{spawn_agent, Agent, Step};
pub use error::{SimulationError, SimulationResult};
pub use logging::LoggingConfig;
pub use orchestrator::Park;
pub use statistics::{MetricsSink, SimulationStatistics};
