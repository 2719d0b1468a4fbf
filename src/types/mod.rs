//! Core types and configuration
//!
//! Foundational data types for the simulation: uuid-backed identifiers and
//! the configuration surface (ride parameters, clock settings, CLI).

pub mod config;
pub mod identifiers;

pub use config::*;
pub use identifiers::*;
