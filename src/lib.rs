//! Park Simulator
//!
//! A multi-threaded amusement park simulation. Every ride, food truck,
//! merch stand, bathroom, and janitor runs as an autonomous agent thread;
//! the only shared surfaces are a virtual clock, per-facility waiting
//! lines, and zone cleanliness counters.
//!
//! # Overview
//!
//! The concurrency core this crate is built around:
//!
//! - **[`clock::VirtualClock`]**: converts real elapsed time into a
//!   monotonic counter of simulated minutes, with a shared stop latch and
//!   optional auto-shutdown at a maximum minute
//! - **[`queue::AdmissionQueue`]**: thread-safe two-lane waiting line
//!   (priority before regular, FIFO within a lane) with atomic batch
//!   extraction for ride boarding
//! - **[`facility::RideState`]**: the per-ride operational state machine
//!   (open, boarding, broken, maintenance) driven by once-per-minute ticks
//! - **[`simulation::Agent`]**: the polling loop shape shared by every
//!   concurrent entity
//! - **[`zone::CleanlinessManager`]**: shared cleanliness counters degraded
//!   by traffic and restored by janitors
//!
//! Visitor decision making is deliberately outside this crate: visitors
//! appear only as opaque [`facility::Entrant`]s occupying queue slots and
//! receiving completion callbacks.
//!
//! # Quick Start
//!
//! ```rust
//! use park_simulator::simulation::Park;
//! use park_simulator::types::SimulationConfig;
//!
//! let mut config = SimulationConfig::default();
//! config.clock.speed_factor = 0.001; // 1ms per simulated minute
//! config.clock.max_minutes = Some(30);
//!
//! let park = Park::new(config)?;
//! park.open()?;
//! park.run_until_close();
//! park.shutdown();
//! println!("{}", park.statistics().summary());
//! # Ok::<(), park_simulator::simulation::SimulationError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`clock`]: the virtual clock
//! - [`queue`]: shared admission queues
//! - [`facility`]: rides, food trucks, merch stands, bathrooms, and the
//!   [`facility::Entrant`] trait
//! - [`staff`]: janitor agents
//! - [`zone`]: zone cleanliness counters and the background sweep
//! - [`simulation`]: orchestration, agent loop, metrics, errors, logging
//! - [`types`]: identifiers and configuration
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

pub mod clock;
pub mod facility;
pub mod queue;
pub mod simulation;
pub mod staff;
pub mod types;
pub mod zone;

pub use clock::VirtualClock;
pub use facility::{Bathroom, Entrant, FoodTruck, MerchStand, Ride, RideState};
pub use queue::AdmissionQueue;
pub use simulation::{
    spawn_agent, Agent, LoggingConfig, MetricsSink, Park, SimulationError, SimulationResult,
    SimulationStatistics, Step,
};
pub use staff::Janitor;
pub use types::{ClockConfig, RideConfig, SimulationConfig, VisitorId};
pub use zone::{CleanlinessManager, CleanlinessSweep};
