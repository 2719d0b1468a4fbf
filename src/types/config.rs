//! Configuration structures for the park simulator
//!
//! This module contains the simulation configuration, its validation logic,
//! and the command line interface used to control a run.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::simulation::SimulationError;

/// Fallback repair time (simulated minutes) when a ride breaks down with no
/// configured repair window.
pub const DEFAULT_REPAIR_MINUTES: u64 = 15;

/// Configuration for a single ride.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideConfig {
    /// Display name, also used as the facility name in metrics.
    pub name: String,
    /// Seats per cycle; batch admission never exceeds this.
    pub capacity: usize,
    /// Length of one service cycle in simulated minutes.
    pub run_duration: u64,
    /// Probability of a breakdown after each completed cycle, in [0, 1].
    pub break_probability: f64,
    /// Simulated minutes spent in the broken state after a breakdown.
    pub repair_time: u64,
    /// How many simulated minutes boarding waits for riders before giving up.
    pub board_window: u64,
    /// Minimum rider height in centimeters (0 = unrestricted). Enforced by
    /// visitors deciding whether to join the queue, not by the ride.
    #[serde(default)]
    pub min_height_cm: u32,
}

impl RideConfig {
    /// Validate a single ride's parameters.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.name.trim().is_empty() {
            return Err(SimulationError::configuration_error("ride name must not be empty"));
        }
        if self.capacity == 0 {
            return Err(SimulationError::configuration_error(format!(
                "ride '{}': capacity must be greater than 0",
                self.name
            )));
        }
        if self.run_duration == 0 {
            return Err(SimulationError::configuration_error(format!(
                "ride '{}': run_duration must be greater than 0",
                self.name
            )));
        }
        if !(0.0..=1.0).contains(&self.break_probability) {
            return Err(SimulationError::configuration_error(format!(
                "ride '{}': break_probability must be within [0, 1], got {}",
                self.name, self.break_probability
            )));
        }
        if self.board_window == 0 {
            return Err(SimulationError::configuration_error(format!(
                "ride '{}': board_window must be greater than 0",
                self.name
            )));
        }
        Ok(())
    }
}

/// Clock configuration: how fast simulated minutes pass and when to stop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClockConfig {
    /// Real seconds per simulated minute.
    pub speed_factor: f64,
    /// Automatic shutdown after this many simulated minutes (None = manual
    /// stop only).
    pub max_minutes: Option<u64>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        // 0.05s per simulated minute: an 8-hour park day runs in ~24 seconds
        Self { speed_factor: 0.05, max_minutes: Some(480) }
    }
}

/// Top-level configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Clock speed and auto-shutdown settings.
    pub clock: ClockConfig,
    /// Rides to build, one agent thread each.
    pub rides: Vec<RideConfig>,
    /// Number of food trucks.
    pub food_truck_count: usize,
    /// Number of merchandise stands.
    pub merch_stand_count: usize,
    /// Number of bathrooms.
    pub bathroom_count: usize,
    /// Number of janitors sweeping the zones.
    pub janitor_count: usize,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            rides: default_rides(),
            food_truck_count: 5,
            merch_stand_count: 3,
            bathroom_count: 5,
            janitor_count: 2,
            seed: None,
        }
    }
}

/// The stock park layout: nine rides covering the reliability spectrum.
fn default_rides() -> Vec<RideConfig> {
    let layout: [(&str, usize, u64, f64, u64, u64, u32); 9] = [
        ("RollerCoaster", 24, 5, 0.03, 15, 3, 140),
        ("DropTower", 16, 4, 0.04, 12, 2, 145),
        ("FerrisWheel", 32, 8, 0.01, 10, 4, 0),
        ("HauntedHouse", 20, 6, 0.02, 8, 3, 140),
        ("SpinningTeacups", 16, 4, 0.02, 6, 2, 100),
        ("BumperCars", 20, 5, 0.03, 7, 3, 110),
        ("SplashMountain", 28, 7, 0.03, 14, 4, 120),
        ("SpaceSimulator", 12, 6, 0.05, 20, 2, 120),
        ("CarouselHorses", 24, 5, 0.01, 5, 3, 0),
    ];
    layout.iter()
        .map(|&(name, capacity, run_duration, break_probability, repair_time, board_window, min_height_cm)| {
            RideConfig {
                name: name.to_string(),
                capacity,
                run_duration,
                break_probability,
                repair_time,
                board_window,
                min_height_cm,
            }
        })
        .collect()
}

impl SimulationConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Build the effective configuration from CLI arguments: file settings
    /// first (when `--config` is given), then CLI overrides on top.
    pub fn from_cli_args(args: CliArgs) -> Result<Self, SimulationError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(speed_factor) = args.speed_factor {
            config.clock.speed_factor = speed_factor;
        }
        if let Some(max_minutes) = args.park_minutes {
            config.clock.max_minutes = Some(max_minutes);
        }
        if let Some(count) = args.food_trucks {
            config.food_truck_count = count;
        }
        if let Some(count) = args.merch_stands {
            config.merch_stand_count = count;
        }
        if let Some(count) = args.bathrooms {
            config.bathroom_count = count;
        }
        if let Some(count) = args.janitors {
            config.janitor_count = count;
        }
        if let Some(seed) = args.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }

    /// Validate the full configuration. Fails fast on the first problem.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.clock.speed_factor <= 0.0 {
            return Err(SimulationError::configuration_error(format!(
                "clock speed_factor must be positive, got {}",
                self.clock.speed_factor
            )));
        }
        if self.clock.max_minutes == Some(0) {
            return Err(SimulationError::configuration_error(
                "clock max_minutes must be greater than 0 when set",
            ));
        }
        if self.rides.is_empty() {
            return Err(SimulationError::configuration_error("at least one ride is required"));
        }
        for ride in &self.rides {
            ride.validate()?;
        }
        Ok(())
    }

    /// Serialize to pretty JSON (used by `--print-config`).
    pub fn print_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "park-simulator",
    version,
    about = "Amusement park simulator - concurrent rides, facilities, and waiting lines",
    long_about = "Runs a multi-threaded amusement park simulation on a virtual clock.\n\
Each ride, food truck, merch stand, bathroom, and janitor runs as its own\n\
thread; they coordinate only through shared waiting lines and zone counters.\n\n\
EXAMPLES:\n    # Run the stock park\n    park-simulator\n\n    # Use a configuration file\n    park-simulator --config park.json\n\n    # A 2-hour park day at 10ms per simulated minute\n    park-simulator --park-minutes 120 --speed-factor 0.01\n\n    # Generate a configuration template\n    park-simulator --print-config > park.json"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(short, long, help = "Configuration file path (JSON format)")]
    pub config: Option<String>,

    /// Real seconds per simulated minute
    #[arg(long, help = "Real seconds per simulated minute")]
    pub speed_factor: Option<f64>,

    /// Length of the park day in simulated minutes
    #[arg(long, help = "Length of the park day in simulated minutes")]
    pub park_minutes: Option<u64>,

    /// Number of food trucks
    #[arg(long, help = "Number of food trucks")]
    pub food_trucks: Option<usize>,

    /// Number of merchandise stands
    #[arg(long, help = "Number of merchandise stands")]
    pub merch_stands: Option<usize>,

    /// Number of bathrooms
    #[arg(long, help = "Number of bathrooms")]
    pub bathrooms: Option<usize>,

    /// Number of janitors
    #[arg(long, help = "Number of janitors")]
    pub janitors: Option<usize>,

    /// RNG seed for reproducible runs
    #[arg(long, help = "RNG seed for reproducible runs")]
    pub seed: Option<u64>,

    /// Print the default configuration as JSON and exit
    #[arg(long, help = "Print the default configuration as JSON and exit")]
    pub print_config: bool,

    /// Validate configuration without running the simulation
    #[arg(long, help = "Validate configuration without running the simulation")]
    pub dry_run: bool,

    /// Enable verbose (info-level) logging
    #[arg(short, long, help = "Enable verbose (info-level) logging")]
    pub verbose: bool,

    /// Enable debug-level logging
    #[arg(long, help = "Enable debug-level logging")]
    pub debug: bool,
}
