//! Park orchestration
//!
//! [`Park`] builds every facility from a validated configuration, spawns one
//! agent thread per entity, and tears the whole run down when the clock's
//! stop latch is set. Facilities never talk to each other; the park only
//! hands out shared handles (clock, queues, cleanliness, metrics).

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::clock::VirtualClock;
use crate::facility::{Bathroom, FoodTruck, MerchStand, Ride};
use crate::queue::AdmissionQueue;
use crate::simulation::agent::spawn_agent;
use crate::simulation::{SimulationError, SimulationResult, SimulationStatistics};
use crate::staff::Janitor;
use crate::types::SimulationConfig;
use crate::zone::{CleanlinessManager, CleanlinessSweep, DEFAULT_ZONES};

/// The whole park: shared infrastructure plus every facility, ready to run.
///
/// Construction builds everything but spawns nothing; [`Park::open`] starts
/// the clock and launches the agent threads, and [`Park::shutdown`] stops
/// the clock, closes every facility, and joins the threads.
pub struct Park {
    config: SimulationConfig,
    clock: Arc<VirtualClock>,
    statistics: Arc<SimulationStatistics>,
    cleanliness: Arc<CleanlinessManager>,
    rides: Vec<Arc<Ride>>,
    food_trucks: Vec<Arc<FoodTruck>>,
    merch_stands: Vec<Arc<MerchStand>>,
    bathrooms: Vec<Arc<Bathroom>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Park {
    /// Validate the configuration and build all facilities.
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        info!(
            rides = config.rides.len(),
            food_trucks = config.food_truck_count,
            merch_stands = config.merch_stand_count,
            bathrooms = config.bathroom_count,
            janitors = config.janitor_count,
            "building park"
        );

        let clock = match config.clock.max_minutes {
            Some(max) => Arc::new(VirtualClock::with_max_minutes(config.clock.speed_factor, max)),
            None => Arc::new(VirtualClock::new(config.clock.speed_factor)),
        };
        let statistics = Arc::new(SimulationStatistics::new());
        let metrics: Arc<dyn crate::simulation::MetricsSink> = statistics.clone();
        let cleanliness = Arc::new(CleanlinessManager::new());

        let mut seeds = SeedSequence::new(config.seed);

        let rides = config
            .rides
            .iter()
            .map(|ride_config| {
                Arc::new(Ride::new(
                    ride_config.clone(),
                    Arc::new(AdmissionQueue::new()),
                    clock.clone(),
                    Some(metrics.clone()),
                    seeds.next_rng(),
                ))
            })
            .collect();

        let food_trucks = (0..config.food_truck_count)
            .map(|i| {
                Arc::new(FoodTruck::new(
                    format!("FoodTruck-{}", i + 1),
                    Arc::new(AdmissionQueue::new()),
                    clock.clone(),
                    Some(metrics.clone()),
                    seeds.next_rng(),
                ))
            })
            .collect();

        let merch_stands = (0..config.merch_stand_count)
            .map(|i| {
                Arc::new(MerchStand::new(
                    format!("MerchStand-{}", i + 1),
                    Arc::new(AdmissionQueue::new()),
                    clock.clone(),
                    Some(metrics.clone()),
                    seeds.next_rng(),
                ))
            })
            .collect();

        let bathrooms = (0..config.bathroom_count)
            .map(|i| {
                Arc::new(Bathroom::new(
                    format!("Bathroom-{}", i + 1),
                    Arc::new(AdmissionQueue::new()),
                    clock.clone(),
                    Some(metrics.clone()),
                    seeds.next_rng(),
                ))
            })
            .collect();

        Ok(Self {
            config,
            clock,
            statistics,
            cleanliness,
            rides,
            food_trucks,
            merch_stands,
            bathrooms,
            handles: Mutex::new(Vec::new()),
        })
    }

    /// The shared simulation clock.
    pub fn clock(&self) -> &Arc<VirtualClock> {
        &self.clock
    }

    /// The in-memory metrics accumulator for this run.
    pub fn statistics(&self) -> &Arc<SimulationStatistics> {
        &self.statistics
    }

    /// Shared zone cleanliness state.
    pub fn cleanliness(&self) -> &Arc<CleanlinessManager> {
        &self.cleanliness
    }

    /// All rides.
    pub fn rides(&self) -> &[Arc<Ride>] {
        &self.rides
    }

    /// All food trucks.
    pub fn food_trucks(&self) -> &[Arc<FoodTruck>] {
        &self.food_trucks
    }

    /// All merchandise stands.
    pub fn merch_stands(&self) -> &[Arc<MerchStand>] {
        &self.merch_stands
    }

    /// All bathrooms.
    pub fn bathrooms(&self) -> &[Arc<Bathroom>] {
        &self.bathrooms
    }

    /// Find a ride by name.
    pub fn ride(&self, name: &str) -> Option<&Arc<Ride>> {
        self.rides.iter().find(|ride| ride.name() == name)
    }

    /// Take a ride down for scheduled maintenance. Fails fast when the ride
    /// name is unknown; the rest of the park is unaffected.
    pub fn request_maintenance(&self, ride_name: &str, minutes: u64) -> SimulationResult<()> {
        let ride = self.ride(ride_name).ok_or_else(|| {
            SimulationError::facility_error(format!("no ride named '{}'", ride_name))
        })?;
        ride.schedule_maintenance(minutes);
        Ok(())
    }

    /// Start the clock and spawn every agent thread: one per ride, food
    /// truck, merch stand, bathroom, and janitor, plus the cleanliness
    /// sweep. Fails if the OS refuses a thread; already-spawned agents keep
    /// running and are reaped by [`Park::shutdown`].
    pub fn open(&self) -> SimulationResult<()> {
        self.clock.start();
        let mut handles = self.handles.lock().unwrap();
        let mut seeds = SeedSequence::new(self.config.seed.map(|s| s.wrapping_add(0x5eed)));

        for ride in &self.rides {
            handles.push(spawn_agent(self.clock.clone(), ride.clone())?);
        }
        for truck in &self.food_trucks {
            handles.push(spawn_agent(self.clock.clone(), truck.clone())?);
        }
        for stand in &self.merch_stands {
            handles.push(spawn_agent(self.clock.clone(), stand.clone())?);
        }
        for bathroom in &self.bathrooms {
            handles.push(spawn_agent(self.clock.clone(), bathroom.clone())?);
        }
        for i in 0..self.config.janitor_count {
            let zone = DEFAULT_ZONES[i % DEFAULT_ZONES.len()];
            let janitor = Janitor::new(
                format!("Janitor-{}", i + 1),
                zone,
                self.clock.clone(),
                self.cleanliness.clone(),
                seeds.next_rng(),
            );
            handles.push(spawn_agent(self.clock.clone(), janitor)?);
        }

        let metrics: Arc<dyn crate::simulation::MetricsSink> = self.statistics.clone();
        let sweep =
            CleanlinessSweep::new(self.cleanliness.clone(), self.clock.clone(), Some(metrics));
        handles.push(spawn_agent(self.clock.clone(), sweep)?);

        info!(agents = handles.len(), "park is open");
        Ok(())
    }

    /// Block until the clock's stop latch is set, either by the configured
    /// maximum minute or by an external [`VirtualClock::stop`]. Polls the
    /// clock so the auto-shutdown side effect of `now()` fires even when no
    /// other agent reads it.
    pub fn run_until_close(&self) {
        while !self.clock.should_stop() {
            let minute = self.clock.now();
            debug!(minute, "park running");
            self.clock.sleep_minutes(1);
        }
    }

    /// Stop the clock, close every facility, and join all agent threads.
    pub fn shutdown(&self) {
        info!("closing the park");
        self.clock.stop();
        for ride in &self.rides {
            ride.close();
        }
        for truck in &self.food_trucks {
            truck.close();
        }
        for stand in &self.merch_stands {
            stand.close();
        }
        for bathroom in &self.bathrooms {
            bathroom.close();
        }

        let handles = std::mem::take(&mut *self.handles.lock().unwrap());
        for handle in handles {
            if handle.join().is_err() {
                warn!("an agent thread panicked during the run");
            }
        }
        info!("park closed");
    }
}

impl std::fmt::Debug for Park {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Park")
            .field("rides", &self.rides.len())
            .field("food_trucks", &self.food_trucks.len())
            .field("merch_stands", &self.merch_stands.len())
            .field("bathrooms", &self.bathrooms.len())
            .finish()
    }
}

/// Hands out per-agent RNGs: deterministic streams derived from the
/// configured seed, or entropy-based when no seed is set.
struct SeedSequence {
    seed: Option<u64>,
    next: u64,
}

impl SeedSequence {
    fn new(seed: Option<u64>) -> Self {
        Self { seed, next: 0 }
    }

    fn next_rng(&mut self) -> StdRng {
        match self.seed {
            Some(seed) => {
                let rng = StdRng::seed_from_u64(seed.wrapping_add(self.next));
                self.next += 1;
                rng
            }
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClockConfig, RideConfig};

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            clock: ClockConfig { speed_factor: 0.0005, max_minutes: Some(30) },
            rides: vec![RideConfig {
                name: "MiniCoaster".to_string(),
                capacity: 4,
                run_duration: 1,
                break_probability: 0.0,
                repair_time: 5,
                board_window: 2,
                min_height_cm: 0,
            }],
            food_truck_count: 1,
            merch_stand_count: 1,
            bathroom_count: 1,
            janitor_count: 1,
            seed: Some(99),
        }
    }

    #[test]
    fn builds_all_facilities_from_config() {
        let park = Park::new(small_config()).unwrap();
        assert_eq!(park.rides().len(), 1);
        assert_eq!(park.food_trucks().len(), 1);
        assert_eq!(park.merch_stands().len(), 1);
        assert_eq!(park.bathrooms().len(), 1);
        assert!(park.ride("MiniCoaster").is_some());
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = small_config();
        config.rides[0].capacity = 0;
        assert!(Park::new(config).is_err());
    }

    #[test]
    fn maintenance_request_for_unknown_ride_fails_fast() {
        let park = Park::new(small_config()).unwrap();
        let result = park.request_maintenance("GhostTrain", 10);
        assert!(result.is_err());
        // The known ride is untouched
        assert_eq!(park.ride("MiniCoaster").unwrap().state_name(), "OPEN");
    }

    #[test]
    fn maintenance_request_transitions_ride() {
        let park = Park::new(small_config()).unwrap();
        park.request_maintenance("MiniCoaster", 10).unwrap();
        assert_eq!(park.ride("MiniCoaster").unwrap().state_name(), "MAINTENANCE");
    }

    #[test]
    fn open_run_shutdown_completes() {
        let park = Park::new(small_config()).unwrap();
        park.open().unwrap();
        park.run_until_close();
        park.shutdown();
        assert!(park.clock().should_stop());
    }
}
