//! Ride agents
//!
//! Each ride runs on its own thread, ticking once per simulated minute and
//! driving the [`RideState`] machine: wait for arrivals, board a batch, run a
//! timed cycle, notify every rider, and occasionally break down. The queue
//! and the state are the only shared surfaces; visitors interact with a ride
//! exclusively through [`AdmissionQueue`] and the operational checks here.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::VirtualClock;
use crate::facility::state::RideState;
use crate::facility::Entrant;
use crate::queue::AdmissionQueue;
use crate::simulation::agent::{Agent, Step};
use crate::simulation::MetricsSink;
use crate::types::RideConfig;

/// An amusement ride: a batching facility with four operational states.
///
/// The state pointer is guarded by one mutex; every transition swaps the old
/// state for the new one under a single critical section, so entry
/// adjustments never race with a concurrent transition. The blocking service
/// cycle runs *outside* that lock (the ride stays in `Boarding` while the
/// cycle is in flight), and no ride method ever holds the state lock while
/// touching the queue lock.
pub struct Ride {
    config: RideConfig,
    queue: Arc<AdmissionQueue>,
    clock: Arc<VirtualClock>,
    metrics: Option<Arc<dyn MetricsSink>>,
    state: Mutex<RideState>,
    open: AtomicBool,
    total_riders: AtomicU64,
    rng: Mutex<StdRng>,
}

impl Ride {
    /// Create a ride in the open state.
    pub fn new(
        config: RideConfig,
        queue: Arc<AdmissionQueue>,
        clock: Arc<VirtualClock>,
        metrics: Option<Arc<dyn MetricsSink>>,
        rng: StdRng,
    ) -> Self {
        Self {
            config,
            queue,
            clock,
            metrics,
            state: Mutex::new(RideState::Open),
            open: AtomicBool::new(true),
            total_riders: AtomicU64::new(0),
            rng: Mutex::new(rng),
        }
    }

    /// Ride name, as used in logs and metrics.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The ride's waiting line. Visitors enqueue here.
    pub fn queue(&self) -> &Arc<AdmissionQueue> {
        &self.queue
    }

    /// Minimum rider height in centimeters (0 = unrestricted). Checked by
    /// visitors before joining the queue, not enforced by the ride.
    pub fn min_height_cm(&self) -> u32 {
        self.config.min_height_cm
    }

    /// Whether visitors may currently join the queue (open or boarding).
    pub fn is_operational(&self) -> bool {
        self.state.lock().unwrap().can_enqueue()
    }

    /// Label of the current state ("OPEN", "BOARDING", ...).
    pub fn state_name(&self) -> &'static str {
        self.state.lock().unwrap().name()
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> RideState {
        *self.state.lock().unwrap()
    }

    /// Riders served since the ride opened.
    pub fn total_riders(&self) -> u64 {
        self.total_riders.load(Ordering::Relaxed)
    }

    /// Permanently close the ride; its agent loop exits on the next step.
    pub fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    /// Take the ride down for scheduled maintenance, immediately and
    /// regardless of its current state. Waiting visitors stay in the queue.
    pub fn schedule_maintenance(&self, minutes: u64) {
        self.transition(RideState::Maintenance { remaining: minutes });
        if let Some(metrics) = &self.metrics {
            metrics.record_maintenance(self.name(), self.clock.now(), minutes.max(1));
        }
    }

    /// Swap to a new state: exit the old one, normalize the new one's entry
    /// payload, and install it, all under one critical section.
    fn transition(&self, next: RideState) {
        let mut state = self.state.lock().unwrap();
        let entered = next.normalized_on_entry();
        debug!(ride = self.name(), from = state.name(), to = entered.name(), "state transition");
        match entered {
            RideState::Broken { remaining } => {
                warn!(ride = self.name(), repair_minutes = remaining, "ride has broken down");
            }
            RideState::Maintenance { remaining } => {
                info!(ride = self.name(), minutes = remaining, "ride closed for maintenance");
            }
            RideState::Open if !state.can_enqueue() => {
                info!(ride = self.name(), "ride is operational again");
            }
            _ => {}
        }
        *state = entered;
    }

    /// One simulated-minute tick. Called by the agent loop.
    pub fn tick(&self) {
        // Depth snapshot taken before the state lock: no ride method ever
        // holds the state mutex while acquiring the queue mutex.
        let queue_depth = self.queue.len();

        // Decide under the state lock, act (block) outside it.
        let boarding_window = {
            let mut state = self.state.lock().unwrap();
            match *state {
                RideState::Open => {
                    if queue_depth > 0 {
                        *state = RideState::Boarding { minutes_in_window: 0 };
                        debug!(ride = self.name(), "arrivals waiting, boarding started");
                    }
                    return;
                }
                RideState::Boarding { minutes_in_window } => {
                    let window = minutes_in_window + 1;
                    *state = RideState::Boarding { minutes_in_window: window };
                    window
                }
                RideState::Broken { remaining } => {
                    let remaining = remaining.saturating_sub(1);
                    if remaining == 0 {
                        drop(state);
                        self.transition(RideState::Open);
                    } else {
                        *state = RideState::Broken { remaining };
                    }
                    return;
                }
                RideState::Maintenance { remaining } => {
                    let remaining = remaining.saturating_sub(1);
                    if remaining == 0 {
                        drop(state);
                        self.transition(RideState::Open);
                    } else {
                        *state = RideState::Maintenance { remaining };
                    }
                    return;
                }
            }
        };

        // Boarding: pull a batch with the state lock released.
        let batch = self.queue.dequeue_batch(self.config.capacity);
        if !batch.is_empty() {
            self.run_cycle(batch);
        } else if boarding_window >= self.config.board_window {
            // Nobody showed up within the window
            debug!(ride = self.name(), "boarding window expired empty");
            self.transition(RideState::Open);
        }
    }

    /// Run one full service cycle with a boarded batch, then roll for a
    /// breakdown. Blocks for `run_duration` + 1 turnaround minute.
    fn run_cycle(&self, batch: Vec<Arc<dyn Entrant>>) {
        info!(ride = self.name(), riders = batch.len(), "cycle started");
        self.clock.sleep_minutes(self.config.run_duration);

        self.total_riders.fetch_add(batch.len() as u64, Ordering::Relaxed);
        let minute = self.clock.now();
        for entrant in &batch {
            if let Some(metrics) = &self.metrics {
                metrics.record_ride_completion(entrant.id(), self.name(), minute);
            }
            entrant.on_service_complete(self.name(), minute);
        }

        // Turnaround before the next boarding
        self.clock.sleep_minutes(1);

        // Independent breakdown roll per cycle (memoryless)
        let broke_down = self.rng.lock().unwrap().gen::<f64>() < self.config.break_probability;
        if broke_down {
            if let Some(metrics) = &self.metrics {
                metrics.record_breakdown(
                    self.name(),
                    self.clock.now(),
                    self.config.repair_time,
                );
            }
            self.transition(RideState::Broken { remaining: self.config.repair_time });
        } else {
            self.transition(RideState::Open);
        }
    }
}

impl std::fmt::Debug for Ride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ride")
            .field("name", &self.config.name)
            .field("state", &self.state_name())
            .field("queue_depth", &self.queue.len())
            .field("total_riders", &self.total_riders())
            .finish()
    }
}

impl Agent for Arc<Ride> {
    fn name(&self) -> String {
        format!("ride-{}", self.config.name)
    }

    fn step(&mut self) -> Step {
        if !self.open.load(Ordering::Relaxed) {
            return Step::Finished;
        }
        self.tick();
        Step::Continue { idle_minutes: 1 }
    }
}
