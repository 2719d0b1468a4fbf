//! Virtual simulation clock
//!
//! Central time keeper for a simulation run. Real elapsed time is converted
//! into a monotonic counter of simulated minutes via a speed factor, and a
//! shared stop latch tells every agent loop when the run is over.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Guarded clock state: the origin instant and the stop latch.
#[derive(Debug, Default)]
struct ClockState {
    start: Option<Instant>,
    stopped: bool,
}

/// Converts real elapsed time into simulated minutes.
///
/// One instance is shared (via `Arc`) by every agent in a run. `speed_factor`
/// is the number of real seconds per simulated minute, so `0.05` means a
/// simulated minute passes every 50ms of wall time.
///
/// Reading the current minute with [`VirtualClock::now`] has one deliberate
/// side effect: when a maximum minute is configured and the computed minute
/// reaches it, the stop latch is set permanently. Auto-shutdown therefore
/// happens on whichever agent happens to read the clock first after the
/// deadline.
#[derive(Debug)]
pub struct VirtualClock {
    speed_factor: f64,
    max_minutes: Option<u64>,
    state: Mutex<ClockState>,
}

impl VirtualClock {
    /// Create a clock that runs until explicitly stopped.
    pub fn new(speed_factor: f64) -> Self {
        Self { speed_factor, max_minutes: None, state: Mutex::new(ClockState::default()) }
    }

    /// Create a clock that latches its stop flag once `max_minutes` is reached.
    pub fn with_max_minutes(speed_factor: f64, max_minutes: u64) -> Self {
        Self {
            speed_factor,
            max_minutes: Some(max_minutes),
            state: Mutex::new(ClockState::default()),
        }
    }

    /// Real seconds per simulated minute.
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Start the clock: record the origin instant and clear the stop latch.
    pub fn start(&self) {
        let mut state = self.state.lock().unwrap();
        state.start = Some(Instant::now());
        state.stopped = false;
        info!(speed_factor = self.speed_factor, "simulation clock started");
    }

    /// Current simulated minute. Returns 0 before [`VirtualClock::start`].
    ///
    /// Latches the stop flag as a side effect once the configured maximum
    /// minute is reached.
    pub fn now(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        let Some(start) = state.start else {
            return 0;
        };
        let minute = (start.elapsed().as_secs_f64() / self.speed_factor) as u64;
        if let Some(max) = self.max_minutes {
            if minute >= max && !state.stopped {
                debug!(minute, max, "maximum simulated minute reached, stopping");
                state.stopped = true;
            }
        }
        minute
    }

    /// Suspend the calling thread for `minutes` simulated minutes.
    ///
    /// Sleeps without holding the clock lock, so sleeping agents never block
    /// clock reads from other threads.
    pub fn sleep_minutes(&self, minutes: u64) {
        if minutes == 0 {
            return;
        }
        thread::sleep(Duration::from_secs_f64(minutes as f64 * self.speed_factor));
    }

    /// Whether the stop latch has been set (pure read).
    pub fn should_stop(&self) -> bool {
        self.state.lock().unwrap().stopped
    }

    /// Set the stop latch. Idempotent; used for manual shutdown.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.stopped {
            info!("simulation clock stopped");
        }
        state.stopped = true;
    }
}
