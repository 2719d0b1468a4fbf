//! The shared agent-loop pattern
//!
//! Every concurrent entity in the park — ride, food truck, merch stand,
//! bathroom, janitor, the cleanliness sweep — runs the same thread body:
//! consult the clock, act once, sleep some number of simulated minutes,
//! repeat until the shared stop latch is set or the agent finishes on its
//! own.
//!
//! This is cooperative polling, not event-driven wakeup. An agent waiting on
//! a queue discovers that its turn came only by re-checking the queue every
//! simulated minute, so worst-case notification latency is one simulated
//! minute — acceptable because minutes are coarse relative to service
//! durations. Shutdown latency is likewise bounded by the current sleep: an
//! agent mid-service finishes that service before observing stop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::clock::VirtualClock;
use crate::simulation::{SimulationError, SimulationResult};

/// Outcome of one agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep running; sleep this many simulated minutes first (0 = go again
    /// immediately, used after a service that slept internally).
    Continue {
        /// Simulated minutes to sleep before the next step.
        idle_minutes: u64,
    },
    /// The agent is done (facility closed, shift over); exit the loop.
    Finished,
}

/// A concurrent entity driven by the shared polling loop.
///
/// `step` performs one unit of work and reports how long to idle before the
/// next one. Implementations must swallow per-iteration business failures;
/// nothing an agent does should panic across the loop boundary.
pub trait Agent: Send {
    /// Name used in logs when the agent starts and exits.
    fn name(&self) -> String;

    /// Perform one unit of work.
    fn step(&mut self) -> Step;
}

/// Spawn an agent on its own OS thread, looping until the clock's stop latch
/// is set or the agent reports [`Step::Finished`].
pub fn spawn_agent<A>(clock: Arc<VirtualClock>, mut agent: A) -> SimulationResult<JoinHandle<()>>
where
    A: Agent + 'static,
{
    let name = agent.name();
    thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            debug!(agent = %name, "agent started");
            while !clock.should_stop() {
                match agent.step() {
                    Step::Continue { idle_minutes } => clock.sleep_minutes(idle_minutes),
                    Step::Finished => break,
                }
            }
            debug!(agent = %name, "agent exited");
        })
        .map_err(|e| SimulationError::agent_error(format!("failed to spawn agent thread: {}", e)))
}
