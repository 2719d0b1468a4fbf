//! Bathroom agents
//!
//! The minimal facility: one occupant at a time, 2-6 simulated minutes of
//! occupancy, no money involved. Structurally the same idle/serve loop as
//! the food truck and merch stand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::clock::VirtualClock;
use crate::facility::Entrant;
use crate::queue::AdmissionQueue;
use crate::simulation::agent::{Agent, Step};
use crate::simulation::MetricsSink;

/// A single-occupancy bathroom.
pub struct Bathroom {
    name: String,
    queue: Arc<AdmissionQueue>,
    clock: Arc<VirtualClock>,
    metrics: Option<Arc<dyn MetricsSink>>,
    open: AtomicBool,
    rng: Mutex<StdRng>,
}

impl Bathroom {
    /// Create an open bathroom.
    pub fn new(
        name: impl Into<String>,
        queue: Arc<AdmissionQueue>,
        clock: Arc<VirtualClock>,
        metrics: Option<Arc<dyn MetricsSink>>,
        rng: StdRng,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            clock,
            metrics,
            open: AtomicBool::new(true),
            rng: Mutex::new(rng),
        }
    }

    /// Bathroom name, as used in logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bathroom's waiting line.
    pub fn queue(&self) -> &Arc<AdmissionQueue> {
        &self.queue
    }

    /// Close the bathroom; its agent loop exits on the next step.
    pub fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    /// Let one entrant in for a 2-6 minute occupancy.
    fn serve(&self, entrant: Arc<dyn Entrant>) {
        let occupancy_minutes = self.rng.lock().unwrap().gen_range(2..=6);
        debug!(bathroom = %self.name, visitor = %entrant.id(), occupancy_minutes, "occupied");
        self.clock.sleep_minutes(occupancy_minutes);

        let minute = self.clock.now();
        if let Some(metrics) = &self.metrics {
            metrics.record_bathroom_visit(entrant.id(), &self.name, minute);
        }
        entrant.on_service_complete(&self.name, minute);
    }

    /// Random idle pause when nobody is waiting, 1-3 simulated minutes.
    fn idle_pause(&self) -> u64 {
        self.rng.lock().unwrap().gen_range(1..=3)
    }
}

impl std::fmt::Debug for Bathroom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bathroom")
            .field("name", &self.name)
            .field("queue_depth", &self.queue.len())
            .finish()
    }
}

impl Agent for Arc<Bathroom> {
    fn name(&self) -> String {
        format!("bathroom-{}", self.name)
    }

    fn step(&mut self) -> Step {
        if !self.open.load(Ordering::Relaxed) {
            return Step::Finished;
        }
        match self.queue.dequeue_one() {
            Some(entrant) => {
                self.serve(entrant);
                Step::Continue { idle_minutes: 0 }
            }
            None => Step::Continue { idle_minutes: self.idle_pause() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationStatistics;
    use crate::types::VisitorId;
    use rand::SeedableRng;

    struct Visitor {
        id: VisitorId,
        served: AtomicBool,
    }

    impl Entrant for Visitor {
        fn id(&self) -> VisitorId {
            self.id
        }
        fn on_service_complete(&self, _facility: &str, _minute: u64) {
            self.served.store(true, Ordering::Relaxed);
        }
    }

    #[test]
    fn visit_is_recorded_and_visitor_notified() {
        let clock = Arc::new(VirtualClock::new(0.0001));
        clock.start();
        let stats = Arc::new(SimulationStatistics::new());
        let bathroom = Bathroom::new(
            "Bathroom-1",
            Arc::new(AdmissionQueue::new()),
            clock,
            Some(stats.clone()),
            StdRng::seed_from_u64(3),
        );

        let visitor =
            Arc::new(Visitor { id: VisitorId::new(), served: AtomicBool::new(false) });
        bathroom.serve(visitor.clone());

        assert!(visitor.served.load(Ordering::Relaxed));
        assert_eq!(stats.bathroom_visit_count(), 1);
    }

    #[test]
    fn idle_pause_is_one_to_three_minutes() {
        let clock = Arc::new(VirtualClock::new(0.0001));
        let bathroom = Bathroom::new(
            "Bathroom-1",
            Arc::new(AdmissionQueue::new()),
            clock,
            None,
            StdRng::seed_from_u64(4),
        );
        for _ in 0..50 {
            assert!((1..=3).contains(&bathroom.idle_pause()));
        }
    }
}
