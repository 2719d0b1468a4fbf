//! Merchandise stand agents
//!
//! Same two-phase idle/serve shape as the food truck. A stand offers one
//! random product per customer; a customer who cannot afford it walks away
//! with a failure notification and no retry.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::clock::VirtualClock;
use crate::facility::Entrant;
use crate::queue::AdmissionQueue;
use crate::simulation::agent::{Agent, Step};
use crate::simulation::MetricsSink;

/// Products and prices shared by every stand.
const PRODUCTS: [(&str, u32); 6] = [
    ("T-shirt", 20),
    ("Hat", 15),
    ("Poster", 10),
    ("Sticker", 5),
    ("Hoodie", 30),
    ("Keychain", 7),
];

/// A single-server merchandise stand.
pub struct MerchStand {
    name: String,
    queue: Arc<AdmissionQueue>,
    clock: Arc<VirtualClock>,
    metrics: Option<Arc<dyn MetricsSink>>,
    open: AtomicBool,
    revenue: AtomicU64,
    rng: Mutex<StdRng>,
}

impl MerchStand {
    /// Create an open merchandise stand.
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
            revenue: AtomicU64::new(0),
            rng: Mutex::new(rng),
        }
    }

    /// Stand name, as used in logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stand's waiting line.
    pub fn queue(&self) -> &Arc<AdmissionQueue> {
        &self.queue
    }

    /// Total revenue taken so far.
    pub fn revenue(&self) -> u64 {
        self.revenue.load(Ordering::Relaxed)
    }

    /// Close the stand; its agent loop exits on the next step.
    pub fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    /// Offer one random product to the entrant at the head of the line.
    fn serve(&self, entrant: Arc<dyn Entrant>) {
        let (product, price, processing_minutes) = {
            let mut rng = self.rng.lock().unwrap();
            let &(product, price) = PRODUCTS.choose(&mut *rng).unwrap();
            (product, price, rng.gen_range(1..=2))
        };

        if !entrant.try_spend(price) {
            debug!(stand = %self.name, visitor = %entrant.id(), product, price, "cannot afford product");
            entrant.on_service_failed(&self.name, self.clock.now());
            return;
        }

        self.revenue.fetch_add(price as u64, Ordering::Relaxed);
        self.clock.sleep_minutes(processing_minutes);

        let minute = self.clock.now();
        info!(stand = %self.name, visitor = %entrant.id(), product, price, "sale completed");
        if let Some(metrics) = &self.metrics {
            metrics.record_purchase(entrant.id(), &self.name, product, price, minute);
        }
        entrant.on_service_complete(&self.name, minute);
    }

    /// Random idle pause when nobody is waiting, 1-4 simulated minutes.
    fn idle_pause(&self) -> u64 {
        self.rng.lock().unwrap().gen_range(1..=4)
    }
}

impl std::fmt::Debug for MerchStand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchStand")
            .field("name", &self.name)
            .field("queue_depth", &self.queue.len())
            .field("revenue", &self.revenue())
            .finish()
    }
}

impl Agent for Arc<MerchStand> {
    fn name(&self) -> String {
        format!("merch-{}", self.name)
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
