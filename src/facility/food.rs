//! Food truck agents
//!
//! A food truck is the simplest shape of facility: a two-phase idle/serve
//! loop over a shared [`AdmissionQueue`]. No batching, no breakdowns — the
//! only failure is the business rule that a visitor cannot afford anything
//! on the menu, and that failure changes the visitor's outcome, never the
//! truck's state.

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

/// Menu items and prices shared by every food truck.
const MENU: [(&str, u32); 8] = [
    ("hot_dog", 5),
    ("burger", 8),
    ("fries", 4),
    ("pizza_slice", 6),
    ("nachos", 7),
    ("ice_cream", 4),
    ("soda", 3),
    ("water", 2),
];

/// A single-server food facility. Always accepts queue joins; serves one
/// entrant at a time with a 1-3 minute service time.
pub struct FoodTruck {
    name: String,
    queue: Arc<AdmissionQueue>,
    clock: Arc<VirtualClock>,
    metrics: Option<Arc<dyn MetricsSink>>,
    open: AtomicBool,
    revenue: AtomicU64,
    rng: Mutex<StdRng>,
}

impl FoodTruck {
    /// Create an open food truck.
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

    /// Truck name, as used in logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The truck's waiting line.
    pub fn queue(&self) -> &Arc<AdmissionQueue> {
        &self.queue
    }

    /// Total revenue taken so far.
    pub fn revenue(&self) -> u64 {
        self.revenue.load(Ordering::Relaxed)
    }

    /// Close the truck; its agent loop exits on the next step.
    pub fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    /// Serve one entrant: pick a random item they can afford, charge them,
    /// and notify. An entrant who can afford nothing gets a failure
    /// notification and is never retried.
    fn serve(&self, entrant: Arc<dyn Entrant>) {
        let affordable: Vec<(&str, u32)> =
            MENU.iter().copied().filter(|&(_, price)| entrant.funds() >= price).collect();

        if affordable.is_empty() {
            debug!(truck = %self.name, visitor = %entrant.id(), "visitor cannot afford any item");
            entrant.on_service_failed(&self.name, self.clock.now());
            return;
        }

        let (item, price, service_minutes) = {
            let mut rng = self.rng.lock().unwrap();
            let &(item, price) = affordable.choose(&mut *rng).unwrap();
            (item, price, rng.gen_range(1..=3))
        };

        self.clock.sleep_minutes(service_minutes);

        if !entrant.try_spend(price) {
            // Funds changed while we were cooking; treat it as unaffordable
            entrant.on_service_failed(&self.name, self.clock.now());
            return;
        }

        self.revenue.fetch_add(price as u64, Ordering::Relaxed);
        let minute = self.clock.now();
        info!(truck = %self.name, visitor = %entrant.id(), item, price, "order served");
        if let Some(metrics) = &self.metrics {
            metrics.record_purchase(entrant.id(), &self.name, item, price, minute);
        }
        entrant.on_service_complete(&self.name, minute);
    }
}

impl std::fmt::Debug for FoodTruck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodTruck")
            .field("name", &self.name)
            .field("queue_depth", &self.queue.len())
            .field("revenue", &self.revenue())
            .finish()
    }
}

impl Agent for Arc<FoodTruck> {
    fn name(&self) -> String {
        format!("food-{}", self.name)
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
            None => Step::Continue { idle_minutes: 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VisitorId;
    use rand::SeedableRng;
    use std::sync::atomic::AtomicU32;

    struct Customer {
        id: VisitorId,
        money: AtomicU32,
        served: AtomicBool,
        failed: AtomicBool,
    }

    impl Customer {
        fn with_money(money: u32) -> Arc<Self> {
            Arc::new(Self {
                id: VisitorId::new(),
                money: AtomicU32::new(money),
                served: AtomicBool::new(false),
                failed: AtomicBool::new(false),
            })
        }
    }

    impl Entrant for Customer {
        fn id(&self) -> VisitorId {
            self.id
        }

        fn on_service_complete(&self, _facility: &str, _minute: u64) {
            self.served.store(true, Ordering::Relaxed);
        }

        fn on_service_failed(&self, _facility: &str, _minute: u64) {
            self.failed.store(true, Ordering::Relaxed);
        }

        fn funds(&self) -> u32 {
            self.money.load(Ordering::Relaxed)
        }

        fn try_spend(&self, price: u32) -> bool {
            let mut current = self.money.load(Ordering::Relaxed);
            loop {
                if current < price {
                    return false;
                }
                match self.money.compare_exchange(
                    current,
                    current - price,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return true,
                    Err(actual) => current = actual,
                }
            }
        }
    }

    fn truck() -> FoodTruck {
        let clock = Arc::new(VirtualClock::new(0.0001));
        clock.start();
        FoodTruck::new(
            "FoodTruck-1",
            Arc::new(AdmissionQueue::new()),
            clock,
            None,
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn serves_paying_customer() {
        let truck = truck();
        let customer = Customer::with_money(50);
        truck.serve(customer.clone());

        assert!(customer.served.load(Ordering::Relaxed));
        assert!(!customer.failed.load(Ordering::Relaxed));
        assert!(customer.funds() < 50);
        assert!(truck.revenue() > 0);
    }

    #[test]
    fn broke_customer_gets_failure_notification() {
        let truck = truck();
        let customer = Customer::with_money(1); // cheapest item costs 2
        truck.serve(customer.clone());

        assert!(!customer.served.load(Ordering::Relaxed));
        assert!(customer.failed.load(Ordering::Relaxed));
        assert_eq!(customer.funds(), 1);
        assert_eq!(truck.revenue(), 0);
    }

    #[test]
    fn idle_step_pauses_one_minute() {
        let mut agent = Arc::new(truck());
        assert_eq!(agent.step(), Step::Continue { idle_minutes: 1 });
    }

    #[test]
    fn closed_truck_finishes() {
        let mut agent = Arc::new(truck());
        agent.close();
        assert_eq!(agent.step(), Step::Finished);
    }
}
