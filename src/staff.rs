//! Staff agents
//!
//! Janitors are the staff side of the zone model: each one is assigned a
//! zone and restores cleanliness when it drops below a threshold. They run
//! the same polling agent loop as every other entity.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use crate::clock::VirtualClock;
use crate::simulation::agent::{Agent, Step};
use crate::zone::CleanlinessManager;

/// A janitor starts cleaning when the assigned zone drops below this value.
const CLEANING_THRESHOLD: f64 = 70.0;

/// A janitor assigned to one zone.
pub struct Janitor {
    name: String,
    zone: String,
    clock: Arc<VirtualClock>,
    cleanliness: Arc<CleanlinessManager>,
    rng: Mutex<StdRng>,
}

impl Janitor {
    /// Create a janitor for a zone.
    pub fn new(
        name: impl Into<String>,
        zone: impl Into<String>,
        clock: Arc<VirtualClock>,
        cleanliness: Arc<CleanlinessManager>,
        rng: StdRng,
    ) -> Self {
        Self {
            name: name.into(),
            zone: zone.into(),
            clock,
            cleanliness,
            rng: Mutex::new(rng),
        }
    }

    /// Assigned zone name.
    pub fn zone(&self) -> &str {
        &self.zone
    }
}

impl std::fmt::Debug for Janitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Janitor").field("name", &self.name).field("zone", &self.zone).finish()
    }
}

impl Agent for Janitor {
    fn name(&self) -> String {
        format!("janitor-{}", self.name)
    }

    fn step(&mut self) -> Step {
        if self.cleanliness.cleanliness(&self.zone) >= CLEANING_THRESHOLD {
            // Zone is fine, patrol for a few minutes
            let pause = self.rng.lock().unwrap().gen_range(2..=5);
            return Step::Continue { idle_minutes: pause };
        }

        let (work_minutes, improvement) = {
            let mut rng = self.rng.lock().unwrap();
            (rng.gen_range(3..=6), rng.gen_range(10..=20) as f64)
        };
        self.clock.sleep_minutes(work_minutes);
        self.cleanliness.clean(&self.zone, improvement);
        info!(
            janitor = %self.name,
            zone = %self.zone,
            improvement,
            cleanliness = self.cleanliness.cleanliness(&self.zone),
            "zone cleaned"
        );
        Step::Continue { idle_minutes: 1 }
    }
}
