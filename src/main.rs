// Park Simulator - Main Entry Point
//
// Runs the full park with a thin demo crowd so there is something to watch:
//
// ```console
// $ cargo run --release -- --verbose
// $ cargo run --release -- --park-minutes 120 --seed 42
// ```
//
// The demo visitors implemented here are intentionally simple (pick a random
// facility, wait, repeat); real visitor modeling belongs outside the core
// library and talks to it through the same `Entrant` trait.

use std::process;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use park_simulator::simulation::{Agent, LoggingConfig, Park, Step};
use park_simulator::types::config::CliArgs;
use park_simulator::types::{SimulationConfig, VisitorId};
use park_simulator::{spawn_agent, AdmissionQueue, Entrant};

/// Demo crowd size.
const DEMO_VISITOR_COUNT: usize = 60;

fn main() {
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };
    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    if args.dry_run {
        eprintln!("Configuration is valid; dry run requested, not starting the park.");
        return;
    }

    let seed = config.seed;
    let park = match Park::new(config) {
        Ok(park) => Arc::new(park),
        Err(e) => {
            error!("Failed to build the park: {}", e);
            process::exit(1);
        }
    };

    info!("opening the park");
    if let Err(e) = park.open() {
        error!("Failed to open the park: {}", e);
        process::exit(1);
    }
    spawn_demo_visitors(&park, seed);
    park.run_until_close();
    park.shutdown();

    println!("{}", park.statistics().summary());
}

/// A demo visitor: a wallet, a served/failed flag, nothing else.
struct DemoVisitor {
    id: VisitorId,
    money: AtomicU32,
    notified: AtomicBool,
}

impl DemoVisitor {
    fn new(money: u32) -> Self {
        Self { id: VisitorId::new(), money: AtomicU32::new(money), notified: AtomicBool::new(false) }
    }
}

impl Entrant for DemoVisitor {
    fn id(&self) -> VisitorId {
        self.id
    }

    fn on_service_complete(&self, _facility: &str, _minute: u64) {
        self.notified.store(true, Ordering::Relaxed);
    }

    fn on_service_failed(&self, _facility: &str, _minute: u64) {
        self.notified.store(true, Ordering::Relaxed);
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

/// Visitor thread body: join a random line, poll until notified, wander,
/// repeat until the park closes.
struct DemoVisitorAgent {
    visitor: Arc<DemoVisitor>,
    park: Arc<Park>,
    waiting_in: Option<Arc<AdmissionQueue>>,
    rng: StdRng,
}

impl Agent for DemoVisitorAgent {
    fn name(&self) -> String {
        format!("visitor-{}", self.visitor.id)
    }

    fn step(&mut self) -> Step {
        if let Some(queue) = &self.waiting_in {
            // Still in line, or served but not yet notified: poll again next minute
            if queue.contains(self.visitor.id) || !self.visitor.notified.load(Ordering::Relaxed) {
                return Step::Continue { idle_minutes: 1 };
            }
            self.waiting_in = None;
            self.visitor.notified.store(false, Ordering::Relaxed);
            // Wander between facilities, wearing the pathways down a little
            self.park.cleanliness().degrade("pathways", 0.05);
            return Step::Continue { idle_minutes: self.rng.gen_range(1..=5) };
        }

        let queue = self.pick_queue();
        if let Some(queue) = queue {
            let priority = self.rng.gen_bool(0.2);
            queue.enqueue(self.visitor.clone(), priority);
            self.waiting_in = Some(queue);
        }
        Step::Continue { idle_minutes: 1 }
    }
}

impl DemoVisitorAgent {
    fn pick_queue(&mut self) -> Option<Arc<AdmissionQueue>> {
        match self.rng.gen_range(0..4u8) {
            0 => {
                let rides = self.park.rides();
                let ride = &rides[self.rng.gen_range(0..rides.len())];
                if !ride.is_operational() {
                    return None;
                }
                self.park.cleanliness().degrade("rides", 0.1);
                Some(ride.queue().clone())
            }
            1 => {
                let trucks = self.park.food_trucks();
                let truck = &trucks[self.rng.gen_range(0..trucks.len())];
                self.park.cleanliness().degrade("food_court", 0.1);
                Some(truck.queue().clone())
            }
            2 => {
                let stands = self.park.merch_stands();
                let stand = &stands[self.rng.gen_range(0..stands.len())];
                Some(stand.queue().clone())
            }
            _ => {
                let bathrooms = self.park.bathrooms();
                let bathroom = &bathrooms[self.rng.gen_range(0..bathrooms.len())];
                self.park.cleanliness().degrade("bathrooms", 0.1);
                Some(bathroom.queue().clone())
            }
        }
    }
}

fn spawn_demo_visitors(park: &Arc<Park>, seed: Option<u64>) {
    for i in 0..DEMO_VISITOR_COUNT {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1000 + i as u64)),
            None => StdRng::from_entropy(),
        };
        let money = rng.gen_range(20..=120);
        let agent = DemoVisitorAgent {
            visitor: Arc::new(DemoVisitor::new(money)),
            park: park.clone(),
            waiting_in: None,
            rng,
        };
        // Threads exit on the clock's stop latch; handles are detached
        if let Err(e) = spawn_agent(park.clock().clone(), agent) {
            tracing::warn!("could not spawn a demo visitor: {}", e);
        }
    }
}
