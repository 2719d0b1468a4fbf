//! Metrics recording
//!
//! Facilities report what happens to them — completed rides, breakdowns,
//! maintenance, purchases, bathroom visits, cleanliness samples — through
//! the fire-and-forget [`MetricsSink`] trait. The core never blocks on a
//! sink and runs fine without one (facilities hold `Option<Arc<dyn
//! MetricsSink>>`; absent means no-op). Persistence backends live outside
//! this crate; [`SimulationStatistics`] is the in-memory implementation used
//! by the orchestrator and the test suite.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::VisitorId;

/// Fire-and-forget recording surface offered to facilities.
///
/// Implementations must be cheap and non-blocking; facilities call these from
/// inside their service loops.
pub trait MetricsSink: Send + Sync {
    /// A visitor finished a ride cycle.
    fn record_ride_completion(&self, visitor: VisitorId, ride: &str, minute: u64);

    /// A ride broke down after a cycle.
    fn record_breakdown(&self, ride: &str, minute: u64, repair_minutes: u64);

    /// A ride was taken down for scheduled maintenance.
    fn record_maintenance(&self, ride: &str, minute: u64, duration_minutes: u64);

    /// A visitor bought something at a food truck or merch stand.
    fn record_purchase(&self, visitor: VisitorId, facility: &str, item: &str, amount: u32, minute: u64);

    /// A visitor finished using a bathroom.
    fn record_bathroom_visit(&self, visitor: VisitorId, bathroom: &str, minute: u64);

    /// Periodic cleanliness reading for a zone.
    fn record_cleanliness_sample(&self, zone: &str, value: f64, minute: u64);
}

#[derive(Debug, Default)]
struct Counters {
    riders_per_ride: HashMap<String, u64>,
    breakdowns_per_ride: HashMap<String, u64>,
    maintenance_events: u64,
    revenue_per_facility: HashMap<String, u64>,
    purchases: u64,
    bathroom_visits: u64,
    latest_cleanliness: HashMap<String, f64>,
}

/// In-memory metrics accumulator.
#[derive(Debug)]
pub struct SimulationStatistics {
    started_at: DateTime<Utc>,
    counters: Mutex<Counters>,
}

impl SimulationStatistics {
    /// Create an empty accumulator stamped with the current wall-clock time.
    pub fn new() -> Self {
        Self { started_at: Utc::now(), counters: Mutex::new(Counters::default()) }
    }

    /// Wall-clock time the run started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Total riders served across all rides.
    pub fn total_riders(&self) -> u64 {
        self.counters.lock().unwrap().riders_per_ride.values().sum()
    }

    /// Riders served by one ride.
    pub fn riders_for(&self, ride: &str) -> u64 {
        self.counters.lock().unwrap().riders_per_ride.get(ride).copied().unwrap_or(0)
    }

    /// Breakdowns observed for one ride.
    pub fn breakdowns_for(&self, ride: &str) -> u64 {
        self.counters.lock().unwrap().breakdowns_per_ride.get(ride).copied().unwrap_or(0)
    }

    /// Total revenue across food trucks and merch stands.
    pub fn total_revenue(&self) -> u64 {
        self.counters.lock().unwrap().revenue_per_facility.values().sum()
    }

    /// Completed purchases.
    pub fn purchase_count(&self) -> u64 {
        self.counters.lock().unwrap().purchases
    }

    /// Completed bathroom visits.
    pub fn bathroom_visit_count(&self) -> u64 {
        self.counters.lock().unwrap().bathroom_visits
    }

    /// Scheduled maintenance events observed.
    pub fn maintenance_event_count(&self) -> u64 {
        self.counters.lock().unwrap().maintenance_events
    }

    /// Most recent cleanliness sample per zone.
    pub fn latest_cleanliness(&self) -> HashMap<String, f64> {
        self.counters.lock().unwrap().latest_cleanliness.clone()
    }

    /// Render a human-readable end-of-run summary.
    pub fn summary(&self) -> String {
        let counters = self.counters.lock().unwrap();
        let mut out = String::new();
        out.push_str("=== Simulation Summary ===\n");
        out.push_str(&format!("Run started: {}\n", self.started_at.format("%Y-%m-%d %H:%M:%S UTC")));

        let total_riders: u64 = counters.riders_per_ride.values().sum();
        out.push_str(&format!("Total riders served: {}\n", total_riders));
        let mut rides: Vec<_> = counters.riders_per_ride.iter().collect();
        rides.sort_by(|a, b| a.0.cmp(b.0));
        for (ride, riders) in rides {
            let breakdowns = counters.breakdowns_per_ride.get(ride).copied().unwrap_or(0);
            out.push_str(&format!("  {}: {} riders, {} breakdowns\n", ride, riders, breakdowns));
        }

        let total_revenue: u64 = counters.revenue_per_facility.values().sum();
        out.push_str(&format!(
            "Purchases: {} (revenue ${})\n",
            counters.purchases, total_revenue
        ));
        let mut facilities: Vec<_> = counters.revenue_per_facility.iter().collect();
        facilities.sort_by(|a, b| a.0.cmp(b.0));
        for (facility, revenue) in facilities {
            out.push_str(&format!("  {}: ${}\n", facility, revenue));
        }

        out.push_str(&format!("Bathroom visits: {}\n", counters.bathroom_visits));
        out.push_str(&format!("Maintenance events: {}\n", counters.maintenance_events));

        if !counters.latest_cleanliness.is_empty() {
            out.push_str("Final zone cleanliness:\n");
            let mut zones: Vec<_> = counters.latest_cleanliness.iter().collect();
            zones.sort_by(|a, b| a.0.cmp(b.0));
            for (zone, value) in zones {
                out.push_str(&format!("  {}: {:.1}\n", zone, value));
            }
        }
        out
    }
}

impl Default for SimulationStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for SimulationStatistics {
    fn record_ride_completion(&self, visitor: VisitorId, ride: &str, minute: u64) {
        debug!(%visitor, ride, minute, "ride completion recorded");
        let mut counters = self.counters.lock().unwrap();
        *counters.riders_per_ride.entry(ride.to_string()).or_insert(0) += 1;
    }

    fn record_breakdown(&self, ride: &str, minute: u64, repair_minutes: u64) {
        debug!(ride, minute, repair_minutes, "breakdown recorded");
        let mut counters = self.counters.lock().unwrap();
        *counters.breakdowns_per_ride.entry(ride.to_string()).or_insert(0) += 1;
    }

    fn record_maintenance(&self, ride: &str, minute: u64, duration_minutes: u64) {
        debug!(ride, minute, duration_minutes, "maintenance recorded");
        self.counters.lock().unwrap().maintenance_events += 1;
    }

    fn record_purchase(&self, visitor: VisitorId, facility: &str, item: &str, amount: u32, minute: u64) {
        debug!(%visitor, facility, item, amount, minute, "purchase recorded");
        let mut counters = self.counters.lock().unwrap();
        counters.purchases += 1;
        *counters.revenue_per_facility.entry(facility.to_string()).or_insert(0) += amount as u64;
    }

    fn record_bathroom_visit(&self, visitor: VisitorId, bathroom: &str, minute: u64) {
        debug!(%visitor, bathroom, minute, "bathroom visit recorded");
        self.counters.lock().unwrap().bathroom_visits += 1;
    }

    fn record_cleanliness_sample(&self, zone: &str, value: f64, minute: u64) {
        debug!(zone, value, minute, "cleanliness sample recorded");
        let mut counters = self.counters.lock().unwrap();
        counters.latest_cleanliness.insert(zone.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_ride_completions_per_ride() {
        let stats = SimulationStatistics::new();
        let visitor = VisitorId::new();
        stats.record_ride_completion(visitor, "FerrisWheel", 10);
        stats.record_ride_completion(visitor, "FerrisWheel", 18);
        stats.record_ride_completion(visitor, "DropTower", 12);

        assert_eq!(stats.total_riders(), 3);
        assert_eq!(stats.riders_for("FerrisWheel"), 2);
        assert_eq!(stats.riders_for("DropTower"), 1);
        assert_eq!(stats.riders_for("HauntedHouse"), 0);
    }

    #[test]
    fn accumulates_revenue_per_facility() {
        let stats = SimulationStatistics::new();
        let visitor = VisitorId::new();
        stats.record_purchase(visitor, "FoodTruck-1", "burger", 8, 30);
        stats.record_purchase(visitor, "FoodTruck-1", "soda", 3, 31);
        stats.record_purchase(visitor, "MerchStand-1", "Hat", 15, 40);

        assert_eq!(stats.purchase_count(), 3);
        assert_eq!(stats.total_revenue(), 26);
    }

    #[test]
    fn keeps_latest_cleanliness_sample() {
        let stats = SimulationStatistics::new();
        stats.record_cleanliness_sample("rides", 90.0, 10);
        stats.record_cleanliness_sample("rides", 72.5, 20);
        assert_eq!(stats.latest_cleanliness().get("rides"), Some(&72.5));
    }

    #[test]
    fn summary_mentions_ride_totals() {
        let stats = SimulationStatistics::new();
        stats.record_ride_completion(VisitorId::new(), "CarouselHorses", 5);
        let summary = stats.summary();
        assert!(summary.contains("Total riders served: 1"));
        assert!(summary.contains("CarouselHorses"));
    }
}
