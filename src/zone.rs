//! Zone cleanliness
//!
//! The park's named zones share mutable cleanliness counters: visitor
//! traffic degrades them, janitors restore them, and a background sweep
//! converts accumulated footfall into ambient wear. Many agent threads
//! mutate these counters at uncoordinated times; one mutex per manager
//! (not per zone) serializes everything — coarse on purpose, the call
//! volume is low.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::clock::VirtualClock;
use crate::simulation::agent::{Agent, Step};
use crate::simulation::MetricsSink;

/// Cleanliness values are clamped to this range.
const MAX_CLEANLINESS: f64 = 100.0;

/// Minutes between background degradation sweeps.
const SWEEP_INTERVAL_MINUTES: u64 = 10;

#[derive(Debug)]
struct ZoneState {
    cleanliness: f64,
    traffic: u32,
}

/// Tracks cleanliness of the park's zones, 0 (filthy) to 100 (spotless).
///
/// Unknown zone names are silently ignored on every operation; a mistyped
/// zone must never take down an agent loop.
#[derive(Debug)]
pub struct CleanlinessManager {
    zones: Mutex<HashMap<String, ZoneState>>,
}

/// The stock park zones.
pub const DEFAULT_ZONES: [&str; 5] = ["rides", "food_court", "bathrooms", "pathways", "entrance"];

impl CleanlinessManager {
    /// Create a manager with the stock zones, all starting spotless.
    pub fn new() -> Self {
        Self::with_zones(DEFAULT_ZONES.iter().copied())
    }

    /// Create a manager with custom zone names.
    pub fn with_zones<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let zones = names
            .into_iter()
            .map(|name| {
                (name.to_string(), ZoneState { cleanliness: MAX_CLEANLINESS, traffic: 0 })
            })
            .collect();
        Self { zones: Mutex::new(zones) }
    }

    /// Cleanliness of a zone; 100 for unknown zones.
    pub fn cleanliness(&self, zone: &str) -> f64 {
        self.zones
            .lock()
            .unwrap()
            .get(zone)
            .map(|z| z.cleanliness)
            .unwrap_or(MAX_CLEANLINESS)
    }

    /// Degrade a zone by `amount` (floored at 0) and count the traffic.
    /// Called by any visitor or staff agent moving through the zone.
    pub fn degrade(&self, zone: &str, amount: f64) {
        let mut zones = self.zones.lock().unwrap();
        if let Some(state) = zones.get_mut(zone) {
            state.cleanliness = (state.cleanliness - amount).max(0.0);
            state.traffic += 1;
        }
    }

    /// Restore a zone by `amount` (capped at 100). Called by janitors.
    pub fn clean(&self, zone: &str, amount: f64) {
        let mut zones = self.zones.lock().unwrap();
        if let Some(state) = zones.get_mut(zone) {
            state.cleanliness = (state.cleanliness + amount).min(MAX_CLEANLINESS);
        }
    }

    /// Park-wide average cleanliness.
    pub fn average(&self) -> f64 {
        let zones = self.zones.lock().unwrap();
        if zones.is_empty() {
            return MAX_CLEANLINESS;
        }
        zones.values().map(|z| z.cleanliness).sum::<f64>() / zones.len() as f64
    }

    /// Snapshot of every zone's cleanliness.
    pub fn summary(&self) -> HashMap<String, f64> {
        self.zones
            .lock()
            .unwrap()
            .iter()
            .map(|(name, state)| (name.clone(), state.cleanliness))
            .collect()
    }

    /// One background sweep: convert accumulated traffic into additional
    /// wear (at most 5 points per zone), sample each zone into metrics, and
    /// reset the traffic counters.
    fn sweep(&self, minute: u64, metrics: Option<&Arc<dyn MetricsSink>>) {
        let mut zones = self.zones.lock().unwrap();
        for (name, state) in zones.iter_mut() {
            let wear = (f64::from(state.traffic) * 0.1).min(5.0);
            state.cleanliness = (state.cleanliness - wear).max(0.0);
            state.traffic = 0;
            debug!(zone = %name, cleanliness = state.cleanliness, wear, "sweep applied");
            if let Some(metrics) = metrics {
                metrics.record_cleanliness_sample(name, state.cleanliness, minute);
            }
        }
    }
}

impl Default for CleanlinessManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Background agent applying ambient wear every ten simulated minutes.
pub struct CleanlinessSweep {
    manager: Arc<CleanlinessManager>,
    clock: Arc<VirtualClock>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl CleanlinessSweep {
    /// Create the sweep agent for a manager.
    pub fn new(
        manager: Arc<CleanlinessManager>,
        clock: Arc<VirtualClock>,
        metrics: Option<Arc<dyn MetricsSink>>,
    ) -> Self {
        Self { manager, clock, metrics }
    }
}

impl std::fmt::Debug for CleanlinessSweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanlinessSweep").finish_non_exhaustive()
    }
}

impl Agent for CleanlinessSweep {
    fn name(&self) -> String {
        "cleanliness-sweep".to_string()
    }

    fn step(&mut self) -> Step {
        self.manager.sweep(self.clock.now(), self.metrics.as_ref());
        Step::Continue { idle_minutes: SWEEP_INTERVAL_MINUTES }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_spotless() {
        let manager = CleanlinessManager::new();
        for zone in DEFAULT_ZONES {
            assert_eq!(manager.cleanliness(zone), 100.0);
        }
        assert_eq!(manager.average(), 100.0);
    }

    #[test]
    fn degrade_floors_at_zero() {
        let manager = CleanlinessManager::new();
        manager.degrade("rides", 250.0);
        assert_eq!(manager.cleanliness("rides"), 0.0);
    }

    #[test]
    fn clean_caps_at_one_hundred() {
        let manager = CleanlinessManager::new();
        manager.degrade("rides", 30.0);
        manager.clean("rides", 500.0);
        assert_eq!(manager.cleanliness("rides"), 100.0);
    }

    #[test]
    fn unknown_zone_is_a_noop() {
        let manager = CleanlinessManager::new();
        manager.degrade("parking_lot", 10.0);
        manager.clean("parking_lot", 10.0);
        assert_eq!(manager.cleanliness("parking_lot"), 100.0);
        assert_eq!(manager.average(), 100.0);
    }

    #[test]
    fn sweep_converts_traffic_to_wear_and_resets() {
        let manager = CleanlinessManager::new();
        // 20 traffic events of zero direct wear each
        for _ in 0..20 {
            manager.degrade("pathways", 0.0);
        }
        manager.sweep(10, None);
        assert_eq!(manager.cleanliness("pathways"), 98.0); // 20 * 0.1

        // Traffic was reset, so a second sweep changes nothing
        manager.sweep(20, None);
        assert_eq!(manager.cleanliness("pathways"), 98.0);
    }

    #[test]
    fn sweep_wear_is_capped_per_zone() {
        let manager = CleanlinessManager::new();
        for _ in 0..500 {
            manager.degrade("entrance", 0.0);
        }
        manager.sweep(10, None);
        assert_eq!(manager.cleanliness("entrance"), 95.0);
    }
}
