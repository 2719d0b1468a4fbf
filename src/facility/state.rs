//! Ride operational states
//!
//! A ride is always in exactly one of four states. The original design used
//! a class-per-state hierarchy; here each state is a variant of one tagged
//! enum carrying its own payload (boarding window progress, repair countdown),
//! and all transition behavior is dispatched through [`Ride`]'s single
//! transition function.
//!
//! State transitions per simulated-minute tick:
//!
//! ```text
//!           queue non-empty            batch served, no breakdown
//!   OPEN ────────────────▶ BOARDING ────────────────▶ OPEN
//!     ▲                       │  │
//!     │  window expired empty │  │ breakdown roll succeeds
//!     └───────────────────────┘  ▼
//!     ▲                       BROKEN{remaining} ── countdown ──▶ OPEN
//!     │
//!     └── MAINTENANCE{remaining} ── countdown ──▶ OPEN   (external request)
//! ```
//!
//! [`Ride`]: crate::facility::Ride

use crate::types::config::DEFAULT_REPAIR_MINUTES;

/// Operational state of a ride, one active variant at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideState {
    /// Waiting for visitors; an arrival moves the ride to boarding.
    Open,
    /// Collecting passengers. `minutes_in_window` counts boarding ticks so an
    /// empty window can expire back to open.
    Boarding {
        /// Ticks spent in the current boarding window.
        minutes_in_window: u64,
    },
    /// Broken down; counts down to open.
    Broken {
        /// Simulated minutes of repair left.
        remaining: u64,
    },
    /// Scheduled downtime; counts down to open.
    Maintenance {
        /// Simulated minutes of maintenance left.
        remaining: u64,
    },
}

impl RideState {
    /// Uppercase state label, used in logs and status displays.
    pub fn name(&self) -> &'static str {
        match self {
            RideState::Open => "OPEN",
            RideState::Boarding { .. } => "BOARDING",
            RideState::Broken { .. } => "BROKEN",
            RideState::Maintenance { .. } => "MAINTENANCE",
        }
    }

    /// Whether visitors may join the queue in this state. Queues stay open
    /// through boarding; they close while broken or under maintenance.
    pub fn can_enqueue(&self) -> bool {
        matches!(self, RideState::Open | RideState::Boarding { .. })
    }

    /// Entry adjustment applied when a transition lands on this state:
    /// a breakdown with no repair window gets the default, and maintenance
    /// always lasts at least one minute.
    pub(crate) fn normalized_on_entry(self) -> Self {
        match self {
            RideState::Broken { remaining: 0 } => {
                RideState::Broken { remaining: DEFAULT_REPAIR_MINUTES }
            }
            RideState::Maintenance { remaining: 0 } => RideState::Maintenance { remaining: 1 },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_allowed_only_while_open_or_boarding() {
        assert!(RideState::Open.can_enqueue());
        assert!(RideState::Boarding { minutes_in_window: 2 }.can_enqueue());
        assert!(!RideState::Broken { remaining: 5 }.can_enqueue());
        assert!(!RideState::Maintenance { remaining: 5 }.can_enqueue());
    }

    #[test]
    fn state_names() {
        assert_eq!(RideState::Open.name(), "OPEN");
        assert_eq!(RideState::Boarding { minutes_in_window: 0 }.name(), "BOARDING");
        assert_eq!(RideState::Broken { remaining: 1 }.name(), "BROKEN");
        assert_eq!(RideState::Maintenance { remaining: 1 }.name(), "MAINTENANCE");
    }

    #[test]
    fn zero_repair_time_defaults_on_entry() {
        let entered = RideState::Broken { remaining: 0 }.normalized_on_entry();
        assert_eq!(entered, RideState::Broken { remaining: DEFAULT_REPAIR_MINUTES });
    }

    #[test]
    fn maintenance_lasts_at_least_one_minute() {
        let entered = RideState::Maintenance { remaining: 0 }.normalized_on_entry();
        assert_eq!(entered, RideState::Maintenance { remaining: 1 });
    }
}
