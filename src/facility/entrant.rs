//! Queue-slot occupants
//!
//! Facilities never know what a visitor *is* — only that something with an
//! identity is standing in line and wants to hear when its turn is over.
//! Visitor modeling (hunger, energy, decision making) lives entirely on the
//! other side of this trait.

use crate::types::VisitorId;

/// A participant occupying a slot in a facility's waiting line.
///
/// Implementations are shared across threads behind `Arc`, so completion
/// callbacks take `&self`; any mutable visitor state behind them is the
/// implementor's responsibility (interior mutability owned by the visitor
/// side, not the facility side).
///
/// Callbacks are fire-and-forget: facilities never inspect a return value and
/// never retry. Notification of a failed transaction (for example an
/// unaffordable purchase) arrives through [`Entrant::on_service_failed`]; the
/// facility's own state is unaffected by such failures.
pub trait Entrant: Send + Sync {
    /// Stable identity used for queue membership checks.
    fn id(&self) -> VisitorId;

    /// Called once per completed service (ride cycle finished, meal served,
    /// bathroom freed) with the facility name and the simulated minute.
    fn on_service_complete(&self, facility: &str, minute: u64);

    /// Called when a service attempt fails a business rule (for example the
    /// entrant cannot afford any item). Never retried by the facility.
    fn on_service_failed(&self, _facility: &str, _minute: u64) {}

    /// Money currently available for purchases. Entrants that never buy
    /// anything can leave the default.
    fn funds(&self) -> u32 {
        0
    }

    /// Atomically deduct `price` if affordable. Returns whether the charge
    /// went through. Default: entrants with no wallet refuse all charges.
    fn try_spend(&self, _price: u32) -> bool {
        false
    }
}
