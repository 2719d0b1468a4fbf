//! Park facilities
//!
//! Everything a visitor can stand in line for: rides (four-state machines
//! with batch admission) and the simple single-server facilities (food
//! trucks, merch stands, bathrooms). Each facility owns one
//! [`AdmissionQueue`](crate::queue::AdmissionQueue) and runs as one agent
//! thread; visitors are opaque [`Entrant`]s to all of them.

pub mod bathroom;
pub mod entrant;
pub mod food;
pub mod merch;
pub mod ride;
pub mod state;

pub use bathroom::Bathroom;
pub use entrant::Entrant;
pub use food::FoodTruck;
pub use merch::MerchStand;
pub use ride::Ride;
pub use state::RideState;
