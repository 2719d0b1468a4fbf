//! Shared admission queues
//!
//! Every facility owns one [`AdmissionQueue`]: a thread-safe, two-lane
//! waiting line. Priority-pass holders stand in the priority lane and are
//! always served before the regular lane; within a lane order is FIFO. Many
//! visitor threads enqueue concurrently while exactly one facility thread
//! dequeues.
//!
//! The queue itself is unbounded — capacity is a property of the service
//! (how many seats a ride cycle has), enforced at dequeue time via
//! [`AdmissionQueue::dequeue_batch`], not at admission time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::facility::Entrant;
use crate::types::VisitorId;

#[derive(Default)]
struct Lanes {
    priority: VecDeque<Arc<dyn Entrant>>,
    regular: VecDeque<Arc<dyn Entrant>>,
}

/// Thread-safe waiting line with a priority lane and a regular lane.
///
/// The queue does not notify waiting entrants when they are served; a waiting
/// agent polls [`AdmissionQueue::contains`] to discover that it has been
/// pulled out of line. Depth snapshots ([`AdmissionQueue::len`],
/// [`AdmissionQueue::is_empty`]) may be stale the moment they return and must
/// be treated as approximate.
#[derive(Default)]
pub struct AdmissionQueue {
    lanes: Mutex<Lanes>,
}

impl AdmissionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entrant to the priority or regular lane. Never blocks and
    /// never rejects; the queue has no capacity limit.
    pub fn enqueue(&self, entrant: Arc<dyn Entrant>, priority: bool) {
        let mut lanes = self.lanes.lock().unwrap();
        if priority {
            lanes.priority.push_back(entrant);
        } else {
            lanes.regular.push_back(entrant);
        }
    }

    /// Pop a single entrant: priority lane head first, else regular lane
    /// head, else `None`. Non-blocking.
    pub fn dequeue_one(&self) -> Option<Arc<dyn Entrant>> {
        let mut lanes = self.lanes.lock().unwrap();
        lanes.priority.pop_front().or_else(|| lanes.regular.pop_front())
    }

    /// Atomically pop up to `capacity` entrants, exhausting the priority lane
    /// before touching the regular lane.
    ///
    /// The whole batch is assembled under one critical section, so no other
    /// dequeue can interleave and split it. Enqueues racing in while the
    /// batch is being assembled may or may not make this batch; that
    /// nondeterminism is accepted.
    pub fn dequeue_batch(&self, capacity: usize) -> Vec<Arc<dyn Entrant>> {
        let mut lanes = self.lanes.lock().unwrap();
        let mut batch = Vec::with_capacity(capacity.min(lanes.priority.len() + lanes.regular.len()));
        while batch.len() < capacity {
            match lanes.priority.pop_front() {
                Some(entrant) => batch.push(entrant),
                None => break,
            }
        }
        while batch.len() < capacity {
            match lanes.regular.pop_front() {
                Some(entrant) => batch.push(entrant),
                None => break,
            }
        }
        batch
    }

    /// Total entrants across both lanes. Approximate the moment it returns.
    pub fn len(&self) -> usize {
        let lanes = self.lanes.lock().unwrap();
        lanes.priority.len() + lanes.regular.len()
    }

    /// Whether both lanes are empty. Approximate the moment it returns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entrant with this id is still waiting in either lane.
    ///
    /// Waiting agents poll this once per simulated minute to learn that
    /// their turn has come (the queue performs no notifications itself).
    pub fn contains(&self, id: VisitorId) -> bool {
        let lanes = self.lanes.lock().unwrap();
        lanes.priority.iter().chain(lanes.regular.iter()).any(|e| e.id() == id)
    }
}

impl std::fmt::Debug for AdmissionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lanes = self.lanes.lock().unwrap();
        f.debug_struct("AdmissionQueue")
            .field("priority", &lanes.priority.len())
            .field("regular", &lanes.regular.len())
            .finish()
    }
}
