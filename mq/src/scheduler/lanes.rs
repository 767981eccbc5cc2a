//! Lane queues for pending requests

use tracing::debug;
use uuid::Uuid;

use crate::domain::ShowRequest;

/// Ordered pending-request queues, one per lane index.
///
/// Lane index is the coarse priority tier (higher index is serviced
/// first); the per-request priority orders entries within a lane. Lane
/// count is fixed until the next reset.
pub(crate) struct LaneSet {
    lanes: Vec<Vec<ShowRequest>>,
}

impl LaneSet {
    pub(crate) fn new(lane_count: usize) -> Self {
        Self {
            lanes: (0..lane_count).map(|_| Vec::new()).collect(),
        }
    }

    /// Enqueue into the request's target lane.
    ///
    /// `unshift` takes the immediate front unconditionally; otherwise the
    /// lane is appended to and stably re-sorted by priority descending,
    /// so equal priorities stay in insertion order. The target lane must
    /// have been validated against the lane count by the caller.
    pub(crate) fn enqueue(&mut self, request: ShowRequest, unshift: bool) {
        debug!(
            id = %request.id,
            lane = request.target_lane,
            priority = request.priority,
            unshift,
            "LaneSet::enqueue: called"
        );
        let lane = &mut self.lanes[request.target_lane];

        if unshift {
            lane.insert(0, request);
        } else {
            lane.push(request);
            lane.sort_by(|a, b| b.priority.cmp(&a.priority));
        }
    }

    /// Put a request back at the front of its lane, ahead of everything
    /// queued there (deferred candidates retry first; preempted resumable
    /// requests resume first).
    pub(crate) fn requeue_front(&mut self, request: ShowRequest) {
        debug!(id = %request.id, lane = request.target_lane, "LaneSet::requeue_front: called");
        self.lanes[request.target_lane].insert(0, request);
    }

    /// Pop the front of the highest-indexed non-empty lane.
    pub(crate) fn pop_next(&mut self) -> Option<ShowRequest> {
        let lane = self.lanes.iter_mut().rev().find(|lane| !lane.is_empty())?;
        Some(lane.remove(0))
    }

    /// Remove a queued request by id from whichever lane holds it.
    pub(crate) fn remove(&mut self, id: Uuid) -> Option<ShowRequest> {
        for lane in &mut self.lanes {
            if let Some(position) = lane.iter().position(|request| request.id == id) {
                debug!(%id, "LaneSet::remove: removed queued request");
                return Some(lane.remove(position));
            }
        }
        None
    }

    /// Total queued requests across all lanes.
    pub(crate) fn pending(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }
}
