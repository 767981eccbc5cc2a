//! Bounded active set

use tracing::debug;
use uuid::Uuid;

use crate::domain::{HideBinding, ShowRequest};

/// The bounded collection of currently-shown requests, insertion-ordered.
///
/// Capacity 1 is the classic single-popup setup; larger limits allow
/// stacked presentations. The single-slot mode slot is this same
/// structure with replacement semantics, so there is one activation path
/// regardless of capacity.
pub(crate) struct ActiveSet {
    entries: Vec<ShowRequest>,
    limit: usize,
}

impl ActiveSet {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    pub(crate) fn has_capacity(&self) -> bool {
        self.entries.len() < self.limit
    }

    pub(crate) fn push(&mut self, request: ShowRequest) {
        debug!(id = %request.id, name = %request.name, occupied = self.entries.len(), "ActiveSet::push: called");
        self.entries.push(request);
    }

    /// Single-slot replacement: the previous occupant is dropped without
    /// a hide handshake.
    pub(crate) fn replace(&mut self, request: ShowRequest) {
        debug!(id = %request.id, name = %request.name, "ActiveSet::replace: called");
        self.entries.clear();
        self.entries.push(request);
    }

    /// The least-recently-activated entry: the preemption reference and
    /// the default hide target.
    pub(crate) fn oldest(&self) -> Option<&ShowRequest> {
        self.entries.first()
    }

    pub(crate) fn remove(&mut self, id: Uuid) -> Option<ShowRequest> {
        let position = self.entries.iter().position(|request| request.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Swap in a new hide binding for an active entry, used when
    /// `on_show` returns an override handler.
    pub(crate) fn rebind(&mut self, id: Uuid, hide: HideBinding) {
        if let Some(entry) = self.entries.iter_mut().find(|request| request.id == id) {
            debug!(%id, "ActiveSet::rebind: hide handler overridden");
            entry.hide = hide;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testutil;

    #[test]
    fn test_capacity_tracks_limit() {
        let mut active = ActiveSet::new(2);
        assert!(active.has_capacity());

        active.push(testutil::request(0, 0));
        assert!(active.has_capacity());

        active.push(testutil::request(0, 0));
        assert!(!active.has_capacity());
        assert_eq!(active.len(), 2);
    }

    #[test]
    fn test_oldest_is_first_in() {
        let mut active = ActiveSet::new(2);
        let first = testutil::request(0, 0);
        let first_id = first.id;
        active.push(first);
        active.push(testutil::request(0, 99));

        assert_eq!(active.oldest().unwrap().id, first_id);
    }

    #[test]
    fn test_remove_by_id() {
        let mut active = ActiveSet::new(2);
        let request = testutil::request(0, 0);
        let id = request.id;
        active.push(request);

        assert!(active.remove(id).is_some());
        assert!(active.remove(id).is_none());
        assert_eq!(active.len(), 0);
    }

    #[test]
    fn test_replace_discards_previous() {
        let mut active = ActiveSet::new(1);
        let first = testutil::request(0, 0);
        let first_id = first.id;
        active.push(first);

        let second = testutil::request(0, 0);
        let second_id = second.id;
        active.replace(second);

        assert_eq!(active.len(), 1);
        assert!(active.remove(first_id).is_none());
        assert_eq!(active.oldest().unwrap().id, second_id);
    }
}
