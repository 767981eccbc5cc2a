//! PopupManager - the scheduling core
//!
//! Owns the registry, lane queues, and active set behind one async lock,
//! and drives activation, preemption, and hide handshakes between them.
//! `advance` is the single progression entry point, invoked after every
//! mutation that could make progress possible: a new `show`, a completed
//! hide handshake, or a self-heal pass.

use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

use super::active::ActiveSet;
use super::handshake::{Continuation, Proceed};
use super::lanes::LaneSet;
use crate::config::ManagerConfig;
use crate::domain::{HideBinding, ShowOptions, ShowRequest};
use crate::error::PopupError;
use crate::registry::{Presentable, Registry};

/// Mutable scheduler state, guarded by the manager's lock.
pub(crate) struct ManagerState {
    registry: Registry,
    lanes: LaneSet,
    active: ActiveSet,
    lane_count: usize,
    limit: usize,
    single_slot: bool,
    /// Bumped on every reset; stale handshake continuations check it.
    epoch: u64,
}

impl ManagerState {
    /// Clear everything and re-apply configuration, preserving any knob
    /// the supplied config leaves unset.
    fn apply(&mut self, config: &ManagerConfig) {
        if let Some(lane_count) = config.lane_count {
            if lane_count == 0 {
                warn!("ManagerState::apply: lane_count 0 clamped to 1");
            }
            self.lane_count = lane_count.max(1);
        }
        if let Some(limit) = config.limit {
            if limit == 0 {
                warn!("ManagerState::apply: limit 0 clamped to 1");
            }
            self.limit = limit.max(1);
        }
        if let Some(single_slot) = config.single_slot {
            self.single_slot = single_slot;
        }

        self.registry.clear();
        self.lanes = LaneSet::new(self.lane_count);
        self.active = ActiveSet::new(self.limit);
        self.epoch += 1;
    }

    /// Resolve the lane a request belongs to.
    fn resolve_lane(&self, target_lane: Option<usize>) -> Result<usize, PopupError> {
        if self.lane_count == 1 {
            return Ok(0);
        }

        // Lane 0 reads as unset in multi-lane mode; usable tiers start at 1.
        match target_lane {
            None | Some(0) => Err(PopupError::TargetLaneRequired),
            Some(lane) if lane >= self.lane_count => Err(PopupError::TargetLaneNotFound(lane)),
            Some(lane) => Ok(lane),
        }
    }
}

/// The presentation scheduler.
///
/// Decides which registered unit is currently visible, in what order
/// queued requests are serviced, and how competing requests preempt or
/// yield to one another. The handle is cheaply cloneable; clones share
/// one scheduler.
#[derive(Clone)]
pub struct PopupManager {
    state: Arc<Mutex<ManagerState>>,
}

impl Default for PopupManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl PopupManager {
    /// Create a manager: one lane, limit 1, queued mode, adjusted by
    /// whatever `config` overrides.
    pub fn new(config: ManagerConfig) -> Self {
        debug!(?config, "PopupManager::new: called");
        let mut state = ManagerState {
            registry: Registry::default(),
            lanes: LaneSet::new(1),
            active: ActiveSet::new(1),
            lane_count: 1,
            limit: 1,
            single_slot: false,
            epoch: 0,
        };
        state.apply(&config);

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub(crate) fn from_state(state: Arc<Mutex<ManagerState>>) -> Self {
        Self { state }
    }

    /// Register show/hide behavior under a unique name.
    pub async fn register(&self, name: impl Into<String>, presentable: Arc<dyn Presentable>) -> Result<(), PopupError> {
        let name = name.into();
        debug!(%name, "PopupManager::register: called");
        let mut state = self.state.lock().await;
        state.registry.insert(name, presentable)
    }

    /// Request presentation of `name`.
    ///
    /// Queued mode enqueues into a lane and advances; single-slot mode
    /// immediately replaces the current presentation, discarding queueing
    /// semantics. Returns the cancel capability for this request.
    pub async fn show(&self, name: &str, data: Value, options: ShowOptions) -> Result<CancelToken, PopupError> {
        debug!(%name, ?options, "PopupManager::show: called");
        let mut state = self.state.lock().await;
        let Some(registration) = state.registry.get(name) else {
            debug!(%name, "PopupManager::show: not registered");
            return Err(PopupError::NotRegistered(name.to_string()));
        };

        if state.single_slot {
            let request = ShowRequest {
                id: Uuid::now_v7(),
                name: name.to_string(),
                data,
                target_lane: 0,
                priority: 0,
                force_show: false,
                resumable: false,
                hide: HideBinding::Registered(registration),
            };
            let token = self.token_for(request.id);
            debug!(id = %request.id, "PopupManager::show: taking the single slot");
            state.active.replace(request);
            drop(state);

            self.advance().await;
            return Ok(token);
        }

        let target_lane = state.resolve_lane(options.target_lane)?;
        let request = ShowRequest {
            id: Uuid::now_v7(),
            name: name.to_string(),
            data,
            target_lane,
            priority: options.priority,
            force_show: options.force_show.unwrap_or(state.limit != 1),
            resumable: options.resumable.unwrap_or(state.limit == 1),
            hide: HideBinding::Registered(registration),
        };
        let token = self.token_for(request.id);
        state.lanes.enqueue(request, options.unshift);
        debug!(pending = state.lanes.pending(), "PopupManager::show: enqueued");
        drop(state);

        self.advance().await;
        Ok(token)
    }

    /// Hide the current presentation: the oldest active entry, which in
    /// single-slot mode is the slot. No-op when nothing is shown.
    pub async fn hide(&self) {
        debug!("PopupManager::hide: called");
        self.hide_target(None).await;
    }

    /// Clear the registry, all lanes, and the active set, returning the
    /// scheduler to its initial empty state. Config knobs the supplied
    /// config leaves unset keep their current values.
    pub async fn reset(&self, config: ManagerConfig) {
        debug!(?config, "PopupManager::reset: called");
        let mut state = self.state.lock().await;
        state.apply(&config);
    }

    /// Hide by id, or the oldest active entry when `id` is `None`.
    ///
    /// An active target is removed and taken through the hide handshake;
    /// a queued target is dropped from its lane with no handshake and no
    /// advance, since removing an unshown request cannot free capacity.
    pub(crate) async fn hide_target(&self, id: Option<Uuid>) {
        let mut state = self.state.lock().await;
        let target = match id {
            Some(id) => Some(id),
            None => state.active.oldest().map(|request| request.id),
        };
        let Some(target) = target else {
            debug!("PopupManager::hide_target: nothing to hide");
            return;
        };

        if let Some(request) = state.active.remove(target) {
            debug!(id = %request.id, name = %request.name, "PopupManager::hide_target: hiding active request");
            let binding = request.hide.clone();
            drop(state);

            self.handshake(binding, Continuation::Advance).await;
        } else if let Some(request) = state.lanes.remove(target) {
            debug!(id = %request.id, name = %request.name, "PopupManager::hide_target: dropped queued request");
        } else {
            debug!(%target, "PopupManager::hide_target: target not found");
        }
    }

    /// Run one hide handshake: await `on_hide` without holding the state
    /// lock, then fire the proceed fallback (a no-op when the callee
    /// already proceeded).
    async fn handshake(&self, binding: HideBinding, continuation: Continuation) {
        let proceed = Proceed::new(Arc::downgrade(&self.state), continuation);

        binding.run(proceed.clone()).await;

        if proceed.consumed() {
            debug!("PopupManager::handshake: callee proceeded early");
        } else {
            debug!("PopupManager::handshake: firing fallback progression");
        }
        proceed.call().await;
    }

    /// Run a handshake continuation (first `proceed` call or fallback).
    pub(crate) async fn resume(&self, continuation: Continuation) {
        match continuation {
            Continuation::Advance => self.advance().await,
            Continuation::Activate {
                request,
                registration,
                epoch,
            } => {
                let mut state = self.state.lock().await;
                if state.epoch != epoch {
                    debug!(id = %request.id, "PopupManager::resume: activation staged before reset, dropped");
                    return;
                }
                debug!(id = %request.id, "PopupManager::resume: activating preemption replacement");
                Self::activate(&mut state, self, request, registration);
            }
        }
    }

    /// Drive scheduling: activate, preempt, or defer the next candidate.
    ///
    /// Boxed so the advance -> hide -> handshake -> advance cycle stays
    /// finitely typed.
    fn advance(&self) -> BoxFuture<'static, ()> {
        let manager = self.clone();
        Box::pin(async move { manager.advance_inner().await })
    }

    async fn advance_inner(&self) {
        let mut state = self.state.lock().await;

        if state.single_slot {
            let (id, data, registration) = {
                let Some(current) = state.active.oldest() else {
                    debug!("PopupManager::advance: slot empty");
                    return;
                };
                let Some(registration) = state.registry.get(&current.name) else {
                    debug!(name = %current.name, "PopupManager::advance: slot registration missing");
                    return;
                };
                (current.id, current.data.clone(), registration)
            };
            debug!(%id, "PopupManager::advance: showing slot request");
            Self::invoke_show(&mut state, self, id, data, registration);
            return;
        }

        let Some(candidate) = state.lanes.pop_next() else {
            debug!("PopupManager::advance: no pending candidates");
            return;
        };

        if state.active.has_capacity() {
            self.activate_or_heal(state, candidate).await;
            return;
        }

        let reference = match state.active.oldest() {
            Some(reference) => (reference.id, candidate.preempts(reference)),
            None => {
                // Capacity exhausted with nothing active to compare
                // against: activate unconditionally.
                self.activate_or_heal(state, candidate).await;
                return;
            }
        };
        let (reference_id, preempt) = reference;

        if !preempt {
            debug!(
                id = %candidate.id,
                reference = %reference_id,
                "PopupManager::advance: candidate yields, requeued at front"
            );
            state.lanes.requeue_front(candidate);
            return;
        }

        let Some(registration) = state.registry.get(&candidate.name) else {
            debug!(name = %candidate.name, "PopupManager::advance: preempting candidate unregistered, dropped");
            return;
        };
        let Some(reference) = state.active.remove(reference_id) else {
            return;
        };

        debug!(
            id = %candidate.id,
            preempted = %reference.id,
            resumable = reference.resumable,
            "PopupManager::advance: preempting oldest active"
        );
        let binding = reference.hide.clone();
        if reference.resumable {
            state.lanes.requeue_front(reference);
        }
        let continuation = Continuation::Activate {
            request: candidate,
            registration,
            epoch: state.epoch,
        };
        drop(state);

        self.handshake(binding, continuation).await;
    }

    /// Capacity-available branch: look up the candidate's registration
    /// and show it, or self-heal when the registration vanished between
    /// enqueue and activation.
    async fn activate_or_heal(&self, mut state: MutexGuard<'_, ManagerState>, candidate: ShowRequest) {
        match state.registry.get(&candidate.name) {
            Some(registration) => {
                debug!(
                    id = %candidate.id,
                    name = %candidate.name,
                    active = state.active.len(),
                    "PopupManager::advance: activating candidate"
                );
                Self::activate(&mut state, self, candidate, registration);
            }
            None => {
                warn!(name = %candidate.name, "PopupManager::advance: registration vanished, self-healing");
                drop(state);
                self.hide_target(None).await;
            }
        }
    }

    /// Push into the active set and run `on_show`.
    fn activate(state: &mut ManagerState, manager: &PopupManager, request: ShowRequest, registration: Arc<dyn Presentable>) {
        let id = request.id;
        let data = request.data.clone();
        state.active.push(request);
        Self::invoke_show(state, manager, id, data, registration);
    }

    /// Invoke `on_show` for an active entry, rebinding its hide handler
    /// when the callback returns an override.
    fn invoke_show(state: &mut ManagerState, manager: &PopupManager, id: Uuid, data: Value, registration: Arc<dyn Presentable>) {
        let cancel = manager.token_for(id);
        if let Some(handler) = registration.on_show(data, cancel) {
            state.active.rebind(id, HideBinding::override_from(handler));
        }
    }

    fn token_for(&self, id: Uuid) -> CancelToken {
        CancelToken {
            state: Arc::downgrade(&self.state),
            id,
        }
    }
}

/// Cancel capability bound to one request instance, returned by
/// [`show`](PopupManager::show) and handed to
/// [`on_show`](crate::Presentable::on_show).
#[derive(Clone, Debug)]
pub struct CancelToken {
    state: Weak<Mutex<ManagerState>>,
    id: Uuid,
}

impl CancelToken {
    /// Remove the bound request from wherever it currently resides: an
    /// active presentation goes through the hide handshake, a queued one
    /// is dropped from its lane. No-op once the request is gone or the
    /// manager has been dropped.
    pub async fn cancel(&self) {
        debug!(id = %self.id, "CancelToken::cancel: called");
        let Some(state) = self.state.upgrade() else {
            debug!(id = %self.id, "CancelToken::cancel: manager gone");
            return;
        };

        PopupManager::from_state(state).hide_target(Some(self.id)).await;
    }

    /// Id of the request this token cancels.
    pub fn request_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::testutil::NullPresentable;
    use crate::registry::HideHandler;

    /// Presentable recording its show calls.
    struct Recording {
        shows: Arc<StdMutex<Vec<String>>>,
        label: &'static str,
    }

    #[async_trait]
    impl Presentable for Recording {
        fn on_show(&self, _data: Value, _cancel: CancelToken) -> Option<HideHandler> {
            self.shows.lock().unwrap().push(self.label.to_string());
            None
        }

        async fn on_hide(&self, _proceed: Proceed) {}
    }

    #[tokio::test]
    async fn test_show_unregistered_fails() {
        let manager = PopupManager::default();

        let err = manager.show("ghost", Value::Null, ShowOptions::default()).await.unwrap_err();
        assert!(matches!(err, PopupError::NotRegistered(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        let manager = PopupManager::default();
        manager.register("alert", Arc::new(NullPresentable)).await.unwrap();

        let err = manager.register("alert", Arc::new(NullPresentable)).await.unwrap_err();
        assert!(matches!(err, PopupError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_single_lane_needs_no_target_lane() {
        let manager = PopupManager::default();
        manager.register("alert", Arc::new(NullPresentable)).await.unwrap();

        manager.show("alert", Value::Null, ShowOptions::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_multi_lane_target_validation() {
        let manager = PopupManager::new(ManagerConfig {
            lane_count: Some(3),
            ..Default::default()
        });
        manager.register("alert", Arc::new(NullPresentable)).await.unwrap();

        let missing = manager.show("alert", Value::Null, ShowOptions::default()).await;
        assert!(matches!(missing, Err(PopupError::TargetLaneRequired)));

        // A zero lane reads as unset.
        let zero = manager
            .show(
                "alert",
                Value::Null,
                ShowOptions {
                    target_lane: Some(0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(zero, Err(PopupError::TargetLaneRequired)));

        let out_of_range = manager
            .show(
                "alert",
                Value::Null,
                ShowOptions {
                    target_lane: Some(3),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(out_of_range, Err(PopupError::TargetLaneNotFound(3))));

        manager
            .show(
                "alert",
                Value::Null,
                ShowOptions {
                    target_lane: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_single_slot_show_replaces_silently() {
        let shows = Arc::new(StdMutex::new(Vec::new()));
        let manager = PopupManager::new(ManagerConfig {
            single_slot: Some(true),
            ..Default::default()
        });
        manager
            .register(
                "a",
                Arc::new(Recording {
                    shows: Arc::clone(&shows),
                    label: "a",
                }),
            )
            .await
            .unwrap();
        manager
            .register(
                "b",
                Arc::new(Recording {
                    shows: Arc::clone(&shows),
                    label: "b",
                }),
            )
            .await
            .unwrap();

        manager.show("a", Value::Null, ShowOptions::default()).await.unwrap();
        manager.show("b", Value::Null, ShowOptions::default()).await.unwrap();

        // No hide ran for "a"; the slot was simply replaced.
        assert_eq!(shows.lock().unwrap().clone(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_reset_clears_registry_and_preserves_config() {
        let manager = PopupManager::new(ManagerConfig {
            lane_count: Some(2),
            ..Default::default()
        });
        manager.register("alert", Arc::new(NullPresentable)).await.unwrap();

        manager.reset(ManagerConfig::default()).await;

        // Registration is gone, lane count survives.
        let unregistered = manager.show("alert", Value::Null, ShowOptions::default()).await;
        assert!(matches!(unregistered, Err(PopupError::NotRegistered(_))));

        manager.register("alert", Arc::new(NullPresentable)).await.unwrap();
        let still_multi_lane = manager.show("alert", Value::Null, ShowOptions::default()).await;
        assert!(matches!(still_multi_lane, Err(PopupError::TargetLaneRequired)));
    }
}
