//! Request instances and show options

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::registry::{HideFuture, HideHandler, Presentable};
use crate::scheduler::Proceed;

/// Options accepted by [`show`](crate::PopupManager::show).
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Lane index owning the request. Required and non-zero when the
    /// manager has more than one lane; ignored with a single lane.
    pub target_lane: Option<usize>,

    /// Fine-grained ordering within the lane; higher activates sooner.
    /// Ties are serviced in insertion order.
    pub priority: i32,

    /// Whether this request may preempt an active request in a lane of
    /// lower-or-equal index. Defaults to `limit != 1`.
    pub force_show: Option<bool>,

    /// Whether a preemption re-enqueues this request at the front of its
    /// lane instead of discarding it. Defaults to `limit == 1`.
    pub resumable: Option<bool>,

    /// Jump the line: enqueue at the immediate front of the lane,
    /// bypassing priority ordering entirely.
    pub unshift: bool,
}

/// The hide handler currently bound to a request: the registration's
/// `on_hide`, or an override returned by `on_show` for this presentation.
#[derive(Clone)]
pub(crate) enum HideBinding {
    Registered(Arc<dyn Presentable>),
    Override(Arc<dyn Fn(Proceed) -> HideFuture + Send + Sync>),
}

impl HideBinding {
    pub(crate) fn override_from(handler: HideHandler) -> Self {
        Self::Override(Arc::from(handler))
    }

    /// Invoke the bound hide handler.
    pub(crate) async fn run(&self, proceed: Proceed) {
        match self {
            Self::Registered(presentable) => presentable.on_hide(proceed).await,
            Self::Override(handler) => (handler.as_ref())(proceed).await,
        }
    }
}

impl fmt::Debug for HideBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered(_) => f.write_str("Registered"),
            Self::Override(_) => f.write_str("Override"),
        }
    }
}

/// One presentation request, created per `show` call.
///
/// A request lives in exactly one lane, or in the active set, or nowhere
/// once hidden or discarded - never two places at once.
#[derive(Debug)]
pub(crate) struct ShowRequest {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) data: Value,
    pub(crate) target_lane: usize,
    pub(crate) priority: i32,
    pub(crate) force_show: bool,
    pub(crate) resumable: bool,
    pub(crate) hide: HideBinding,
}

impl ShowRequest {
    /// Preemption rule: may `self` (the candidate) displace `reference`,
    /// the oldest active request?
    pub(crate) fn preempts(&self, reference: &ShowRequest) -> bool {
        (reference.target_lane <= self.target_lane && self.force_show)
            || (reference.target_lane == self.target_lane && reference.priority < self.priority)
    }
}
