//! Presentable trait definition

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::scheduler::{CancelToken, Proceed};

/// Future returned by hide handlers.
pub type HideFuture = BoxFuture<'static, ()>;

/// Hide handler returned by [`Presentable::on_show`] to override the
/// registered `on_hide` for the presentation being shown.
pub type HideHandler = Box<dyn Fn(Proceed) -> HideFuture + Send + Sync>;

/// A named unit the manager can present: a dialog, popup, toast.
///
/// The pair is a capability contract, not a base class: variants differ
/// only in name and payload, never in behavior shape.
#[async_trait]
pub trait Presentable: Send + Sync {
    /// Called when the scheduler activates a request for this unit.
    ///
    /// `data` is the opaque payload from the originating `show` call and
    /// `cancel` dismisses this specific presentation. Runs on the
    /// scheduler's critical path, so implementations must not block on
    /// manager re-entry; spawn instead. Returning a handler overrides the
    /// registered [`on_hide`](Presentable::on_hide) for this presentation.
    fn on_show(&self, data: Value, cancel: CancelToken) -> Option<HideHandler>;

    /// Called when the active presentation is hidden.
    ///
    /// Invoke `proceed` as soon as scheduling may resume, e.g. when a
    /// close animation starts. Forgetting it is safe: the scheduler fires
    /// the same continuation once this future resolves.
    async fn on_hide(&self, proceed: Proceed);
}
