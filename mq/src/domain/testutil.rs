//! Test doubles shared by unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::request::{HideBinding, ShowRequest};
use crate::registry::{HideHandler, Presentable};
use crate::scheduler::{CancelToken, Proceed};

/// Presentable that does nothing.
pub(crate) struct NullPresentable;

#[async_trait]
impl Presentable for NullPresentable {
    fn on_show(&self, _data: Value, _cancel: CancelToken) -> Option<HideHandler> {
        None
    }

    async fn on_hide(&self, _proceed: Proceed) {}
}

/// Bare request for queue-level tests.
pub(crate) fn request(target_lane: usize, priority: i32) -> ShowRequest {
    flagged(target_lane, priority, false, false)
}

pub(crate) fn flagged(target_lane: usize, priority: i32, force_show: bool, resumable: bool) -> ShowRequest {
    ShowRequest {
        id: Uuid::now_v7(),
        name: "popup".to_string(),
        data: Value::Null,
        target_lane,
        priority,
        force_show,
        resumable,
        hide: HideBinding::Registered(Arc::new(NullPresentable)),
    }
}
