//! Hide handshake: the one-shot proceed probe

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::debug;

use super::manager::{ManagerState, PopupManager};
use crate::domain::ShowRequest;
use crate::registry::Presentable;

/// What runs when a hide handshake completes.
pub(crate) enum Continuation {
    /// Ordinary hide: generic scheduler progression.
    Advance,

    /// Preemption: activate the replacement request. An activation staged
    /// before a reset is dropped when it fires (epoch mismatch).
    Activate {
        request: ShowRequest,
        registration: Arc<dyn Presentable>,
        epoch: u64,
    },
}

/// One-shot continuation handed to [`on_hide`](crate::Presentable::on_hide)
/// during a hide handshake.
///
/// The first [`call`](Proceed::call) consumes the continuation and resumes
/// scheduling; later calls find it gone. The scheduler invokes the same
/// probe as a fallback once `on_hide` resolves, so progression happens
/// exactly once whether or not the callee remembered to proceed - and
/// early, when a conscientious callee proceeds at the start of its close
/// animation rather than after it.
#[derive(Clone)]
pub struct Proceed {
    state: Weak<tokio::sync::Mutex<ManagerState>>,
    slot: Arc<Mutex<Option<Continuation>>>,
}

impl Proceed {
    pub(crate) fn new(state: Weak<tokio::sync::Mutex<ManagerState>>, continuation: Continuation) -> Self {
        Self {
            state,
            slot: Arc::new(Mutex::new(Some(continuation))),
        }
    }

    /// Resume scheduling, possibly ahead of `on_hide` completion.
    pub async fn call(&self) {
        let continuation = self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(continuation) = continuation else {
            debug!("Proceed::call: already consumed");
            return;
        };
        let Some(state) = self.state.upgrade() else {
            debug!("Proceed::call: manager dropped");
            return;
        };

        PopupManager::from_state(state).resume(continuation).await;
    }

    /// True once the continuation has been claimed.
    pub(crate) fn consumed(&self) -> bool {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_is_one_shot() {
        let proceed = Proceed::new(Weak::new(), Continuation::Advance);
        assert!(!proceed.consumed());

        proceed.call().await;
        assert!(proceed.consumed());

        // Nothing left for a second call.
        proceed.call().await;
        assert!(proceed.consumed());
    }

    #[tokio::test]
    async fn test_clones_share_the_probe() {
        let proceed = Proceed::new(Weak::new(), Continuation::Advance);
        let callee_copy = proceed.clone();

        callee_copy.call().await;

        // The scheduler's fallback sees the callee's early call.
        assert!(proceed.consumed());
    }
}
