//! Manager configuration

use serde::{Deserialize, Serialize};

/// Configuration applied by [`reset`](crate::PopupManager::reset).
///
/// Every field is optional: an unset field preserves the manager's current
/// value, so a partial config can adjust one knob without restating the
/// rest. Fresh managers start from one lane, limit 1, queued mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Number of lanes (coarse priority tiers), at least 1
    #[serde(default)]
    pub lane_count: Option<usize>,

    /// Active-set capacity, at least 1
    #[serde(default)]
    pub limit: Option<usize>,

    /// Disable queueing entirely: each `show` immediately replaces the
    /// current presentation
    #[serde(default)]
    pub single_slot: Option<bool>,
}
