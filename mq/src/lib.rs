//! Marquee - lane-based presentation scheduler for popups and dialogs
//!
//! Marquee decides which of a registry of named "presentable" units is
//! currently visible, in what order queued requests are serviced, and how
//! competing requests preempt or yield to one another. Callers register
//! show/hide behavior per name, then request presentation via `show`; the
//! manager handles ordering, priority, concurrency-limiting, and the
//! asynchronous show/hide handshake. Rendering itself stays with the
//! caller-supplied callbacks.
//!
//! # Core Concepts
//!
//! - **Lanes**: coarse priority tiers; the highest-indexed non-empty lane
//!   is serviced first, with a fine-grained priority index ordering
//!   requests within a lane
//! - **Active set**: the bounded collection of currently-shown requests,
//!   capacity 1 for the classic single-popup setup or N for stacked UIs
//! - **Preemption**: a forceful or higher-priority request displaces the
//!   oldest active one, which is re-enqueued when marked resumable
//! - **Handshake**: hiding awaits the unit's async teardown, with a
//!   one-shot `proceed` callback so teardown can resume scheduling early
//!
//! # Modules
//!
//! - [`registry`] - the `Presentable` capability pair and name registry
//! - [`scheduler`] - lane queues, active set, handshake, and the manager
//! - [`domain`] - request instances and show options
//! - [`config`] - manager configuration applied by `reset`
//! - [`error`] - caller-input validation failures

pub mod config;
pub mod domain;
pub mod error;
pub mod registry;
pub mod scheduler;

// Re-export the public surface
pub use config::ManagerConfig;
pub use domain::ShowOptions;
pub use error::PopupError;
pub use registry::{HideFuture, HideHandler, Presentable};
pub use scheduler::{CancelToken, PopupManager, Proceed};
