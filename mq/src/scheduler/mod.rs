//! Presentation scheduling
//!
//! Lane-based priority queues, the bounded active set, the hide
//! handshake, and the manager that drives activation, preemption, and
//! self-healing progression between them.

mod active;
mod handshake;
mod lanes;
mod manager;

pub use handshake::Proceed;
pub use manager::{CancelToken, PopupManager};
