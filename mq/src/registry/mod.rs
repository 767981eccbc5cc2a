//! Registration: the `Presentable` capability pair and the name registry
//!
//! A registration binds a unique name to show/hide behavior. The registry
//! is write-once per name: there is no update or unregister operation, and
//! the only way to clear it is a full manager reset.

mod store;
mod traits;

pub use traits::{HideFuture, HideHandler, Presentable};

pub(crate) use store::Registry;
