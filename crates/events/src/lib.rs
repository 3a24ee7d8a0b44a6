//! Site builder event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`SiteEvent`]: the event envelope, including the page component
//!   invalidation broadcast every mutation emits.

pub mod bus;

pub use bus::{EventBus, SiteEvent};
