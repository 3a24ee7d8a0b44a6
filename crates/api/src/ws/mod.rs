//! WebSocket infrastructure for invalidation push.
//!
//! Provides connection management, heartbeat monitoring, the HTTP upgrade
//! handler, and the forwarder that relays page invalidations to clients.

mod handler;
mod heartbeat;
pub mod invalidation;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use invalidation::InvalidationForwarder;
pub use manager::WsManager;
