//! Builder-side editing of a page: optimistic edits, debounced saving and
//! user notifications.

pub mod autosave;
pub mod config;
pub mod notification;
pub mod session;

pub use autosave::Autosave;
pub use config::{BuilderConfig, DEFAULT_AUTOSAVE_DELAY};
pub use notification::{Notification, NotificationLevel};
pub use session::{BuilderSession, SaveReport};
