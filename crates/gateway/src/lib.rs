//! Page aggregate cache and CRUD gateway in front of the site backend.
//!
//! [`cache::PageCache`] serves ordered component lists per page and mode,
//! coalescing concurrent fetches. [`components::ComponentGateway`] and
//! [`pages::PageGateway`] perform writes and invalidate the affected
//! `["pageComponents", slug]` entries afterwards.

pub mod cache;
pub mod components;
pub mod error;
pub mod pages;

pub use cache::{CacheKey, CacheStatus, ComponentList, PageCache};
pub use components::{
    ComponentGateway, CreateComponent, CreateComponentRequest, DeleteOutcome, UpdateComponent,
};
pub use error::GatewayError;
pub use pages::PageGateway;
