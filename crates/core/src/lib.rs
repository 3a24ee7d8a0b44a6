//! Domain model for the site builder.
//!
//! Pages, component instances, the component schema registry, merge-patch
//! semantics for partial updates, and tenant resolution. Nothing in this
//! crate performs I/O.

pub mod collections;
pub mod component;
pub mod error;
pub mod merge;
pub mod page;
pub mod roles;
pub mod schema;
pub mod tenant;
pub mod types;
