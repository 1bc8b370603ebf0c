//! Event store and query engine for the Pathlog query service.
//!
//! # Modules
//!
//! - [`store`] -- The immutable in-memory [`EventStore`] and its loader
//! - [`query`] -- Filtered listing and positional lookup
//! - [`summary`] -- Bot list, grid bounds, and path metrics
//! - [`error`] -- Loader errors
//!
//! The store is loaded once and never mutated, so it can be shared across
//! request handlers behind a plain [`std::sync::Arc`].

pub mod error;
pub mod query;
pub mod store;
pub mod summary;

pub use error::StoreError;
pub use query::{CoordinateFilter, Criteria, StepQuery};
pub use store::EventStore;
