//! # casegen-app - Application State Container
//!
//! Owns the UI-observable state for the test-case screen and drives the
//! async flows against a backend implementation.
//!
//! ## Architecture
//!
//! - [`state`] - [`AppState`], the plain value the UI renders, plus its
//!   synchronous collection operations
//! - [`backend`] - the [`TestBackend`] seam between store and network
//! - [`store`] - [`TestStore`], the async fetch and generation flows
//!
//! The store mutates state only while one of its operations is awaited;
//! the UI reads `store.state` between calls.

pub mod backend;
pub mod state;
pub mod store;

pub use backend::{LocalTestBackend, TestBackend};
pub use state::{AppState, UpdateOutcome};
pub use store::{GenerateOptions, TestStore};
