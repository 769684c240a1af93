//! # casegen-client - Backend Clients
//!
//! HTTP and streaming clients for the CaseGen backend: test-case
//! retrieval, and the server-push script-generation channel.
//!
//! ## Public API
//!
//! ### Configuration (`config`)
//! - [`ClientConfig`] - Backend origin
//!
//! ### HTTP (`transport`)
//! - [`Transport`] - JSON verbs plus the streaming POST, pinned to one origin
//!
//! ### Test Cases (`api`)
//! - [`TestApi`] - Endpoint selection, pagination merge, envelope unwrapping
//!
//! ### Script Generation (`generate`)
//! - [`ScriptStream`] - Typed event stream for one generation run
//! - [`drive_generation`] - Consume a stream to its final result
//!
//! ### Framing (`sse`)
//! - [`SseParser`], [`SseFrame`] - Incremental `text/event-stream` parsing
//!
//! ## Testing Support
//!
//! The `test-helpers` feature exposes `test_utils` with scripted streams
//! for downstream crates.

pub mod api;
pub mod config;
pub mod generate;
pub mod sse;
pub mod transport;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export the main entry points at crate root
pub use api::TestApi;
pub use config::ClientConfig;
pub use generate::{drive_generation, ScriptStream};
pub use sse::{SseFrame, SseParser};
pub use transport::Transport;
