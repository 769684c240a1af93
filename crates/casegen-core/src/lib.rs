//! # casegen-core - Core Domain Types
//!
//! Foundation crate for the CaseGen client. Provides the test-case domain
//! types, the typed script-generation stream events, error handling, and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`TestCase`] - A manual test case as stored by the backend
//! - [`TestCasePatch`] - Partial update applied to a [`TestCase`]
//! - [`CaseFilter`], [`Pagination`] - Query parameters for case retrieval
//! - [`GenerateRequest`], [`ScriptCase`] - Input to script generation
//! - [`GeneratedScript`], [`ScriptStatus`] - Per-case generation record
//! - [`GenerationResult`] - Final outcome of a generation run
//! - [`CaseBatch`], [`ResponseEnvelope`] - Backend response shapes
//!
//! ### Events (`events`)
//! - [`StreamEvent`] - Parsed events from the script-generation stream
//! - [`COMPLETION_MESSAGE`] - Backend marker that ends a generation run
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with validation vs transport classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use casegen_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all CaseGen crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{
    GenerationComplete, GenerationError, ProgressUpdate, ScriptChunk, StreamEvent,
    COMPLETION_MESSAGE,
};
pub use types::{
    CaseBatch, CaseFilter, GenerateRequest, GeneratedScript, GenerationResult, Pagination,
    ResponseEnvelope, ScriptCase, ScriptStatus, TestCase, TestCasePatch,
};
