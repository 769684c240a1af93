//! Test utilities for the generation stream
//!
//! Provides scripted [`ScriptStream`]s so state-container tests can run
//! generation flows without a backend.

use casegen_core::events::{
    GenerationComplete, GenerationError, ScriptChunk, StreamEvent, COMPLETION_MESSAGE,
};

use crate::generate::ScriptStream;

/// Creates a chunk event carrying `text` for `test_case_id`.
pub fn chunk_event(test_case_id: &str, text: &str) -> StreamEvent {
    StreamEvent::Chunk(ScriptChunk {
        chunk: text.to_string(),
        test_case_id: test_case_id.to_string(),
    })
}

/// Creates the terminal completion event for `test_case_id`.
pub fn final_complete_event(test_case_id: &str) -> StreamEvent {
    StreamEvent::Complete(GenerationComplete {
        message: COMPLETION_MESSAGE.to_string(),
        test_case_id: test_case_id.to_string(),
    })
}

/// Creates a stream that delivers `script` as one chunk and completes.
pub fn completed_stream(test_case_id: &str, script: &str) -> ScriptStream {
    ScriptStream::from_events(vec![
        Ok(chunk_event(test_case_id, script)),
        Ok(final_complete_event(test_case_id)),
    ])
}

/// Creates a stream that fails with a server-reported error.
pub fn failed_stream(message: &str) -> ScriptStream {
    ScriptStream::from_events(vec![Ok(StreamEvent::ServerError(GenerationError {
        error: message.to_string(),
    }))])
}
