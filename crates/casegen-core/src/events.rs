//! Typed events for the script-generation stream

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Completion marker sent by the backend in the final `complete` event.
/// A `complete` event with any other message is not terminal.
pub const COMPLETION_MESSAGE: &str = "所有测试脚本生成完成";

// ─────────────────────────────────────────────────────────
// Event Payload Structs
// ─────────────────────────────────────────────────────────

/// Progress notification for the whole generation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressUpdate {
    /// Percentage in 0..=100
    #[serde(default)]
    pub progress: u8,
}

/// One incremental piece of generated script text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScriptChunk {
    #[serde(default)]
    pub chunk: String,
    #[serde(default)]
    pub test_case_id: String,
}

/// Completion marker, terminal only when `message` matches
/// [`COMPLETION_MESSAGE`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationComplete {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub test_case_id: String,
}

impl GenerationComplete {
    /// True when this event carries the backend's completion marker.
    pub fn is_final(&self) -> bool {
        self.message == COMPLETION_MESSAGE
    }
}

/// Server-reported failure; always terminal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationError {
    #[serde(default)]
    pub error: String,
}

// ─────────────────────────────────────────────────────────
// StreamEvent Enum
// ─────────────────────────────────────────────────────────

/// Fully typed event from the `/generate-scripts` stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Progress(ProgressUpdate),
    Chunk(ScriptChunk),
    Complete(GenerationComplete),
    ServerError(GenerationError),

    // Fallback for event names this client does not know; skipped by
    // consumers so the backend can add event types without breaking us
    Unknown {
        event: String,
        data: serde_json::Value,
    },
}

impl StreamEvent {
    /// Parse one server-sent event into a typed [`StreamEvent`].
    ///
    /// The data payload must be valid JSON for every event, known or not
    /// — a payload that does not parse is a protocol violation and fails
    /// the whole stream. Unrecognized event names with well-formed
    /// payloads become [`StreamEvent::Unknown`].
    pub fn parse(event: &str, data: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(data)?;

        let parsed = match event {
            "progress" => StreamEvent::Progress(serde_json::from_value(value)?),
            "script_chunk" => StreamEvent::Chunk(serde_json::from_value(value)?),
            "complete" => StreamEvent::Complete(serde_json::from_value(value)?),
            "error" => StreamEvent::ServerError(serde_json::from_value(value)?),
            _ => StreamEvent::Unknown {
                event: event.to_string(),
                data: value,
            },
        };
        Ok(parsed)
    }

    /// True for events that end the stream: a server error, or a
    /// completion event carrying the completion marker.
    pub fn is_terminal(&self) -> bool {
        match self {
            StreamEvent::ServerError(_) => true,
            StreamEvent::Complete(c) => c.is_final(),
            _ => false,
        }
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        match self {
            StreamEvent::Progress(p) => format!("progress {}%", p.progress),
            StreamEvent::Chunk(c) => {
                format!("chunk for {} ({} bytes)", c.test_case_id, c.chunk.len())
            }
            StreamEvent::Complete(c) => {
                if c.is_final() {
                    "generation complete".to_string()
                } else {
                    format!("complete (non-final): {}", c.message)
                }
            }
            StreamEvent::ServerError(e) => format!("server error: {}", e.error),
            StreamEvent::Unknown { event, .. } => format!("unknown event: {}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_event() {
        let event = StreamEvent::parse("progress", r#"{"progress": 45}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Progress(ProgressUpdate { progress: 45 })
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_parse_script_chunk_event() {
        let event =
            StreamEvent::parse("script_chunk", r#"{"chunk": "def test():", "test_case_id": "tc1"}"#)
                .unwrap();
        match event {
            StreamEvent::Chunk(c) => {
                assert_eq!(c.chunk, "def test():");
                assert_eq!(c.test_case_id, "tc1");
            }
            other => panic!("expected Chunk, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chunk_with_missing_fields_defaults_empty() {
        let event = StreamEvent::parse("script_chunk", "{}").unwrap();
        assert_eq!(
            event,
            StreamEvent::Chunk(ScriptChunk {
                chunk: String::new(),
                test_case_id: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_final_complete_event() {
        let data = format!(r#"{{"message": "{}", "test_case_id": "tc1"}}"#, COMPLETION_MESSAGE);
        let event = StreamEvent::parse("complete", &data).unwrap();
        assert!(event.is_terminal());
        match event {
            StreamEvent::Complete(c) => {
                assert!(c.is_final());
                assert_eq!(c.test_case_id, "tc1");
            }
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_final_complete_event() {
        let event =
            StreamEvent::parse("complete", r#"{"message": "one script done"}"#).unwrap();
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_parse_error_event_is_terminal() {
        let event = StreamEvent::parse("error", r#"{"error": "boom"}"#).unwrap();
        assert!(event.is_terminal());
        assert_eq!(
            event,
            StreamEvent::ServerError(GenerationError {
                error: "boom".to_string()
            })
        );
    }

    #[test]
    fn test_parse_unknown_event_name_is_kept() {
        let event = StreamEvent::parse("heartbeat", r#"{"alive": true}"#).unwrap();
        match event {
            StreamEvent::Unknown { event, data } => {
                assert_eq!(event, "heartbeat");
                assert_eq!(data["alive"], true);
            }
            other => panic!("expected Unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_payload_fails() {
        assert!(StreamEvent::parse("script_chunk", "{not json").is_err());
        // Malformed data fails even for event names we do not know.
        assert!(StreamEvent::parse("heartbeat", "{not json").is_err());
    }

    #[test]
    fn test_summary_is_compact() {
        let event = StreamEvent::parse("progress", r#"{"progress": 80}"#).unwrap();
        assert_eq!(event.summary(), "progress 80%");

        let event = StreamEvent::parse("error", r#"{"error": "boom"}"#).unwrap();
        assert_eq!(event.summary(), "server error: boom");
    }
}
