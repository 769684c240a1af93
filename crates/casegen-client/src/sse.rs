//! Incremental parser for `text/event-stream` framing
//!
//! The backend pushes script-generation events as server-sent events.
//! Chunks arrive at arbitrary boundaries, so the parser buffers raw
//! bytes and only interprets complete lines. Fields other than `event`
//! and `data` (comments, `id`, `retry`) are ignored.

use casegen_core::prelude::*;

/// One dispatched event frame.
///
/// `event` falls back to `"message"` when the frame carried no `event`
/// field; `data` is the joined payload of all `data` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Line-oriented state machine fed with raw response bytes.
///
/// A partial line (or a multi-byte character split across chunks) stays
/// buffered until its newline arrives. A frame that never reaches its
/// terminating blank line is silently discarded when the parser drops.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of response bytes, returning every frame the chunk
    /// completed.
    ///
    /// Fails with [`Error::Stream`] when a complete line is not valid
    /// UTF-8; the parser is not usable afterwards.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let line = std::str::from_utf8(&line)
                .map_err(|e| Error::stream(format!("invalid UTF-8 in event stream: {}", e)))?;
            if let Some(frame) = self.feed_line(line) {
                frames.push(frame);
            }
        }
        Ok(frames)
    }

    fn feed_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.find(':') {
            Some(idx) => {
                let value = &line[idx + 1..];
                (&line[..idx], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    // Blank line: emit the buffered frame, if any data accumulated. The
    // event type resets either way.
    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        Some(SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}
