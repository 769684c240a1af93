//! Streaming script-generation client
//!
//! `open_generation` POSTs the selected cases to `/generate-scripts` and
//! hands back a [`ScriptStream`]: a background task owns the HTTP
//! response, parses server-sent-event frames as bytes arrive, and
//! forwards typed [`StreamEvent`]s through a bounded channel.
//! [`drive_generation`] consumes such a stream to a single final result.

use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use casegen_core::events::StreamEvent;
use casegen_core::prelude::*;
use casegen_core::types::{GenerateRequest, GenerationResult, ScriptCase, ScriptStatus, TestCase};

use crate::api::TestApi;
use crate::sse::SseParser;

/// Capacity of the typed event channel between the stream task and the
/// consumer. Parsing stalls when the consumer falls this far behind.
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ─────────────────────────────────────────────────────────
// ScriptStream
// ─────────────────────────────────────────────────────────

/// Handle to one in-flight generation run.
///
/// Events arrive in order through [`next_event`]; `None` means the
/// channel closed (stream over or cancelled). Dropping the handle
/// cancels the background task.
///
/// [`next_event`]: ScriptStream::next_event
#[derive(Debug)]
pub struct ScriptStream {
    event_rx: mpsc::Receiver<Result<StreamEvent>>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl ScriptStream {
    fn spawn(response: reqwest::Response) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        tokio::spawn(run_stream_task(response.bytes_stream(), event_tx, cancel_rx));
        Self {
            event_rx,
            cancel_tx: Some(cancel_tx),
        }
    }

    /// Receive the next event. `None` once the stream is over.
    pub async fn next_event(&mut self) -> Option<Result<StreamEvent>> {
        self.event_rx.recv().await
    }

    /// Cancel the run. The background task stops at the next loop
    /// iteration and the connection is dropped. Idempotent.
    pub fn close(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    /// Build a stream that replays `events` and then ends. No network,
    /// no background task.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn from_events(events: Vec<Result<StreamEvent>>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this cannot fail.
            let _ = event_tx.try_send(event);
        }
        Self {
            event_rx,
            cancel_tx: None,
        }
    }

    /// Build a stream fed manually through `event_rx`'s sender half.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn from_channel(event_rx: mpsc::Receiver<Result<StreamEvent>>) -> Self {
        Self {
            event_rx,
            cancel_tx: None,
        }
    }
}

impl Drop for ScriptStream {
    fn drop(&mut self) {
        self.close();
    }
}

// ─────────────────────────────────────────────────────────
// Generation API
// ─────────────────────────────────────────────────────────

/// Wire payload for `/generate-scripts`. The backend expects the
/// normalized cases under `tableFields`.
#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    testing_tools: &'a str,
    scripting_language: &'a str,
    #[serde(rename = "tableFields")]
    table_fields: Vec<ScriptCase>,
}

impl TestApi {
    /// Start a generation run and return its event stream.
    ///
    /// Input is validated before any network activity: an empty case
    /// list or a case without an id fails the whole call.
    pub async fn open_generation(&self, request: &GenerateRequest) -> Result<ScriptStream> {
        let table_fields = normalize_cases(&request.test_cases)?;
        let payload = GenerationPayload {
            testing_tools: &request.testing_tools,
            scripting_language: &request.scripting_language,
            table_fields,
        };

        let response = self.transport.post_stream("/generate-scripts", &payload).await?;
        info!(
            cases = payload.table_fields.len(),
            tools = %request.testing_tools,
            "opened script generation stream"
        );
        Ok(ScriptStream::spawn(response))
    }

    /// Run a whole generation to completion.
    ///
    /// Convenience wrapper over [`open_generation`] + [`drive_generation`].
    ///
    /// [`open_generation`]: TestApi::open_generation
    pub async fn generate_scripts(
        &self,
        request: &GenerateRequest,
        observe: impl FnMut(&StreamEvent),
    ) -> Result<GenerationResult> {
        let stream = self.open_generation(request).await?;
        drive_generation(stream, observe).await
    }
}

/// Map test cases to the wire shape sent to the generator.
///
/// Fails with a validation error on an empty list, or naming the first
/// position whose case has no id.
fn normalize_cases(cases: &[TestCase]) -> Result<Vec<ScriptCase>> {
    if cases.is_empty() {
        return Err(Error::invalid_input("no test cases provided"));
    }
    cases
        .iter()
        .enumerate()
        .map(|(index, case)| {
            if case.id.is_empty() {
                return Err(Error::missing_id(index));
            }
            Ok(ScriptCase {
                id: case.id.clone(),
                description: case.description.clone(),
                steps: case.steps.clone(),
                expected: case.expected.clone(),
            })
        })
        .collect()
}

/// Consume a [`ScriptStream`] to its final outcome.
///
/// Chunks accumulate into one script buffer; each chunk's `test_case_id`
/// overwrites the current one, so the last writer wins. Every event that
/// will be applied is first passed to `observe`. Terminal outcomes:
///
/// - a `complete` event carrying the completion marker resolves with the
///   accumulated script,
/// - a server `error` event rejects with a stream error,
/// - an event-level failure (malformed payload, transport loss) rejects
///   with that error,
/// - the stream ending early rejects with a stream error.
pub async fn drive_generation(
    mut stream: ScriptStream,
    mut observe: impl FnMut(&StreamEvent),
) -> Result<GenerationResult> {
    let mut script = String::new();
    let mut test_case_id = String::new();

    while let Some(event) = stream.next_event().await {
        let event = event?;
        match &event {
            StreamEvent::Progress(p) => {
                debug!(progress = p.progress, "generation progress");
                observe(&event);
            }
            StreamEvent::Chunk(c) => {
                script.push_str(&c.chunk);
                test_case_id = c.test_case_id.clone();
                observe(&event);
            }
            StreamEvent::Complete(c) if c.is_final() => {
                observe(&event);
                stream.close();
                info!(%test_case_id, bytes = script.len(), "script generation complete");
                return Ok(GenerationResult {
                    test_case_id,
                    script,
                    status: ScriptStatus::Success,
                });
            }
            StreamEvent::Complete(c) => {
                debug!(message = %c.message, "ignoring non-final completion event");
            }
            StreamEvent::ServerError(e) => {
                stream.close();
                warn!(error = %e.error, "backend reported generation failure");
                return Err(Error::stream(e.error.clone()));
            }
            StreamEvent::Unknown { event: name, .. } => {
                debug!(event = %name, "skipping unknown stream event");
            }
        }
    }
    Err(Error::stream("generation stream ended before completion"))
}

// ─────────────────────────────────────────────────────────
// Stream Task
// ─────────────────────────────────────────────────────────

/// Pump the HTTP response body through the frame parser and forward
/// typed events until the stream ends, a failure is forwarded, or the
/// consumer cancels.
async fn run_stream_task<S, B, E>(
    mut body: S,
    event_tx: mpsc::Sender<Result<StreamEvent>>,
    mut cancel_rx: oneshot::Receiver<()>,
) where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut parser = SseParser::new();

    loop {
        tokio::select! {
            _ = &mut cancel_rx => {
                debug!("generation stream cancelled");
                return;
            }
            chunk = body.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        let frames = match parser.push_chunk(bytes.as_ref()) {
                            Ok(frames) => frames,
                            Err(e) => {
                                let _ = event_tx.send(Err(e)).await;
                                return;
                            }
                        };
                        for frame in frames {
                            let event = StreamEvent::parse(&frame.event, &frame.data);
                            let failed = event.is_err();
                            if event_tx.send(event).await.is_err() {
                                // Consumer went away; stop reading.
                                return;
                            }
                            if failed {
                                return;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        let _ = event_tx
                            .send(Err(Error::transport(format!("generation stream failed: {}", e))))
                            .await;
                        return;
                    }
                    None => {
                        debug!("generation stream closed by server");
                        return;
                    }
                }
            }
        }
    }
}
