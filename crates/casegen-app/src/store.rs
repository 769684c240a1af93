//! Store driving the async test-case flows
//!
//! `TestStore` owns the [`AppState`] and a backend implementation, and
//! runs the fetch/generate flows against it. The UI reads `state`
//! between calls; nothing here is shared across threads.

use tracing::{debug, error, info, warn};

use casegen_client::drive_generation;
use casegen_core::events::StreamEvent;
use casegen_core::types::{
    GenerateRequest, GeneratedScript, Pagination, ScriptStatus, TestCase, TestCasePatch,
};

use crate::backend::TestBackend;
use crate::state::{AppState, UpdateOutcome};

/// Options for one generation run.
///
/// `framework` and `generate_report` are accepted for the UI's sake but
/// are not part of the backend payload.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub testing_tools: String,
    pub language: String,
    pub framework: Option<String>,
    pub generate_report: bool,
    pub test_cases: Vec<TestCase>,
}

/// State container for the test-case screen.
#[derive(Debug)]
pub struct TestStore<B> {
    pub state: AppState,
    backend: B,
}

impl<B: TestBackend> TestStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: AppState::new(),
            backend,
        }
    }

    /// Fetch cases for the current filter fields and merge them into
    /// both collections. Failures land in the shared error field.
    pub async fn fetch_test_cases(&mut self) {
        self.state.is_loading = true;

        let filter = self.state.filter();
        let fetched = self
            .backend
            .fetch_test_cases(&filter, false, None, Pagination::default())
            .await;
        match fetched {
            Ok(batch) => {
                info!(count = batch.test_cases.len(), "loaded test cases");
                self.state.merge_cases(&batch.test_cases);
            }
            Err(e) => {
                error!(error = %e, "failed to fetch test cases");
                self.state.record_error(e.to_string());
            }
        }
        self.state.is_loading = false;
    }

    /// Same fetch, merged into the display collection only.
    pub async fn append_test_cases(&mut self) {
        self.state.is_loading = true;

        let filter = self.state.filter();
        let fetched = self
            .backend
            .fetch_test_cases(&filter, false, None, Pagination::default())
            .await;
        match fetched {
            Ok(batch) => self.state.merge_processed(&batch.test_cases),
            Err(e) => {
                error!(error = %e, "failed to append test cases");
                self.state.record_error(e.to_string());
            }
        }
        self.state.is_loading = false;
    }

    /// Run script generation for `options.test_cases`.
    ///
    /// Pushes a `processing` record, then applies every stream event to
    /// that record as it arrives. On any failure the record is marked
    /// `error` and the message surfaces in the shared error field.
    pub async fn generate_scripts(&mut self, options: GenerateOptions) {
        self.state.is_loading = true;
        self.state.clear_error();

        debug!(
            tools = %options.testing_tools,
            language = %options.language,
            framework = ?options.framework,
            cases = options.test_cases.len(),
            "starting script generation"
        );

        if options.test_cases.is_empty() {
            warn!("generation requested without test cases");
            self.state.record_error("no test cases selected");
            self.state.is_loading = false;
            return;
        }

        self.state.generated_scripts.push(GeneratedScript::processing(
            &options.testing_tools,
            &options.language,
        ));
        let index = self.state.generated_scripts.len() - 1;
        self.state.show_scripts = true;

        let request = GenerateRequest {
            testing_tools: options.testing_tools,
            scripting_language: options.language,
            test_cases: options.test_cases,
        };

        let opened = self.backend.open_generation(&request).await;
        let outcome = match opened {
            Ok(stream) => {
                let record = &mut self.state.generated_scripts[index];
                drive_generation(stream, |event| apply_stream_event(record, event)).await
            }
            Err(e) => Err(e),
        };

        // The record is finalized by the completion event itself; the
        // resolved value is only checked for failure. The record shows
        // the bare failure text, the shared field the classified form.
        if let Err(e) = outcome {
            error!(error = %e, "script generation failed");
            self.state.generated_scripts[index].mark_error(e.detail());
            self.state.record_error(e.to_string());
        }
        self.state.is_loading = false;
    }

    /// See [`AppState::update_test_case`].
    pub fn update_test_case(&mut self, id: &str, patch: &TestCasePatch) -> UpdateOutcome {
        self.state.update_test_case(id, patch)
    }

    /// See [`AppState::delete_test_case`].
    pub fn delete_test_case(&mut self, id: &str) {
        self.state.delete_test_case(id);
    }

    /// See [`AppState::set_selected_cases`].
    pub fn set_selected_cases(&mut self, ids: Vec<String>) {
        self.state.set_selected_cases(ids);
    }
}

/// Apply one stream event to a generation record.
fn apply_stream_event(record: &mut GeneratedScript, event: &StreamEvent) {
    match event {
        StreamEvent::Progress(p) => record.progress = Some(p.progress),
        StreamEvent::Chunk(c) => {
            record.script.push_str(&c.chunk);
            record.test_case_id = c.test_case_id.clone();
        }
        StreamEvent::Complete(c) if c.is_final() => {
            record.status = ScriptStatus::Success;
            record.test_case_id = c.test_case_id.clone();
        }
        _ => {}
    }
}
