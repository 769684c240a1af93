//! UI-observable application state
//!
//! `AppState` is a plain value the UI renders from. All mutation here is
//! synchronous; the async flows live in the store.

use casegen_core::error::Error;
use casegen_core::types::{CaseFilter, GeneratedScript, TestCase, TestCasePatch};

/// Everything the test-case screen renders.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Filter form fields.
    pub website: String,
    pub module: String,
    pub description: String,

    /// Raw test cases as fetched.
    pub test_cases: Vec<TestCase>,
    /// Display collection backing the case table. Deliberately not kept
    /// in lockstep with `test_cases` on delete, see [`delete_test_case`].
    ///
    /// [`delete_test_case`]: AppState::delete_test_case
    pub processed_test_cases: Vec<TestCase>,
    /// One record per generation run, in start order.
    pub generated_scripts: Vec<GeneratedScript>,

    pub is_loading: bool,
    pub show_scripts: bool,
    /// Shared failure message for fetch and generation flows.
    /// `update_test_case` reports through its return value instead.
    pub error: Option<String>,
    /// Ids of the cases picked for the next generation run.
    pub selected_cases: Vec<String>,
}

/// Outcome of [`AppState::update_test_case`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl UpdateOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter built from the current form fields.
    pub fn filter(&self) -> CaseFilter {
        CaseFilter::new(&self.website, &self.module, &self.description)
    }

    /// Merge fetched cases into both collections.
    ///
    /// Append-only union on id: entries already present keep their
    /// current contents, new ones are appended in batch order.
    pub fn merge_cases(&mut self, batch: &[TestCase]) {
        merge_by_id(&mut self.processed_test_cases, batch);
        merge_by_id(&mut self.test_cases, batch);
    }

    /// Merge fetched cases into the display collection only.
    pub fn merge_processed(&mut self, batch: &[TestCase]) {
        merge_by_id(&mut self.processed_test_cases, batch);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Shallow-merge `patch` into the entries with this id.
    ///
    /// The raw collection decides existence; the display entry is
    /// patched when present. Does not touch the shared `error` field in
    /// any outcome.
    pub fn update_test_case(&mut self, id: &str, patch: &TestCasePatch) -> UpdateOutcome {
        if id.is_empty() {
            return UpdateOutcome::failure(Error::invalid_input("missing test case id").to_string());
        }
        let Some(case) = self.test_cases.iter_mut().find(|c| c.id == id) else {
            return UpdateOutcome::failure(Error::not_found(id).to_string());
        };
        case.apply_patch(patch);

        if let Some(case) = self.processed_test_cases.iter_mut().find(|c| c.id == id) {
            case.apply_patch(patch);
        }
        UpdateOutcome::success()
    }

    /// Remove the entry with this id from the raw collection.
    ///
    /// The display collection keeps its entry; the table historically
    /// retains deleted rows until the next full refresh.
    pub fn delete_test_case(&mut self, id: &str) {
        self.test_cases.retain(|c| c.id != id);
    }

    /// Replace the selected-id list.
    pub fn set_selected_cases(&mut self, ids: Vec<String>) {
        self.selected_cases = ids;
    }

    /// Cases whose ids are currently selected, in collection order.
    pub fn selected_test_cases(&self) -> Vec<TestCase> {
        self.processed_test_cases
            .iter()
            .filter(|c| self.selected_cases.iter().any(|id| id == &c.id))
            .cloned()
            .collect()
    }
}

fn merge_by_id(existing: &mut Vec<TestCase>, batch: &[TestCase]) {
    for case in batch {
        if !existing.iter().any(|c| c.id == case.id) {
            existing.push(case.clone());
        }
    }
}
