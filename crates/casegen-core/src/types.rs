//! # CaseGen Domain Types
//!
//! Shared vocabulary between the client crates and the application state
//! container:
//! - `casegen-client` (request building, response decoding)
//! - `casegen-app` (state management and merging)
//!
//! ## Wire Assumptions
//!
//! - **Identifiers are `String`**: the backend issues free-form ids; no
//!   numeric assumptions.
//! - **Text fields may be empty**: every TestCase field except `id` is
//!   free text and defaults to `""` when the backend omits it.
//! - **Envelope**: non-streaming responses wrap their payload in a
//!   `processed_data` field; sibling fields are ignored.
//! - **Backend key casing is part of the contract**: `Test_website`,
//!   `pageSize`, `testCases`, and `tableFields` are spelled exactly as the
//!   backend expects them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ── TestCase ──────────────────────────────────────────────────────────────────

/// A single test-case record as the backend returns it.
///
/// `id` is the unique key used for merging, updating, and deleting; the
/// remaining fields are display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCase {
    pub id: String,
    pub feature: String,
    pub description: String,
    pub precondition: String,
    pub input: String,
    pub steps: String,
    pub expected: String,
    pub priority: String,
    pub method: String,
}

impl TestCase {
    /// Create a test case with the given id and empty text fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = steps.into();
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    /// Shallow-merge a patch into this record. Fields left `None` in the
    /// patch keep their current value. The id is not patchable.
    pub fn apply_patch(&mut self, patch: &TestCasePatch) {
        if let Some(v) = &patch.feature {
            self.feature = v.clone();
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = &patch.precondition {
            self.precondition = v.clone();
        }
        if let Some(v) = &patch.input {
            self.input = v.clone();
        }
        if let Some(v) = &patch.steps {
            self.steps = v.clone();
        }
        if let Some(v) = &patch.expected {
            self.expected = v.clone();
        }
        if let Some(v) = &patch.priority {
            self.priority = v.clone();
        }
        if let Some(v) = &patch.method {
            self.method = v.clone();
        }
    }
}

/// Partial update for a [`TestCase`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCasePatch {
    pub feature: Option<String>,
    pub description: Option<String>,
    pub precondition: Option<String>,
    pub input: Option<String>,
    pub steps: Option<String>,
    pub expected: Option<String>,
    pub priority: Option<String>,
    pub method: Option<String>,
}

// ── Fetch request types ───────────────────────────────────────────────────────

/// Free-form filter criteria sent to the test-case endpoints.
///
/// The `Test_website` wire key (capital T, snake case) is what the backend
/// expects; do not "fix" it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFilter {
    #[serde(rename = "Test_website")]
    pub website: String,
    pub module: String,
    pub description: String,
}

impl CaseFilter {
    pub fn new(
        website: impl Into<String>,
        module: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            module: module.into(),
            description: description.into(),
        }
    }
}

/// Page window merged into test-case fetch requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

// ── Script generation types ───────────────────────────────────────────────────

/// Normalized per-item shape submitted for script generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptCase {
    pub id: String,
    pub description: String,
    pub steps: String,
    pub expected: String,
}

/// Input to a script-generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub testing_tools: String,
    pub scripting_language: String,
    pub test_cases: Vec<TestCase>,
}

/// Lifecycle of a [`GeneratedScript`] record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptStatus {
    #[default]
    Processing,
    Success,
    Error,
}

impl ScriptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptStatus::Processing => "processing",
            ScriptStatus::Success => "success",
            ScriptStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ScriptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated-script record as held by the state container.
///
/// Created with `processing` status when a generation request starts; the
/// `script` text grows as chunks arrive and the status flips exactly once,
/// to `success` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedScript {
    pub test_case_id: String,
    pub script: String,
    pub testing_tools: String,
    pub scripting_language: String,
    pub timestamp: DateTime<Local>,
    pub status: ScriptStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedScript {
    /// Create the initial `processing` record for a new generation request.
    pub fn processing(
        testing_tools: impl Into<String>,
        scripting_language: impl Into<String>,
    ) -> Self {
        Self {
            test_case_id: String::new(),
            script: String::new(),
            testing_tools: testing_tools.into(),
            scripting_language: scripting_language.into(),
            timestamp: Local::now(),
            status: ScriptStatus::Processing,
            progress: None,
            error: None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == ScriptStatus::Processing
    }

    /// Finalize the record as failed, keeping whatever script text arrived.
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = ScriptStatus::Error;
        self.error = Some(message.into());
    }
}

/// The single resolved value of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub test_case_id: String,
    pub script: String,
    pub status: ScriptStatus,
}

// ── Response envelope ─────────────────────────────────────────────────────────

/// Outer response object for the non-streaming endpoints. Only the
/// `processed_data` field is consumed; siblings are opaque.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub processed_data: serde_json::Value,
}

/// Decoded `processed_data` payload of the test-case endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseBatch {
    #[serde(rename = "testCases", default)]
    pub test_cases: Vec<TestCase>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_to_first_page_of_ten() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
    }

    #[test]
    fn test_pagination_serializes_camel_case_page_size() {
        let json = serde_json::to_value(Pagination::default()).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["pageSize"], 10);
        assert!(json.get("page_size").is_none());
    }

    #[test]
    fn test_case_filter_wire_keys() {
        let filter = CaseFilter::new("https://shop.example", "checkout", "happy path");
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["Test_website"], "https://shop.example");
        assert_eq!(json["module"], "checkout");
        assert_eq!(json["description"], "happy path");
    }

    #[test]
    fn test_test_case_decodes_with_missing_fields() {
        let tc: TestCase = serde_json::from_str(r#"{"id": "tc-1", "feature": "login"}"#).unwrap();
        assert_eq!(tc.id, "tc-1");
        assert_eq!(tc.feature, "login");
        assert_eq!(tc.steps, "");
        assert_eq!(tc.expected, "");
    }

    #[test]
    fn test_apply_patch_merges_only_set_fields() {
        let mut tc = TestCase::new("tc-1")
            .with_description("old description")
            .with_steps("old steps");
        let patch = TestCasePatch {
            description: Some("new description".to_string()),
            ..Default::default()
        };

        tc.apply_patch(&patch);

        assert_eq!(tc.id, "tc-1");
        assert_eq!(tc.description, "new description");
        assert_eq!(tc.steps, "old steps");
    }

    #[test]
    fn test_apply_patch_can_blank_a_field() {
        let mut tc = TestCase::new("tc-1").with_expected("something");
        let patch = TestCasePatch {
            expected: Some(String::new()),
            ..Default::default()
        };

        tc.apply_patch(&patch);
        assert_eq!(tc.expected, "");
    }

    #[test]
    fn test_script_status_wire_form_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&ScriptStatus::Processing).unwrap(),
            "\"processing\""
        );
        let status: ScriptStatus = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(status, ScriptStatus::Success);
        assert_eq!(ScriptStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_generated_script_processing_initial_state() {
        let record = GeneratedScript::processing("selenium", "python");
        assert_eq!(record.test_case_id, "");
        assert_eq!(record.script, "");
        assert_eq!(record.testing_tools, "selenium");
        assert_eq!(record.scripting_language, "python");
        assert!(record.is_processing());
        assert!(record.progress.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn test_generated_script_mark_error_keeps_partial_text() {
        let mut record = GeneratedScript::processing("selenium", "python");
        record.script.push_str("partial");
        record.mark_error("backend exploded");

        assert_eq!(record.status, ScriptStatus::Error);
        assert_eq!(record.error.as_deref(), Some("backend exploded"));
        assert_eq!(record.script, "partial");
    }

    #[test]
    fn test_case_batch_decodes_test_cases_key() {
        let batch: CaseBatch =
            serde_json::from_str(r#"{"testCases": [{"id": "tc-1"}, {"id": "tc-2"}]}"#).unwrap();
        assert_eq!(batch.test_cases.len(), 2);
        assert_eq!(batch.test_cases[0].id, "tc-1");
    }

    #[test]
    fn test_case_batch_missing_array_decodes_empty() {
        let batch: CaseBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.test_cases.is_empty());
    }

    #[test]
    fn test_response_envelope_requires_processed_data() {
        let ok: ResponseEnvelope =
            serde_json::from_str(r#"{"processed_data": {"testCases": []}, "extra": 1}"#).unwrap();
        assert!(ok.processed_data.is_object());

        let missing = serde_json::from_str::<ResponseEnvelope>(r#"{"extra": 1}"#);
        assert!(missing.is_err());
    }
}
