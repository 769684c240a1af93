//! Backend seam for the state container

use casegen_client::{ScriptStream, TestApi};
use casegen_core::error::Result;
use casegen_core::types::{CaseBatch, CaseFilter, GenerateRequest, Pagination};

/// What the store needs from a backend.
///
/// [`TestApi`] is the production implementation; tests substitute
/// scripted fakes.
#[trait_variant::make(TestBackend: Send)]
pub trait LocalTestBackend {
    /// Fetch a page of test cases matching `filter`.
    async fn fetch_test_cases(
        &self,
        filter: &CaseFilter,
        with_script: bool,
        script_id: Option<&str>,
        pagination: Pagination,
    ) -> Result<CaseBatch>;

    /// Start a script-generation run for `request`.
    async fn open_generation(&self, request: &GenerateRequest) -> Result<ScriptStream>;
}

impl TestBackend for TestApi {
    async fn fetch_test_cases(
        &self,
        filter: &CaseFilter,
        with_script: bool,
        script_id: Option<&str>,
        pagination: Pagination,
    ) -> Result<CaseBatch> {
        TestApi::fetch_test_cases(self, filter, with_script, script_id, pagination).await
    }

    async fn open_generation(&self, request: &GenerateRequest) -> Result<ScriptStream> {
        TestApi::open_generation(self, request).await
    }
}
