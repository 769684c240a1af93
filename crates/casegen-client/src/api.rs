//! Test-case retrieval client

use casegen_core::prelude::*;
use casegen_core::types::{CaseBatch, CaseFilter, Pagination, ResponseEnvelope};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::transport::Transport;

/// Client for the CaseGen backend's test-case endpoints.
///
/// Built once per backend origin; cheap to clone.
#[derive(Debug, Clone)]
pub struct TestApi {
    pub(crate) transport: Transport,
}

/// Request body for a case fetch: filter criteria with the pagination
/// fields merged in at the top level.
#[derive(Debug, Serialize)]
struct FetchBody<'a> {
    #[serde(flatten)]
    filter: &'a CaseFilter,
    #[serde(flatten)]
    pagination: Pagination,
}

impl TestApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    /// Fetch manual test cases matching `filter`.
    ///
    /// The batch is the `processed_data` field of the response envelope;
    /// a response without it is an error.
    pub async fn fetch_test_cases(
        &self,
        filter: &CaseFilter,
        with_script: bool,
        script_id: Option<&str>,
        pagination: Pagination,
    ) -> Result<CaseBatch> {
        let path = select_endpoint("/process", with_script, script_id);
        let body = FetchBody { filter, pagination };

        let value = self
            .transport
            .post(&path, &body)
            .await
            .context("failed to fetch test cases")?;
        let batch: CaseBatch = serde_json::from_value(unwrap_envelope(value)?)?;

        debug!(%path, count = batch.test_cases.len(), "fetched test cases");
        Ok(batch)
    }

    /// Fetch stored test results matching `filter`.
    ///
    /// Same endpoint-selection policy as [`fetch_test_cases`] applied to
    /// the `/testresult` family, no pagination. The inner shape is
    /// backend-defined, so the raw `processed_data` value is returned.
    ///
    /// [`fetch_test_cases`]: TestApi::fetch_test_cases
    pub async fn fetch_test_results(
        &self,
        filter: &CaseFilter,
        with_script: bool,
        script_id: Option<&str>,
    ) -> Result<serde_json::Value> {
        let path = select_endpoint("/testresult", with_script, script_id);

        let value = self
            .transport
            .post(&path, filter)
            .await
            .context("failed to fetch test results")?;
        let data = unwrap_envelope(value)?;

        debug!(%path, "fetched test results");
        Ok(data)
    }
}

/// Decode the response envelope and pull out its `processed_data`
/// payload. Sibling fields are dropped; a response without the field is
/// an error.
fn unwrap_envelope(value: serde_json::Value) -> Result<serde_json::Value> {
    let envelope: ResponseEnvelope = serde_json::from_value(value)?;
    Ok(envelope.processed_data)
}

/// Pick the endpoint under `base`, first match wins: the script flag
/// with a concrete id, the script flag alone, then the plain listing.
/// An empty script id counts as absent.
fn select_endpoint(base: &str, with_script: bool, script_id: Option<&str>) -> String {
    match (with_script, script_id.filter(|id| !id.is_empty())) {
        (true, Some(id)) => format!("{}/script/{}", base, id),
        (true, None) => format!("{}/script", base),
        (false, _) => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_plain_listing() {
        assert_eq!(select_endpoint("/process", false, None), "/process");
        assert_eq!(select_endpoint("/testresult", false, None), "/testresult");
    }

    #[test]
    fn test_endpoint_with_script() {
        assert_eq!(select_endpoint("/process", true, None), "/process/script");
    }

    #[test]
    fn test_endpoint_script_id_requires_script_flag() {
        assert_eq!(
            select_endpoint("/process", true, Some("tc42")),
            "/process/script/tc42"
        );
        // Without the flag the id is ignored.
        assert_eq!(select_endpoint("/process", false, Some("tc42")), "/process");
    }

    #[test]
    fn test_endpoint_empty_script_id_counts_as_absent() {
        assert_eq!(select_endpoint("/process", true, Some("")), "/process/script");
        assert_eq!(select_endpoint("/process", false, Some("")), "/process");
    }

    #[test]
    fn test_endpoint_testresult_family() {
        assert_eq!(select_endpoint("/testresult", true, None), "/testresult/script");
        assert_eq!(
            select_endpoint("/testresult", true, Some("tc7")),
            "/testresult/script/tc7"
        );
    }

    #[test]
    fn test_unwrap_envelope_passes_payload_through_untouched() {
        let value = serde_json::json!({
            "processed_data": [{"run": 1, "passed": true}],
            "status": "ok"
        });
        let inner = unwrap_envelope(value).unwrap();
        // Result payloads are backend-defined; no reshaping happens here.
        assert_eq!(inner, serde_json::json!([{"run": 1, "passed": true}]));
    }

    #[test]
    fn test_unwrap_envelope_rejects_missing_payload() {
        let err = unwrap_envelope(serde_json::json!({"status": "ok"})).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_fetch_body_merges_pagination_at_top_level() {
        let filter = CaseFilter::new("shop.example.com", "checkout", "");
        let body = FetchBody {
            filter: &filter,
            pagination: Pagination::default(),
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["Test_website"], "shop.example.com");
        assert_eq!(value["module"], "checkout");
        assert_eq!(value["page"], 1);
        assert_eq!(value["pageSize"], 10);
        // Pagination merges flat, not nested.
        assert!(value.get("pagination").is_none());
    }
}
