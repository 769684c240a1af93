//! Client configuration

/// Where the CaseGen backend lives.
///
/// The URL is validated when the transport is built, not here, so a
/// config can be constructed and edited freely before first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base origin for all endpoints, e.g. `http://localhost:8000`.
    /// Deployments that mount the API under a prefix include it here.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}
