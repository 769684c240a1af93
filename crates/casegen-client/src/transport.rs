//! HTTP transport pinned to one backend origin

use casegen_core::prelude::*;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;

/// Thin wrapper around [`reqwest::Client`].
///
/// No retries, no auth, no backoff. Non-2xx responses become
/// [`Error::HttpStatus`] carrying the status code and response text;
/// connection-level failures become [`Error::Transport`].
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base: Url,
}

impl Transport {
    /// Build a transport for the configured origin.
    ///
    /// Fails with [`Error::Config`] when the base URL does not parse or
    /// is not an http(s) address.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            Error::config(format!("invalid base URL {:?}: {}", config.base_url, e))
        })?;
        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::config(format!(
                    "unsupported scheme {:?} in base URL {:?}",
                    other, config.base_url
                )));
            }
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// Absolute URL for an endpoint path.
    ///
    /// `path` always starts with `/`; a path prefix on the base origin
    /// (e.g. a reverse-proxy mount point) is preserved.
    fn url_for(&self, path: &str) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = self.url_for(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::transport(format!("GET {} failed: {}", url, e)))?;
        Self::decode_json(&url, response).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<serde_json::Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("POST {} failed: {}", url, e)))?;
        Self::decode_json(&url, response).await
    }

    pub async fn put<B>(&self, path: &str, body: &B) -> Result<serde_json::Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        debug!(%url, "PUT");
        let response = self
            .http
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("PUT {} failed: {}", url, e)))?;
        Self::decode_json(&url, response).await
    }

    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = self.url_for(path);
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::transport(format!("DELETE {} failed: {}", url, e)))?;
        Self::decode_json(&url, response).await
    }

    /// POST that hands back the open response for incremental reads.
    ///
    /// Status is still checked here, so callers only see a response they
    /// can stream from.
    pub async fn post_stream<B>(&self, path: &str, body: &B) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        debug!(%url, "POST (stream)");
        let response = self
            .stream_request(&url, body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("POST {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%url, status = status.as_u16(), "backend rejected stream request");
            return Err(Error::http_status(status.as_u16(), body));
        }
        Ok(response)
    }

    /// Request for the server-push endpoint: JSON body, event-stream
    /// accept header.
    fn stream_request<B>(&self, url: &str, body: &B) -> reqwest::RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        self.http
            .post(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(body)
    }

    async fn decode_json(url: &str, response: reqwest::Response) -> Result<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%url, status = status.as_u16(), "backend returned error status");
            return Err(Error::http_status(status.as_u16(), body));
        }
        response
            .json()
            .await
            .map_err(|e| Error::transport(format!("failed to decode response from {}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_for(base: &str) -> Transport {
        Transport::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_url_for_joins_path() {
        let transport = transport_for("http://localhost:8000");
        assert_eq!(transport.url_for("/process"), "http://localhost:8000/process");
    }

    #[test]
    fn test_url_for_strips_trailing_slash() {
        let transport = transport_for("http://localhost:8000/");
        assert_eq!(
            transport.url_for("/generate-scripts"),
            "http://localhost:8000/generate-scripts"
        );
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let transport = transport_for("https://qa.example.com/api");
        assert_eq!(
            transport.url_for("/process/script/tc1"),
            "https://qa.example.com/api/process/script/tc1"
        );
    }

    #[test]
    fn test_new_rejects_unparseable_base() {
        let err = Transport::new(&ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let err = Transport::new(&ClientConfig::new("ftp://host/files")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_stream_request_declares_event_stream_accept() {
        let transport = transport_for("http://localhost:8000");
        let request = transport
            .stream_request(
                "http://localhost:8000/generate-scripts",
                &serde_json::json!({"testing_tools": "selenium"}),
            )
            .build()
            .unwrap();

        let headers = request.headers();
        assert_eq!(
            headers.get(reqwest::header::ACCEPT).unwrap().to_str().unwrap(),
            "text/event-stream"
        );
        assert_eq!(
            headers.get(reqwest::header::CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
    }
}
