//! Client for the external training platform.
//!
//! Stage jobs submit work here and block until the platform reports an
//! outcome. Submissions can take hours; no timeout is imposed by the
//! coordinator itself.

use crate::errors::StageError;
use std::collections::HashMap;

/// An HTTP client for the training platform's task endpoints.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlatformClient {
    /// Creates a client for the platform at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// The platform base URL this client targets.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits a task and waits for its result object.
    ///
    /// POSTs `args` as JSON to `{base_url}/{task}`. A non-success HTTP
    /// status or an unparseable response maps to [`StageError::Platform`]
    /// attributed to `task`.
    pub async fn submit(
        &self,
        task: &str,
        args: &serde_json::Value,
    ) -> Result<HashMap<String, serde_json::Value>, StageError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), task);

        let response = self
            .http
            .post(&url)
            .json(args)
            .send()
            .await
            .map_err(|err| StageError::platform(task, err.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|err| StageError::platform(task, err.to_string()))?;

        response
            .json::<HashMap<String, serde_json::Value>>()
            .await
            .map_err(|err| StageError::platform(task, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_kept_verbatim() {
        let client = PlatformClient::new("http://platform:9090/");
        assert_eq!(client.base_url(), "http://platform:9090/");
    }

    #[tokio::test]
    async fn test_unreachable_platform_maps_to_stage_error() {
        // Grab a free local port, then release it so the connection is
        // refused immediately.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PlatformClient::new(format!("http://{addr}"));
        let err = client
            .submit("ner/etl", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Platform { .. }));
        assert!(err.to_string().contains("ner/etl"));
    }
}
