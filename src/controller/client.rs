use std::time::Duration;

use reqwest::{Client, Url};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::ControllerApi;
use super::error::ControllerError;
use super::types::Page;
use crate::analysis::{NodeDescriptor, WorkflowId};
use crate::config::{RetryPolicy, TriageConfig};

const STDOUT_QUERY: &str = "format=txt&content_format=txt&content_encoding=plain";

/// REST client for the automation controller's `/api/v2` endpoints.
pub struct ControllerClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    retry: RetryPolicy,
    page_size: u32,
}

impl ControllerClient {
    pub fn new(config: &TriageConfig) -> Result<Self, ControllerError> {
        let retry = config.retry_policy();
        let mut base_url = Url::parse(&config.controller_host)
            .map_err(|e| ControllerError::InvalidUrl(format!("{}: {e}", config.controller_host)))?;
        // Request paths are relative, so the base path must end in `/` to survive `join`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(retry.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
            retry,
            page_size: config.page_size,
        })
    }

    fn url(&self, path_and_query: &str) -> Result<Url, ControllerError> {
        self.base_url
            .join(path_and_query)
            .map_err(|e| ControllerError::InvalidUrl(format!("{path_and_query}: {e}")))
    }

    async fn get_once(&self, url: &Url) -> Result<String, ControllerError> {
        let mut request = self.client.get(url.clone());
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ControllerError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }

    /// GET `url`, retrying any failure up to the configured attempt count.
    async fn get_with_retry(&self, url: &Url) -> Result<String, ControllerError> {
        let mut attempt = 1;
        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < self.retry.max_attempts => {
                    warn!(
                        %url,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %err,
                        "request failed, retrying"
                    );
                    sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl ControllerApi for ControllerClient {
    async fn workflow_nodes(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<NodeDescriptor>, ControllerError> {
        let mut url = self.url(&format!(
            "api/v2/workflow_jobs/{workflow_id}/workflow_nodes/?page_size={}",
            self.page_size
        ))?;
        let mut nodes = Vec::new();
        let mut expected = None;

        loop {
            let body = self.get_with_retry(&url).await?;
            let page: Page<NodeDescriptor> = serde_json::from_str(&body)?;
            debug!(%url, fetched = page.results.len(), total = ?page.count, "workflow nodes page");
            expected = page.count.or(expected);
            nodes.extend(page.results);

            let Some(next) = page.next.filter(|next| !next.is_empty()) else {
                break;
            };
            let next_url = self.url(&next)?;
            if next_url == url {
                warn!(%url, "pagination link points at the current page, stopping");
                break;
            }
            url = next_url;
        }

        if let Some(total) = expected.filter(|total| *total != nodes.len() as u64) {
            warn!(total, fetched = nodes.len(), "node count differs from the controller's total");
        }
        Ok(nodes)
    }

    async fn job_stdout(&self, job_id: u64) -> Result<String, ControllerError> {
        let url = self.url(&format!("api/v2/jobs/{job_id}/stdout/?{STDOUT_QUERY}"))?;
        self.get_with_retry(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ControllerClient {
        let config = TriageConfig {
            controller_host: server.uri(),
            username: "admin".into(),
            password: "secret".into(),
            max_attempts: 3,
            retry_delay_ms: 0,
            timeout_secs: 5,
            ..Default::default()
        };
        ControllerClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn fetches_plain_stdout_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/jobs/12/stdout/"))
            .and(query_param("format", "txt"))
            .and(query_param("content_format", "txt"))
            .and(query_param("content_encoding", "plain"))
            // base64("admin:secret")
            .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("PLAY RECAP\n"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let text = client.job_stdout(12).await.unwrap();
        assert_eq!(text, "PLAY RECAP\n");
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/jobs/3/stdout/"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/jobs/3/stdout/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert_eq!(client.job_stdout(3).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/jobs/4/stdout/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.job_stdout(4).await.unwrap_err();
        match err {
            ControllerError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "missing");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn follows_pagination_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/workflow_jobs/9/workflow_nodes/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 3,
                "next": null,
                "results": [
                    {"id": 3, "summary_fields": {"job": {"id": 30, "name": "c", "status": "failed"}}}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/workflow_jobs/9/workflow_nodes/"))
            .and(query_param("page_size", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 3,
                "next": "/api/v2/workflow_jobs/9/workflow_nodes/?page=2",
                "results": [
                    {"id": 1, "summary_fields": {"job": {"id": 10, "name": "a", "status": "successful"}}},
                    {"id": 2}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let nodes = client
            .workflow_nodes(&WorkflowId::Numeric(9))
            .await
            .unwrap();
        let ids: Vec<Option<u64>> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn keeps_host_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/awx/api/v2/jobs/1/stdout/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("prefixed"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/awx/api/v2/workflow_jobs/2/workflow_nodes/"))
            .and(query_param("page_size", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "next": "/awx/api/v2/workflow_jobs/2/workflow_nodes/?page=2",
                "results": [{"id": 1}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/awx/api/v2/workflow_jobs/2/workflow_nodes/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "next": null,
                "results": [{"id": 2}]
            })))
            .mount(&server)
            .await;

        let config = TriageConfig {
            controller_host: format!("{}/awx", server.uri()),
            retry_delay_ms: 0,
            max_attempts: 1,
            ..Default::default()
        };
        let client = ControllerClient::new(&config).unwrap();
        assert_eq!(client.job_stdout(1).await.unwrap(), "prefixed");
        let nodes = client
            .workflow_nodes(&WorkflowId::Numeric(2))
            .await
            .unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[tokio::test]
    async fn malformed_nodes_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/workflow_jobs/5/workflow_nodes/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .workflow_nodes(&WorkflowId::Numeric(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::ParseError(_)));
    }

    #[test]
    fn rejects_invalid_host() {
        let config = TriageConfig {
            controller_host: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            ControllerClient::new(&config),
            Err(ControllerError::InvalidUrl(_))
        ));
    }
}
