//! Gitpod API client implementation
//!
//! Implements the EnvironmentApi trait against the gitpod.v1 Connect endpoints.
//! Every call is a JSON POST authenticated with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::types::{
    DeleteEnvironmentRequest, GetRunnerRequest, GetRunnerResponse, ListEnvironmentsRequest, ListEnvironmentsResponse,
    RunnerKind,
};
use crate::api::{ApiError, EnvironmentApi};

/// Gitpod API base URL
pub const DEFAULT_API_URL: &str = "https://app.gitpod.io/api";

const LIST_ENVIRONMENTS: &str = "gitpod.v1.EnvironmentService/ListEnvironments";
const DELETE_ENVIRONMENT: &str = "gitpod.v1.EnvironmentService/DeleteEnvironment";
const GET_RUNNER: &str = "gitpod.v1.RunnerService/GetRunner";

/// Configuration for the Gitpod client
#[derive(Debug, Clone)]
pub struct GitpodConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GitpodConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Gitpod API client
pub struct GitpodClient {
    client: Client,
    token: String,
    config: GitpodConfig,
}

impl GitpodClient {
    /// Create a client authenticated with the given access token
    pub fn new(token: impl Into<String>, config: GitpodConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            config,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), method)
    }

    /// POST a JSON body and decode the JSON reply
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .bearer_auth(&self.token)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let text = response.text().await?;
        log::debug!("{} response: {}", method, text);

        // Connect returns an empty object for empty messages, but tolerate an empty body too
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::InvalidResponse(format!("{}: {}", method, e)))
    }
}

#[async_trait]
impl EnvironmentApi for GitpodClient {
    async fn list_environments(&self, request: &ListEnvironmentsRequest) -> Result<ListEnvironmentsResponse, ApiError> {
        self.call(LIST_ENVIRONMENTS, request).await
    }

    async fn delete_environment(&self, environment_id: &str, organization_id: &str) -> Result<(), ApiError> {
        let request = DeleteEnvironmentRequest {
            environment_id: environment_id.to_string(),
            organization_id: organization_id.to_string(),
        };
        let _: serde_json::Value = self.call(DELETE_ENVIRONMENT, &request).await?;
        Ok(())
    }

    async fn get_runner_kind(&self, runner_id: &str) -> Result<RunnerKind, ApiError> {
        let request = GetRunnerRequest {
            runner_id: runner_id.to_string(),
        };
        let response: GetRunnerResponse = self.call(GET_RUNNER, &request).await?;
        Ok(response.runner.kind)
    }
}

// Keep the token out of debug output
impl std::fmt::Debug for GitpodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitpodClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EnvironmentPhase, PaginationRequest};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Answer a single request with `status` and `body`; the task yields the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (GitpodClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        let config = GitpodConfig {
            base_url: format!("http://{}", addr),
            timeout: Duration::from_secs(5),
        };
        (GitpodClient::new("tok-123", config).unwrap(), server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn list_request(token: Option<&str>) -> ListEnvironmentsRequest {
        ListEnvironmentsRequest {
            organization_id: "org-1".to_string(),
            pagination: PaginationRequest {
                page_size: 100,
                page_token: token.map(str::to_string),
            },
            filter: None,
        }
    }

    #[test]
    fn test_config_default() {
        let config = GitpodConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_endpoint_joins_method() {
        let client = GitpodClient::new("test-token", GitpodConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(LIST_ENVIRONMENTS),
            "https://app.gitpod.io/api/gitpod.v1.EnvironmentService/ListEnvironments"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = GitpodConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..Default::default()
        };
        let client = GitpodClient::new("test-token", config).unwrap();
        assert_eq!(
            client.endpoint(DELETE_ENVIRONMENT),
            "http://localhost:8080/api/gitpod.v1.EnvironmentService/DeleteEnvironment"
        );
    }

    #[test]
    fn test_debug_impl_hides_token() {
        let client = GitpodClient::new("secret-token", GitpodConfig::default()).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("GitpodClient"));
        assert!(debug_str.contains(DEFAULT_API_URL));
        assert!(!debug_str.contains("secret-token"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GitpodClient>();
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = GitpodConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
        };
        let client = GitpodClient::new("test-token", config).unwrap();
        let err = client.delete_environment("env-1", "org-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(!err.is_rate_limit());
    }

    #[tokio::test]
    async fn test_list_sends_auth_and_decodes_page() {
        let (client, server) = serve_once(
            "200 OK",
            r#"{"environments":[{"id":"env-1","status":{"phase":"ENVIRONMENT_PHASE_STOPPED"}}],"pagination":{"nextToken":"p2"}}"#,
        )
        .await;

        let response = client.list_environments(&list_request(Some("p1"))).await.unwrap();
        assert_eq!(response.environments.len(), 1);
        assert_eq!(response.environments[0].id, "env-1");
        assert_eq!(response.environments[0].phase(), EnvironmentPhase::Stopped);
        assert_eq!(response.pagination.next_token.as_deref(), Some("p2"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /gitpod.v1.EnvironmentService/ListEnvironments HTTP/1.1"));
        let lower = request.to_lowercase();
        assert!(lower.contains("authorization: bearer tok-123"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.contains(r#""organizationId":"org-1""#));
        assert!(request.contains(r#""pageToken":"p1""#));
    }

    #[tokio::test]
    async fn test_429_maps_to_rate_limited() {
        let (client, server) = serve_once("429 Too Many Requests", r#"{"code":"resource_exhausted"}"#).await;

        let err = client.delete_environment("env-1", "org-1").await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));
        assert!(err.is_rate_limit());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /gitpod.v1.EnvironmentService/DeleteEnvironment HTTP/1.1"));
        assert!(request.contains(r#""environmentId":"env-1""#));
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let (client, server) = serve_once("403 Forbidden", r#"{"code":"permission_denied"}"#).await;

        let err = client.list_environments(&list_request(None)).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("permission_denied"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_success_body_accepted() {
        let (client, server) = serve_once("200 OK", "").await;

        client.delete_environment("env-1", "org-1").await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_runner_kind() {
        let (client, server) = serve_once("200 OK", r#"{"runner":{"kind":"RUNNER_KIND_REMOTE"}}"#).await;

        assert_eq!(client.get_runner_kind("runner-1").await.unwrap(), RunnerKind::Remote);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /gitpod.v1.RunnerService/GetRunner HTTP/1.1"));
        assert!(request.contains(r#""runnerId":"runner-1""#));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let (client, server) = serve_once("200 OK", "not json").await;

        let err = client.list_environments(&list_request(None)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        server.await.unwrap();
    }
}
