//! Task metadata endpoint client.
//!
//! # Responsibilities
//! - Build the task URL once from `ECS_CONTAINER_METADATA_URI`
//! - Fetch and decode the current task document
//! - Surface transport, status and decode failures as typed errors
//!
//! Retry cadence belongs to the caller; one call is one GET.

use async_trait::async_trait;
use reqwest::Client;

use crate::metadata::types::{MetadataError, MetadataResult, Task};

/// Source of the current task state.
#[async_trait]
pub trait TaskStatusProvider: Send + Sync {
    async fn fetch_task(&self) -> MetadataResult<Task>;
}

/// HTTP client for the task metadata endpoint (version 3).
///
/// cf. <https://docs.aws.amazon.com/AmazonECS/latest/developerguide/task-metadata-endpoint-v3.html>
#[derive(Clone)]
pub struct MetadataClient {
    client: Client,
    task_url: String,
}

impl MetadataClient {
    /// Create a client for `<base_uri>/task`.
    ///
    /// A missing base URI still yields a client; its URL is `/task`, which
    /// cannot be requested, so every fetch fails.
    pub fn new(base_uri: Option<&str>) -> Self {
        let task_url = format!("{}/task", base_uri.unwrap_or_default());

        if let Err(e) = url::Url::parse(&task_url) {
            tracing::warn!(
                url = %task_url,
                error = %e,
                "Task metadata URL is invalid, linked container status will be unavailable"
            );
        }

        Self {
            client: Client::new(),
            task_url,
        }
    }

    pub fn task_url(&self) -> &str {
        &self.task_url
    }
}

#[async_trait]
impl TaskStatusProvider for MetadataClient {
    async fn fetch_task(&self) -> MetadataResult<Task> {
        let resp = self
            .client
            .get(&self.task_url)
            .send()
            .await
            .map_err(MetadataError::Request)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status));
        }

        resp.json::<Task>().await.map_err(MetadataError::Decode)
    }
}

impl std::fmt::Debug for MetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataClient")
            .field("task_url", &self.task_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_task_url() {
        let client = MetadataClient::new(Some("http://169.254.170.2/v3/abc"));
        assert_eq!(client.task_url(), "http://169.254.170.2/v3/abc/task");
    }

    #[tokio::test]
    async fn test_missing_base_uri_always_fails() {
        let client = MetadataClient::new(None);
        assert_eq!(client.task_url(), "/task");

        let result = client.fetch_task().await;
        assert!(matches!(result, Err(MetadataError::Request(_))));
    }

    #[tokio::test]
    async fn test_fetch_task() {
        let base = serve_once(
            "200 OK",
            r#"{"Containers":[{"Name":"fluentd","DesiredStatus":"STOPPED","KnownStatus":"STOPPED"}]}"#,
        )
        .await;
        let client = MetadataClient::new(Some(&base));

        let task = client.fetch_task().await.unwrap();
        assert_eq!(task.containers.len(), 1);
        assert!(task.containers[0].is_stopped());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let base = serve_once("500 Internal Server Error", "").await;
        let client = MetadataClient::new(Some(&base));

        let result = client.fetch_task().await;
        assert!(matches!(result, Err(MetadataError::Status(s)) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_decode_error() {
        let base = serve_once("200 OK", "not json").await;
        let client = MetadataClient::new(Some(&base));

        let result = client.fetch_task().await;
        assert!(matches!(result, Err(MetadataError::Decode(_))));
    }
}
