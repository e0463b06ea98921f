use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tutorbot_core::{QUERY_PATH, QueryAnswer, QueryBackend, QueryError, QueryFailed, QueryRequest};

/// Backend location used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const HEALTH_PATH: &str = "/health";

/// Status document served by the backend's `/health` route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qdrant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Client for the backend query endpoint.
///
/// Every call is a single POST: no retry, no timeout beyond what the
/// underlying `reqwest::Client` enforces, and nothing is cancelled when a
/// newer call starts.
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    client: Client,
    base_url: String,
}

impl HttpQueryClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Creating HttpQueryClient for {base_url}");
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Use a preconfigured `reqwest::Client` (proxies, transport timeouts).
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn try_send(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryError> {
        let response = self
            .client
            .post(self.endpoint(QUERY_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Backend {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| QueryError::Malformed(e.to_string()))
    }

    /// Probe the backend's health route.
    pub async fn health(&self) -> anyhow::Result<HealthStatus> {
        let status = self
            .client
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?
            .json::<HealthStatus>()
            .await?;

        Ok(status)
    }
}

#[async_trait]
impl QueryBackend for HttpQueryClient {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryFailed> {
        info!(
            "Sending query: history={}, selection={}",
            request.conversation_history.len(),
            request.selected_text.is_some()
        );

        match self.try_send(request).await {
            Ok(answer) => {
                debug!("Received answer with {} sources", answer.sources.len());
                Ok(answer)
            }
            Err(cause) => {
                warn!("Query to {} failed: {cause}", self.base_url);
                Err(cause.into())
            }
        }
    }
}
