//! Request/response contract of the backend query endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{Message, Role, Source};

/// Path of the query endpoint, relative to the backend base URL.
pub const QUERY_PATH: &str = "/api/query";

/// A history item as transmitted upstream: role and text only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// JSON body POSTed to the query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
    pub selected_text: Option<String>,
    pub conversation_history: Vec<HistoryEntry>,
}

impl QueryRequest {
    /// Build a request from the question, the captured selection and the
    /// tail window of the log taken before the question was appended.
    #[must_use]
    pub fn new(question: impl Into<String>, selection: Option<String>, history: &[Message]) -> Self {
        Self {
            question: question.into(),
            selected_text: selection,
            conversation_history: history.iter().map(Message::to_history_entry).collect(),
        }
    }
}

/// A well-formed success response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryAnswer {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<Source>,
    /// Excerpt of the retrieved context, when the backend reports it.
    #[serde(default)]
    pub context_used: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Source>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Concrete cause of a failed query. Only ever seen in logs.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend returned status {status}")]
    Backend { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The single failure outcome of a query.
///
/// The cause is reachable through `Error::source` for diagnostics; callers
/// are expected to treat every failure the same way.
#[derive(Debug, Error)]
#[error("query failed")]
pub struct QueryFailed {
    #[source]
    cause: QueryError,
}

impl From<QueryError> for QueryFailed {
    fn from(cause: QueryError) -> Self {
        Self { cause }
    }
}

/// Anything that can answer a question: the HTTP client in production, a
/// scripted fake in tests.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryFailed>;
}

#[async_trait]
impl<T> QueryBackend for Arc<T>
where
    T: QueryBackend + ?Sized,
{
    async fn ask(&self, request: &QueryRequest) -> Result<QueryAnswer, QueryFailed> {
        (**self).ask(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error as _;

    #[test]
    fn request_wire_shape() {
        let history = vec![Message::assistant("Welcome"), Message::user("Earlier question")];
        let request = QueryRequest::new("Explain this", Some("torque control".into()), &history);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "question": "Explain this",
                "selected_text": "torque control",
                "conversation_history": [
                    {"role": "assistant", "content": "Welcome"},
                    {"role": "user", "content": "Earlier question"}
                ]
            })
        );
    }

    #[test]
    fn absent_selection_is_sent_as_null() {
        let request = QueryRequest::new("q", None, &[]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["selected_text"], serde_json::Value::Null);
        assert_eq!(value["conversation_history"], json!([]));
    }

    #[test]
    fn answer_tolerates_missing_or_null_sources() {
        let missing: QueryAnswer = serde_json::from_value(json!({"answer": "a"})).unwrap();
        assert!(missing.sources.is_empty());

        let null: QueryAnswer =
            serde_json::from_value(json!({"answer": "a", "sources": null})).unwrap();
        assert!(null.sources.is_empty());
        assert!(null.context_used.is_none());
    }

    #[test]
    fn answer_requires_answer_field() {
        let result: Result<QueryAnswer, _> =
            serde_json::from_value(json!({"sources": [{"chapter": "Chapter 1"}]}));
        assert!(result.is_err());
    }

    #[test]
    fn query_failed_exposes_cause_as_source() {
        let failed = QueryFailed::from(QueryError::Backend { status: 500 });

        assert_eq!(failed.to_string(), "query failed");
        let cause = failed
            .source()
            .and_then(|e| e.downcast_ref::<QueryError>())
            .unwrap();
        assert!(matches!(cause, QueryError::Backend { status: 500 }));
    }
}
