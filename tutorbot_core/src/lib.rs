#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Shared types for the textbook assistant widget.
//!
//! Everything that crosses a crate boundary lives here: the conversation
//! message model, the backend query contract and the two seams the session
//! controller is generic over (`QueryBackend`, `SelectionSource`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod query;
pub mod selection;

pub use query::{
    HistoryEntry, QueryAnswer, QueryBackend, QueryError, QueryFailed, QueryRequest, QUERY_PATH,
};
pub use selection::{NoSelection, SelectionSource, SharedSelection, normalize_selection};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A citation attached to an answer by the backend.
///
/// Only `chapter` is interpreted; every other field the backend sends
/// (`section`, `score`, ...) is carried along untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub chapter: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Source {
    #[must_use]
    pub fn new(chapter: impl Into<String>) -> Self {
        Self {
            chapter: chapter.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// One entry of the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Present only on successful assistant replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default)]
    pub is_error: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            sources: None,
            is_error: false,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }

    /// A successful reply carrying the backend's citations.
    #[must_use]
    pub fn answer(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            sources: Some(sources),
            ..Self::new(Role::Assistant, content.into())
        }
    }

    /// A failure notice shown in place of a reply.
    #[must_use]
    pub fn error_notice(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Assistant, content.into())
        }
    }

    /// Reduce to the `{role, content}` pair sent upstream as history.
    #[must_use]
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }

    #[must_use]
    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
        assert_eq!(
            serde_json::to_value(Role::Assistant).unwrap(),
            json!("assistant")
        );
    }

    #[test]
    fn source_keeps_unknown_fields() {
        let raw = json!({"chapter": "Chapter 3", "section": "3.2 Torque", "score": 0.91});
        let source: Source = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(source.chapter, "Chapter 3");
        assert_eq!(source.extra.get("section"), Some(&json!("3.2 Torque")));
        assert_eq!(serde_json::to_value(&source).unwrap(), raw);
    }

    #[test]
    fn source_requires_chapter() {
        let result: Result<Source, _> = serde_json::from_value(json!({"section": "1.1"}));
        assert!(result.is_err());
    }

    #[test]
    fn constructors_set_flags() {
        let user = Message::user("hi");
        assert_eq!(user.role, Role::User);
        assert!(user.sources.is_none());
        assert!(!user.is_error);

        let answer = Message::answer("A humanoid robot is...", vec![Source::new("Chapter 1")]);
        assert_eq!(answer.role, Role::Assistant);
        assert_eq!(answer.sources().len(), 1);
        assert!(!answer.is_error);

        let notice = Message::error_notice("oops");
        assert!(notice.is_error);
        assert!(notice.sources().is_empty());
    }

    #[test]
    fn history_entry_drops_sources_and_flags() {
        let answer = Message::answer("text", vec![Source::new("Chapter 2")]);
        let entry = answer.to_history_entry();

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"role": "assistant", "content": "text"})
        );
    }
}
