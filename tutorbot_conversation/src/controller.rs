//! Session controller for the assistant widget.
//!
//! The `SessionController` is the only writer of the conversation log and
//! the widget state. A round trip is split in three steps so the caller can
//! keep handling UI events while the backend works:
//!
//! 1. [`SessionController::begin_submit`] validates the input, records the
//!    question and returns an [`InFlightQuery`].
//! 2. [`InFlightQuery::resolve`] performs the network call without borrowing
//!    the controller.
//! 3. [`SessionController::settle`] appends the reply or the failure notice
//!    and clears the busy gate.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tutorbot_core::{
    Message, QueryAnswer, QueryBackend, QueryFailed, QueryRequest, SelectionSource,
};
use uuid::Uuid;

use crate::state::{Phase, SessionState};
use crate::store::{ConversationStore, HISTORY_WINDOW};

/// Greeting the log is seeded with.
pub const WELCOME_MESSAGE: &str = "Hi! I'm your Physical AI textbook assistant. Ask me anything about humanoid robotics, perception systems, control theory, or AI learning!";

/// Text shown in place of a reply whenever a query fails, whatever the cause.
pub const ERROR_NOTICE: &str =
    "Sorry, I encountered an error. Please make sure the backend server is running and try again.";

/// Per-mount settings of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Text of the seeded assistant message
    pub welcome_message: String,
    /// Initial visibility of the widget
    pub start_open: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            welcome_message: WELCOME_MESSAGE.to_string(),
            start_open: false,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_welcome_message(mut self, message: String) -> Self {
        self.welcome_message = message;
        self
    }

    #[must_use]
    pub const fn with_start_open(mut self, open: bool) -> Self {
        self.start_open = open;
        self
    }
}

/// A dispatched question waiting for the backend.
#[derive(Debug)]
pub struct InFlightQuery<B> {
    ticket: u64,
    request: QueryRequest,
    backend: B,
}

impl<B: QueryBackend> InFlightQuery<B> {
    #[must_use]
    pub const fn ticket(&self) -> u64 {
        self.ticket
    }

    /// The payload that will be sent.
    #[must_use]
    pub const fn request(&self) -> &QueryRequest {
        &self.request
    }

    /// Wait for the backend. This is the only suspension point of a round.
    pub async fn resolve(self) -> Settlement {
        let outcome = self.backend.ask(&self.request).await;
        Settlement {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Outcome of an [`InFlightQuery`], to be handed back to the controller.
#[derive(Debug)]
pub struct Settlement {
    ticket: u64,
    outcome: Result<QueryAnswer, QueryFailed>,
}

impl Settlement {
    #[must_use]
    pub const fn ticket(&self) -> u64 {
        self.ticket
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Orchestrates selection capture, the log and the backend for one widget.
pub struct SessionController<B = Arc<dyn QueryBackend>, X = Arc<dyn SelectionSource>>
where
    B: Send + Sync,
    X: Send + Sync,
{
    id: Uuid,
    backend: B,
    selection: X,
    store: ConversationStore,
    state: SessionState,
    next_ticket: u64,
}

impl<B, X> SessionController<B, X>
where
    B: QueryBackend + Clone,
    X: SelectionSource,
{
    pub fn new(backend: B, selection: X, config: SessionConfig) -> Self {
        let id = Uuid::now_v7();
        info!("Mounting assistant session {id}");

        Self {
            id,
            backend,
            selection,
            store: ConversationStore::new(config.welcome_message),
            state: SessionState {
                is_open: config.start_open,
                ..SessionState::default()
            },
            next_ticket: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Watch the log length; see [`ConversationStore::subscribe`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.store.subscribe()
    }

    /// Flip visibility. Has no effect on an outstanding query.
    pub fn toggle_open(&mut self) -> bool {
        self.state.is_open = !self.state.is_open;
        debug!("Session {} visibility: open={}", self.id, self.state.is_open);
        self.state.is_open
    }

    pub fn open(&mut self) {
        self.state.is_open = true;
    }

    pub fn close(&mut self) {
        self.state.is_open = false;
    }

    /// Replace the unsent input. Rejected while a query is outstanding,
    /// since the input control is disabled then.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.state.is_busy() {
            return false;
        }
        self.state.pending_input = text.into();
        true
    }

    /// Start a round with the pending input.
    ///
    /// Returns `None` without touching anything when the input is blank or
    /// a query is already outstanding.
    pub fn begin_submit(&mut self) -> Option<InFlightQuery<B>> {
        if self.state.is_busy() {
            debug!("Submit ignored: session {} is awaiting a reply", self.id);
            return None;
        }

        let question = self.state.pending_input.trim();
        if question.is_empty() {
            return None;
        }
        let question = question.to_string();

        let selection = self.selection.capture();
        // History is the window before the question itself is logged.
        let request = QueryRequest::new(
            question.clone(),
            selection,
            self.store.tail_window(HISTORY_WINDOW),
        );

        self.store.append(Message::user(question));
        self.state.pending_input.clear();

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.state.phase = Phase::AwaitingReply { ticket };

        info!(
            "Session {} dispatching query #{ticket} (selection={})",
            self.id,
            request.selected_text.is_some()
        );

        Some(InFlightQuery {
            ticket,
            request,
            backend: self.backend.clone(),
        })
    }

    /// Finish a round: log the reply or the failure notice and reopen the
    /// busy gate.
    ///
    /// Returns `false` if the settlement does not belong to the outstanding
    /// query; it is then dropped.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        let Settlement { ticket, outcome } = settlement;

        if self.state.phase != (Phase::AwaitingReply { ticket }) {
            warn!(
                "Session {} dropping stale settlement #{ticket} (phase={:?})",
                self.id, self.state.phase
            );
            return false;
        }

        match outcome {
            Ok(answer) => {
                info!(
                    "Query #{ticket} answered with {} sources",
                    answer.sources.len()
                );
                if let Some(context) = &answer.context_used {
                    debug!("Query #{ticket} context: {context}");
                }
                self.store
                    .append(Message::answer(answer.answer, answer.sources));
            }
            Err(failed) => {
                let cause = std::error::Error::source(&failed)
                    .map_or_else(|| failed.to_string(), ToString::to_string);
                error!("Error querying assistant backend: {cause}");
                self.store.append(Message::error_notice(ERROR_NOTICE));
            }
        }

        self.state.phase = Phase::Idle;
        true
    }

    /// Run a whole round with the pending input.
    ///
    /// Returns `false` when the submit was a no-op.
    pub async fn submit(&mut self) -> bool {
        let Some(query) = self.begin_submit() else {
            return false;
        };
        let settlement = query.resolve().await;
        self.settle(settlement)
    }

    /// Type `question` into the input and submit it.
    pub async fn ask(&mut self, question: impl Into<String>) -> bool {
        self.set_input(question) && self.submit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tutorbot_core::{NoSelection, QueryError};

    #[derive(Clone)]
    struct Unreachable;

    #[async_trait]
    impl QueryBackend for Unreachable {
        async fn ask(&self, _request: &QueryRequest) -> Result<QueryAnswer, QueryFailed> {
            Err(QueryError::Transport("connection refused".to_string()).into())
        }
    }

    fn controller() -> SessionController<Unreachable, NoSelection> {
        SessionController::new(Unreachable, NoSelection, SessionConfig::default())
    }

    #[test]
    fn config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.welcome_message, WELCOME_MESSAGE);
        assert!(!config.start_open);

        let config = config
            .with_welcome_message("Hello".to_string())
            .with_start_open(true);
        assert_eq!(config.welcome_message, "Hello");
        assert!(config.start_open);
    }

    #[test]
    fn mount_seeds_welcome_and_state() {
        let session = controller();
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().messages()[0].content, WELCOME_MESSAGE);
        assert!(!session.state().is_open());
        assert!(!session.state().is_busy());
    }

    #[test]
    fn begin_submit_records_question_before_reply() {
        let mut session = controller();
        session.set_input("  What is a humanoid robot?  ");

        let query = session.begin_submit().unwrap();
        assert_eq!(query.request().question, "What is a humanoid robot?");
        assert_eq!(query.request().conversation_history.len(), 1);
        assert_eq!(session.store().len(), 2);
        assert_eq!(session.state().pending_input(), "");
        assert_eq!(
            session.state().phase(),
            Phase::AwaitingReply {
                ticket: query.ticket()
            }
        );
    }

    #[test]
    fn input_is_locked_while_busy() {
        let mut session = controller();
        session.set_input("first");
        let _query = session.begin_submit().unwrap();

        assert!(!session.set_input("second"));
        assert_eq!(session.state().pending_input(), "");
        assert!(session.begin_submit().is_none());
    }

    #[tokio::test]
    async fn stale_settlement_is_dropped() {
        let mut session = controller();
        session.set_input("first");
        let query = session.begin_submit().unwrap();
        let settlement = query.resolve().await;
        assert!(session.settle(settlement));

        let replay = Settlement {
            ticket: 1,
            outcome: Err(QueryError::Backend { status: 500 }.into()),
        };
        assert!(!session.settle(replay));
        assert_eq!(session.store().len(), 3);
    }

    #[tokio::test]
    async fn failure_appends_notice() {
        let mut session = controller();
        assert!(session.ask("Explain this").await);

        let last = session.store().last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.content, ERROR_NOTICE);
        assert!(last.sources.is_none());
        assert!(!session.state().is_busy());
    }
}
