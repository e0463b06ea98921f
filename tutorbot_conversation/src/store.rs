//! The conversation log.
//!
//! An append-only, chronologically ordered list of messages. It is the only
//! thing a presentation layer needs to render the transcript.

use tokio::sync::watch;
use tracing::debug;
use tutorbot_core::{Message, Role};

/// Number of trailing log entries sent upstream as conversation context.
///
/// Six messages is roughly the last three exchanges.
pub const HISTORY_WINDOW: usize = 6;

/// Append-only message log with change notification.
#[derive(Debug)]
pub struct ConversationStore {
    messages: Vec<Message>,
    revision: watch::Sender<usize>,
}

impl ConversationStore {
    /// Create a log seeded with the assistant's welcome message.
    #[must_use]
    pub fn new(welcome: impl Into<String>) -> Self {
        let (revision, _) = watch::channel(0);
        let mut store = Self {
            messages: Vec::new(),
            revision,
        };
        store.append(Message::assistant(welcome));
        store
    }

    /// Add a message to the end of the log and notify observers.
    pub fn append(&mut self, message: Message) {
        debug!(
            "Appending {:?} message (error={}) at position {}",
            message.role,
            message.is_error,
            self.messages.len()
        );
        self.messages.push(message);
        self.revision.send_replace(self.messages.len());
    }

    /// The last `n` messages, oldest first. The whole log when shorter.
    #[must_use]
    pub fn tail_window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Watch the log length. The receiver observes every append.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.revision.subscribe()
    }

    #[must_use]
    pub fn stats(&self) -> LogStats {
        let count = |role: Role| self.messages.iter().filter(|m| m.role == role).count();

        LogStats {
            total_messages: self.messages.len(),
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            error_messages: self.messages.iter().filter(|m| m.is_error).count(),
        }
    }
}

/// Counts over the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub error_messages: usize,
}
