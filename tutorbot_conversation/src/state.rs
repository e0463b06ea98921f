//! Transient widget state: visibility, unsent input and the busy gate.

/// Request lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A query is outstanding; `ticket` identifies it.
    AwaitingReply { ticket: u64 },
}

/// Everything the presentation layer needs besides the log itself.
///
/// Never persisted. Only `SessionController` mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) is_open: bool,
    pub(crate) pending_input: String,
    pub(crate) phase: Phase,
}

impl SessionState {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::AwaitingReply { .. })
    }

    /// Whether the send control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.pending_input.trim().is_empty()
    }
}
