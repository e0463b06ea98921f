//! Terminal presentation of the widget.
//!
//! Writes the conversation log and widget chrome as plain text lines. Only
//! reads controller state; never mutates it.

use std::io::{self, Write};

use tokio::sync::watch;
use tutorbot_conversation::{ConversationStore, SessionState};
use tutorbot_core::{Message, Role};

/// Answers show at most this many citations.
pub const MAX_DISPLAYED_SOURCES: usize = 2;

pub const INPUT_PLACEHOLDER: &str = "Ask about Physical AI...";
pub const FOOTER_TIP: &str = "💡 Tip: Select text on the page and ask questions about it!";

const TYPING_INDICATOR: &str = "🤖 ...";

pub fn write_message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    let avatar = match message.role {
        Role::User => "👤",
        Role::Assistant => "🤖",
    };
    let marker = if message.is_error { "❌ " } else { "" };
    writeln!(out, "{avatar} {marker}{}", message.content)?;

    let sources = message.sources();
    if !sources.is_empty() {
        let chapters: Vec<&str> = sources
            .iter()
            .take(MAX_DISPLAYED_SOURCES)
            .map(|s| s.chapter.as_str())
            .collect();
        writeln!(out, "   📚 Sources: {}", chapters.join(" · "))?;
    }
    Ok(())
}

pub fn write_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "🤖 AI Tutor · Physical AI Expert")?;
    writeln!(out, "{FOOTER_TIP}")?;
    writeln!(
        out,
        "Commands: /select <text>, /unselect, /toggle, /history, /quit\n"
    )
}

pub fn write_typing(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{TYPING_INDICATOR}")
}

/// Prompt line reflecting the input control: hidden when closed, disabled
/// while busy.
pub fn write_prompt(out: &mut impl Write, state: &SessionState) -> io::Result<()> {
    if !state.is_open() {
        write!(out, "[💬 closed, /toggle to open] ")?;
    } else if state.is_busy() {
        write!(out, "[waiting for answer] ")?;
    } else {
        write!(out, "> ")?;
    }
    out.flush()
}

/// Incremental renderer driven by the store's change notifications.
///
/// Messages appended while the widget is closed are shown once it opens.
pub struct Transcript {
    rendered: usize,
    revisions: watch::Receiver<usize>,
}

impl Transcript {
    #[must_use]
    pub const fn new(revisions: watch::Receiver<usize>) -> Self {
        Self {
            rendered: 0,
            revisions,
        }
    }

    /// Print every message not yet shown, if the widget is open.
    pub fn flush(
        &mut self,
        out: &mut impl Write,
        store: &ConversationStore,
        open: bool,
    ) -> io::Result<()> {
        if !open {
            return Ok(());
        }
        let total = *self.revisions.borrow_and_update();
        for message in &store.messages()[self.rendered.min(total)..total] {
            write_message(out, message)?;
        }
        self.rendered = total;
        Ok(())
    }

    /// Print the whole log again.
    pub fn replay(&mut self, out: &mut impl Write, store: &ConversationStore) -> io::Result<()> {
        for message in store.messages() {
            write_message(out, message)?;
        }
        self.rendered = store.len();
        self.revisions.mark_unchanged();
        Ok(())
    }
}
