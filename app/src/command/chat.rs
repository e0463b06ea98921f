//! Interactive terminal widget.
//!
//! Reads commands and questions from stdin while a query may be in flight,
//! so the busy gate and visibility toggling behave as they do in the page
//! widget.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tutorbot_conversation::{SessionController, Settlement};
use tutorbot_core::SharedSelection;
use tutorbot_providers::HttpQueryClient;

use crate::render::{self, INPUT_PLACEHOLDER, Transcript};

type PendingReply = Pin<Box<dyn Future<Output = Settlement> + Send>>;

/// Strategy for the interactive chat widget.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

/// What a line of input asks the widget to do.
#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Quit,
    Toggle,
    Select(&'a str),
    Unselect,
    History,
    Ask(&'a str),
}

fn parse_line(line: &str) -> Action<'_> {
    let trimmed = line.trim();
    match trimmed {
        "/quit" | "exit" | "quit" | "q" => Action::Quit,
        "/toggle" => Action::Toggle,
        "/unselect" => Action::Unselect,
        "/history" => Action::History,
        _ => trimmed
            .strip_prefix("/select")
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            .map_or(Action::Ask(line), |rest| Action::Select(rest.trim())),
    }
}

async fn next_settlement(pending: &mut Option<PendingReply>) -> Settlement {
    match pending {
        Some(reply) => reply.as_mut().await,
        None => std::future::pending().await,
    }
}

impl super::CommandStrategy for ChatStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let common = super::init_common_components()?;

        let page = SharedSelection::new();
        let mut session: SessionController<HttpQueryClient, SharedSelection> =
            SessionController::new(common.client, page.clone(), common.config.session_config());
        let mut transcript = Transcript::new(session.subscribe());
        let mut pending: Option<PendingReply> = None;

        let mut out = std::io::stdout();
        render::write_header(&mut out)?;
        if session.state().is_open() {
            transcript.flush(&mut out, session.store(), true)?;
            writeln!(out, "({INPUT_PLACEHOLDER})")?;
        }
        render::write_prompt(&mut out, session.state())?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                settlement = next_settlement(&mut pending) => {
                    pending = None;
                    session.settle(settlement);
                    writeln!(out)?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };

                    match parse_line(&line) {
                        Action::Quit => break,
                        Action::Toggle => {
                            let open = session.toggle_open();
                            writeln!(out, "{}", if open { "[widget opened]" } else { "[widget closed]" })?;
                        }
                        Action::Select(text) => {
                            page.select(text);
                            writeln!(out, "[selected: {text}]")?;
                        }
                        Action::Unselect => {
                            page.clear();
                            writeln!(out, "[selection cleared]")?;
                        }
                        Action::History => {
                            transcript.replay(&mut out, session.store())?;
                        }
                        Action::Ask(text) => {
                            if !session.state().is_open() {
                                writeln!(out, "[the widget is closed, /toggle to open it]")?;
                            } else if !session.set_input(text) {
                                writeln!(out, "[still waiting for the previous answer]")?;
                            } else if let Some(query) = session.begin_submit() {
                                pending = Some(Box::pin(query.resolve()));
                            }
                        }
                    }
                }
            }

            transcript.flush(&mut out, session.store(), session.state().is_open())?;
            if session.state().is_busy() && session.state().is_open() {
                render::write_typing(&mut out)?;
            }
            render::write_prompt(&mut out, session.state())?;
        }

        if pending.is_some() {
            info!("Leaving with a query still outstanding");
        }
        let stats = session.store().stats();
        info!(
            "Conversation ended: {} messages ({} questions, {} failures)",
            stats.total_messages, stats.user_messages, stats.error_messages
        );
        println!();
        Ok(())
    }
}
