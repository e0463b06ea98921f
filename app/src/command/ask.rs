use tracing::info;
use tutorbot_conversation::SessionController;
use tutorbot_core::SharedSelection;

use crate::render;

/// Input parameters for the Ask command strategy.
#[derive(Debug, Clone)]
pub struct AskInput {
    /// Question to send
    pub question: String,
    /// Text treated as the current page selection
    pub selected_text: Option<String>,
}

/// Strategy for a single question/answer round.
///
/// Mounts a fresh session, asks once, prints the reply and exits with an
/// error status if the reply is the failure notice.
#[derive(Debug, Clone, Copy)]
pub struct AskStrategy;

impl super::CommandStrategy for AskStrategy {
    type Input = AskInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = super::init_common_components()?;

        let page = SharedSelection::new();
        if let Some(text) = input.selected_text {
            page.select(text);
        }

        let mut session =
            SessionController::new(common.client, page, common.config.session_config());

        if !session.ask(input.question).await {
            anyhow::bail!("Question is empty");
        }

        let reply = session
            .store()
            .last()
            .ok_or_else(|| anyhow::anyhow!("Conversation log is empty"))?;
        render::write_message(&mut std::io::stdout().lock(), reply)?;

        if reply.is_error {
            anyhow::bail!("Query failed");
        }

        info!("Session {} answered", session.id());
        Ok(())
    }
}
