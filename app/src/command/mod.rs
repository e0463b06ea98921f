//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use tracing::info;
use tutorbot_config::Config;
use tutorbot_providers::HttpQueryClient;

mod ask;
mod chat;
mod health;
mod info;
mod init;
mod version;

pub use ask::{AskInput, AskStrategy};
pub use chat::ChatStrategy;
pub use health::HealthStrategy;
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Configuration and backend client shared by the networked commands.
struct CommonComponents {
    config: Config,
    client: HttpQueryClient,
}

fn init_common_components() -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;
    info!("Using query backend at {}", config.backend.base_url);
    let client = HttpQueryClient::new(config.backend.base_url.clone());
    Ok(CommonComponents { config, client })
}

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
