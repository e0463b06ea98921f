use tutorbot_config::{API_URL_ENV, Config};
use tutorbot_conversation::HISTORY_WINDOW;

/// Strategy for displaying the effective configuration.
///
/// Shows where the config file lives, the backend location (and whether the
/// environment overrides it) and the widget settings.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::config_path()?;
        let config = Config::load()?;

        println!("=== tutorbot Configuration ===\n");

        println!("Config file:");
        println!("  Path: {}", path.display());
        println!(
            "  Status: {}",
            if path.exists() { "present" } else { "absent (defaults)" }
        );
        println!();

        println!("Backend:");
        println!("  Base URL: {}", config.backend.base_url);
        if std::env::var_os(API_URL_ENV).is_some() {
            println!("  (overridden by {API_URL_ENV})");
        }
        println!();

        println!("Widget:");
        println!("  Welcome: {}", truncate(&config.widget.welcome_message, 60));
        println!("  Start open: {}", config.widget.start_open);
        println!("  History window: {HISTORY_WINDOW} messages");

        Ok(())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
