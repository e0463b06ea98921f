use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use tutorbot_conversation::{SessionConfig, WELCOME_MESSAGE};
use tutorbot_providers::DEFAULT_BASE_URL;

/// Environment variable that overrides `backend.base_url`.
pub const API_URL_ENV: &str = "TUTORBOT_API_URL";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    #[serde(default = "BackendConfig::default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
        }
    }
}

impl BackendConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    #[serde(default = "WidgetConfig::default_welcome_message")]
    pub welcome_message: String,
    #[serde(default)]
    pub start_open: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            welcome_message: Self::default_welcome_message(),
            start_open: false,
        }
    }
}

impl WidgetConfig {
    fn default_welcome_message() -> String {
        WELCOME_MESSAGE.to_string()
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("tutorbot"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/tutorbot/config.json` (defaults when absent), then apply the
    /// `TUTORBOT_API_URL` override.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.with_base_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Invalid config file {}: {e}", path.display())
        })?;
        info!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Replace the backend base URL when `value` is set and non-blank.
    #[must_use]
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            debug!("Backend base URL overridden by {API_URL_ENV}");
            self.backend.base_url = url.trim().to_string();
        }
        self
    }

    /// Session settings derived from the widget section.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_welcome_message(self.widget.welcome_message.clone())
            .with_start_open(self.widget.start_open)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point backend.base_url at the running query service");
        println!("   2. Run 'tutorbot health' to check the connection");
        println!("   3. Run 'tutorbot chat' to start asking questions");
        println!();
        println!("🔧 Configuration options:");
        println!("   - backend.base_url: query service location ({API_URL_ENV} overrides it)");
        println!("   - widget.welcome_message: first message shown in the conversation");
        println!("   - widget.start_open: open the widget on start");
        println!();
        Ok(())
    }

    /// Write the default config to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(path, template)?;
        Ok(())
    }
}
