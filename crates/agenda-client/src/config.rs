//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/mobilizon-agenda/config.toml` by default:
//!
//! ```toml
//! [agenda]
//! base_url = "https://mobilizon.fr"
//! groups = ["bricoleurs", "velo_rennes"]
//! source_dir = "/srv/site"
//! cache_dir = "assets/mobilizon"
//! timezone = "Europe/Paris"
//! enabled = true
//!
//! [render]
//! allow_list = "bricoleurs,repair"
//! page_url = "/agenda/"
//! format = "text"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use agenda_core::parse_timezone;
use agenda_pipeline::{DEFAULT_CACHE_DIR, PipelineConfig};
use agenda_providers::{MobilizonConfig, default_user_agent};
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, RenderArgs};

/// Configuration for the mobilizon-agenda client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Crawl and cache settings.
    pub agenda: AgendaSettings,

    /// Defaults for `render` and `assets`.
    pub render: RenderSettings,
}

/// Crawl and cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgendaSettings {
    /// Mobilizon instance root.
    pub base_url: String,

    /// Group handles to crawl.
    pub groups: Vec<String>,

    /// Site root on disk.
    pub source_dir: PathBuf,

    /// Cache directory, relative to `source_dir`.
    pub cache_dir: String,

    /// Display timezone.
    pub timezone: String,

    /// Fetch and render events.
    pub enabled: bool,

    /// Network timeout in seconds.
    pub timeout: u64,

    /// Custom user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for AgendaSettings {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            base_url: defaults.base_url,
            groups: defaults.groups,
            source_dir: defaults.source_dir,
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            timezone: defaults.timezone,
            enabled: defaults.enabled,
            timeout: defaults.timeout.as_secs(),
            user_agent: None,
        }
    }
}

impl AgendaSettings {
    /// Converts to pipeline configuration.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.base_url)
            .with_groups(self.groups.iter().cloned())
            .with_source_dir(&self.source_dir)
            .with_cache_dir(&self.cache_dir)
            .with_timezone(&self.timezone)
            .with_enabled(self.enabled)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_user_agent(
                self.user_agent
                    .clone()
                    .unwrap_or_else(default_user_agent),
            )
    }
}

/// Defaults for `render` and `assets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Comma-separated organizer handles, tag slugs or tag titles.
    pub allow_list: String,

    /// Page URL the agenda is rendered for.
    pub page_url: String,

    /// Output format.
    pub format: OutputFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            allow_list: String::new(),
            page_url: "/".to_string(),
            format: OutputFormat::Text,
        }
    }
}

/// Render options after merging command-line flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub allow_list: String,
    pub page_url: String,
    pub format: OutputFormat,
}

impl RenderSettings {
    /// Applies command-line overrides.
    pub fn merge(&self, args: &RenderArgs) -> RenderOptions {
        RenderOptions {
            allow_list: args
                .allow
                .clone()
                .unwrap_or_else(|| self.allow_list.clone()),
            page_url: args.page.clone().unwrap_or_else(|| self.page_url.clone()),
            format: args.format.unwrap_or(self.format),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mobilizon-agenda")
    }

    /// Checks the settings a render depends on.
    pub fn validate(&self) -> Result<(), String> {
        let agenda = &self.agenda;
        MobilizonConfig::new(&agenda.base_url)
            .map_err(|e| format!("invalid base_url `{}`: {}", agenda.base_url, e))?;
        parse_timezone(&agenda.timezone).map_err(|e| e.to_string())?;
        agenda
            .to_pipeline_config()
            .cache_root()
            .map_err(|e| e.to_string())?;

        if agenda.timeout == 0 {
            return Err("timeout must be greater than zero".to_string());
        }
        if agenda.enabled && agenda.groups.is_empty() {
            return Err("enabled is set but no groups are configured".to_string());
        }
        if let Some(group) = agenda.groups.iter().find(|g| g.trim().is_empty()) {
            return Err(format!("invalid group handle `{}`", group));
        }
        Ok(())
    }
}
