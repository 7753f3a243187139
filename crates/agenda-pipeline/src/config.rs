//! Pipeline configuration.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use agenda_core::{DEFAULT_TIMEZONE, parse_timezone};
use agenda_providers::{api_url, default_user_agent};
use chrono_tz::Tz;

use crate::error::{PipelineError, PipelineResult};

/// Default site-relative cache directory.
pub const DEFAULT_CACHE_DIR: &str = "assets/mobilizon";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Instance root, e.g. `https://mobilizon.fr`.
    pub base_url: String,

    /// Group handles to crawl.
    pub groups: Vec<String>,

    /// Site root on disk.
    pub source_dir: PathBuf,

    /// Cache directory relative to `source_dir`. Also the public URL prefix
    /// of published thumbnails and feeds.
    pub cache_dir: String,

    /// IANA name of the display timezone.
    pub timezone: String,

    /// When false, rendering produces nothing and touches neither network
    /// nor disk.
    pub enabled: bool,

    /// Deadline for each network call.
    pub timeout: Duration,

    /// User agent for all requests.
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mobilizon.fr".to_string(),
            groups: Vec::new(),
            source_dir: PathBuf::from("."),
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            enabled: false,
            timeout: Duration::from_secs(30),
            user_agent: default_user_agent(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration for the instance at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Builder: set the groups to crawl.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the site root.
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Builder: set the site-relative cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<String>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Builder: set the display timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Builder: enable or disable fetching.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder: set the network timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The GraphQL endpoint, `<base_url>/api`.
    pub fn api_url(&self) -> String {
        api_url(&self.base_url)
    }

    /// Absolute location of the cache on disk.
    ///
    /// `cache_dir` must name a directory strictly below `source_dir`, since
    /// the cache root is deleted as a whole by [`AssetCache::clear`].
    ///
    /// [`AssetCache::clear`]: crate::AssetCache::clear
    pub fn cache_root(&self) -> PipelineResult<PathBuf> {
        let relative = Path::new(self.cache_dir.trim_start_matches('/'));
        let mut components = relative.components();
        let below_root = components.clone().any(|c| matches!(c, Component::Normal(_)))
            && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !below_root {
            return Err(PipelineError::config(format!(
                "cache_dir `{}` must name a directory below source_dir",
                self.cache_dir
            )));
        }
        Ok(self.source_dir.join(relative))
    }

    /// Checks the settings that can be verified without network access.
    pub fn validate(&self) -> PipelineResult<()> {
        self.cache_root()?;
        self.display_timezone()?;
        Ok(())
    }

    /// Resolves the display timezone.
    pub fn display_timezone(&self) -> PipelineResult<Tz> {
        Ok(parse_timezone(&self.timezone)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn default_config() {
        let config = PipelineConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.timezone, "Europe/Paris");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.cache_dir, "assets/mobilizon");
        assert!(config.groups.is_empty());
    }

    #[test]
    fn custom_config() {
        let config = PipelineConfig::new("https://mobilizon.example/")
            .with_groups(["bricoleurs", "velo"])
            .with_source_dir("/srv/site")
            .with_cache_dir("/cache/mobilizon")
            .with_timezone("America/Montreal")
            .with_enabled(true)
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");

        assert_eq!(config.groups, ["bricoleurs", "velo"]);
        assert_eq!(config.api_url(), "https://mobilizon.example/api");
        assert_eq!(config.cache_root().unwrap(), PathBuf::from("/srv/site/cache/mobilizon"));
        assert!(config.validate().is_ok());
        assert!(config.enabled);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.display_timezone().unwrap(), chrono_tz::America::Montreal);
    }

    #[test]
    fn unknown_timezone() {
        let config = PipelineConfig::default().with_timezone("Nowhere/Land");
        assert!(matches!(
            config.display_timezone(),
            Err(PipelineError::Timezone { .. })
        ));
    }

    #[test]
    fn cache_dir_must_stay_below_source_dir() {
        for dir in ["", "/", "//", ".", "./", "..", "../elsewhere", "assets/../.."] {
            let config = PipelineConfig::default()
                .with_source_dir("/srv/site")
                .with_cache_dir(dir);
            assert!(
                matches!(config.cache_root(), Err(PipelineError::Config { .. })),
                "cache_dir {:?} should be rejected",
                dir
            );
            assert!(config.validate().is_err());
        }

        let config = PipelineConfig::default()
            .with_source_dir("/srv/site")
            .with_cache_dir("./assets/mobilizon/");
        assert_eq!(
            config.cache_root().unwrap(),
            PathBuf::from("/srv/site/assets/mobilizon")
        );
    }
}
