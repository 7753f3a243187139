//! Fetch-or-load, filter, sort, normalize, render.
//!
//! Every stage completes before the next starts: the crawl, then thumbnails,
//! then the calendar feed, then rendering. The disk cache is not locked;
//! two renders racing on the same directory may both fetch, and the first
//! write of each entry wins.

use agenda_core::{
    AgendaEvent, AllowList, CacheKey, EventRecord, Renderer, filter_events, render_all,
    sort_events,
};
use agenda_providers::{Downloader, EventCrawler, EventSource};
use tracing::{debug, info};

use crate::assets::StaticAssets;
use crate::cache::{AssetCache, Namespace};
use crate::calendar::CalendarAssembler;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::normalize::Normalizer;
use crate::thumbnail::ThumbnailService;

/// The agenda pipeline for one site.
pub struct EventPipeline {
    config: PipelineConfig,
    source: Box<dyn EventSource>,
    downloader: Box<dyn Downloader>,
    cache: AssetCache,
    assets: StaticAssets,
}

impl EventPipeline {
    /// Creates a pipeline over the given collaborators.
    ///
    /// Fails when the configured cache directory is not below the site root.
    pub fn new(
        config: PipelineConfig,
        source: Box<dyn EventSource>,
        downloader: Box<dyn Downloader>,
    ) -> PipelineResult<Self> {
        let cache = AssetCache::new(config.cache_root()?);
        Ok(Self {
            config,
            source,
            downloader,
            cache,
            assets: StaticAssets::new(),
        })
    }

    /// Creates a pipeline talking to the configured Mobilizon instance.
    pub fn from_config(config: PipelineConfig) -> PipelineResult<Self> {
        use agenda_providers::{HttpDownloader, MobilizonClient, MobilizonConfig};

        let mobilizon = MobilizonConfig::new(&config.base_url)
            .map_err(|e| PipelineError::config(format!("invalid base_url `{}`: {}", config.base_url, e)))?
            .with_timeout(config.timeout)
            .with_user_agent(config.user_agent.clone());
        let source = MobilizonClient::new(mobilizon)?;
        let downloader = HttpDownloader::with_user_agent(config.timeout, &config.user_agent)?;
        Self::new(config, Box::new(source), Box::new(downloader))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Files registered for publication so far.
    pub fn assets(&self) -> &StaticAssets {
        &self.assets
    }

    /// Key of the raw event list in `_requests/`.
    pub fn requests_key(&self) -> CacheKey {
        CacheKey::from_url(&self.config.api_url())
    }

    /// Returns the raw event list, crawling on cache miss.
    ///
    /// After a crawl the list is persisted, read back from disk, and every
    /// picture and organizer avatar is thumbnailed. On a hit images are not
    /// checked again.
    pub async fn load_events(&mut self) -> PipelineResult<Vec<EventRecord>> {
        let key = self.requests_key();
        if let Some(events) = self
            .cache
            .get_json::<Vec<EventRecord>>(Namespace::Requests, &key)?
        {
            debug!(key = %key, count = events.len(), "Using cached events");
            return Ok(events);
        }

        let crawled = EventCrawler::new(self.source.as_ref())
            .crawl(&self.config.groups)
            .await?;
        self.cache.put_json(Namespace::Requests, &key, &crawled)?;

        let events: Vec<EventRecord> = self
            .cache
            .get_json(Namespace::Requests, &key)?
            .ok_or_else(|| {
                PipelineError::io(
                    self.cache.path(Namespace::Requests, &key),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "event list vanished"),
                )
            })?;

        let thumbnails =
            ThumbnailService::new(&self.cache, self.downloader.as_ref(), &self.config.cache_dir);
        for event in &events {
            if let Some(url) = event.picture_url() {
                thumbnails.ensure_thumbnail(url, &mut self.assets).await?;
            }
            if let Some(url) = event.avatar_url() {
                thumbnails.ensure_thumbnail(url, &mut self.assets).await?;
            }
        }

        Ok(events)
    }

    /// Runs every stage up to normalization.
    ///
    /// Returns nothing when the pipeline is disabled.
    pub async fn prepare(
        &mut self,
        allow: &AllowList,
        page_url: &str,
    ) -> PipelineResult<Vec<AgendaEvent>> {
        if !self.config.enabled {
            debug!("Agenda disabled, skipping");
            return Ok(Vec::new());
        }
        let timezone = self.config.display_timezone()?;

        let events = self.load_events().await?;
        let total = events.len();
        let mut events = filter_events(events, allow);
        sort_events(&mut events);
        info!(page = %page_url, total, kept = events.len(), "Filtered events");

        CalendarAssembler::new(&self.cache, self.downloader.as_ref(), &self.config.cache_dir)
            .assemble(&events, page_url, &mut self.assets)
            .await?;

        let normalizer = Normalizer::new(timezone, &self.config.cache_dir, &self.config.base_url);
        Ok(normalizer.normalize_all(events))
    }

    /// Renders the agenda for `page_url`, keeping events matching
    /// `allow_list` (comma-separated organizer handles, tag slugs or tag
    /// titles).
    ///
    /// The renderer is invoked once per event, or once with an empty context
    /// if nothing matches. A disabled pipeline renders an empty string
    /// without calling it.
    pub async fn render<R: Renderer + ?Sized>(
        &mut self,
        allow_list: &str,
        page_url: &str,
        renderer: &mut R,
    ) -> PipelineResult<String> {
        if !self.config.enabled {
            debug!("Agenda disabled, skipping");
            return Ok(String::new());
        }

        let allow = AllowList::parse(allow_list);
        let events = self.prepare(&allow, page_url).await?;
        Ok(render_all(events, renderer))
    }
}
