//! Cache cleanup.

use agenda_pipeline::AssetCache;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Deletes the whole cache directory. Run once before a site build.
pub fn clean(config: &ClientConfig) -> ClientResult<()> {
    let cache = AssetCache::new(config.agenda.to_pipeline_config().cache_root()?);
    cache.clear()?;
    println!("Cleaned {}", cache.root().display());
    Ok(())
}
