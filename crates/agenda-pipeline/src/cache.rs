//! Disk-backed asset cache.
//!
//! Entries live in flat per-namespace directories under the cache root:
//!
//! ```text
//! <root>/_requests/<key>        pretty JSON event list
//! <root>/media/<key>            thumbnails
//! <root>/_ics/<key>             per-event calendar fragments
//! <root>/calendar/<page>.ics    merged feeds
//! ```
//!
//! A file's presence means its source was already fetched. Entries never
//! expire and are never rewritten; the only invalidation is [`AssetCache::clear`],
//! which removes the whole tree. Content can therefore go stale for as long as
//! the cache directory survives.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, trace};

use crate::error::{PipelineError, PipelineResult};

/// A cache namespace, one directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Raw crawl results.
    Requests,
    /// Thumbnails, published.
    Media,
    /// Calendar fragments.
    Ics,
    /// Merged feeds, published.
    Calendar,
}

impl Namespace {
    /// Directory name under the cache root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Requests => "_requests",
            Self::Media => "media",
            Self::Ics => "_ics",
            Self::Calendar => "calendar",
        }
    }
}

/// Key to blob store rooted at one directory.
#[derive(Debug, Clone)]
pub struct AssetCache {
    root: PathBuf,
}

impl AssetCache {
    /// Creates a cache rooted at `root`. Nothing is created on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a namespace.
    pub fn dir(&self, namespace: Namespace) -> PathBuf {
        self.root.join(namespace.dir_name())
    }

    /// File path of an entry.
    pub fn path(&self, namespace: Namespace, key: impl AsRef<str>) -> PathBuf {
        self.dir(namespace).join(key.as_ref())
    }

    /// Returns true if the entry is on disk.
    pub fn exists(&self, namespace: Namespace, key: impl AsRef<str>) -> bool {
        self.path(namespace, key).is_file()
    }

    /// Reads an entry, `None` on miss.
    pub fn get(&self, namespace: Namespace, key: impl AsRef<str>) -> PipelineResult<Option<Vec<u8>>> {
        let path = self.path(namespace, key);
        match fs::read(&path) {
            Ok(bytes) => {
                trace!(path = %path.display(), "Cache hit");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "Cache miss");
                Ok(None)
            }
            Err(e) => Err(PipelineError::io(&path, e)),
        }
    }

    /// Stores an entry, creating the namespace directory if needed.
    ///
    /// An existing entry is left untouched. Returns whether the entry was
    /// written.
    pub fn put(
        &self,
        namespace: Namespace,
        key: impl AsRef<str>,
        bytes: &[u8],
    ) -> PipelineResult<bool> {
        let path = self.path(namespace, key);
        if path.is_file() {
            debug!(path = %path.display(), "Cache entry exists, not overwriting");
            return Ok(false);
        }

        let dir = self.dir(namespace);
        fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
        fs::write(&path, bytes).map_err(|e| PipelineError::io(&path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Cache entry written");
        Ok(true)
    }

    /// Reads and decodes a JSON entry.
    ///
    /// A file that does not decode is reported as [`PipelineError::CorruptCache`]
    /// and left in place.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
        key: impl AsRef<str>,
    ) -> PipelineResult<Option<T>> {
        let key = key.as_ref();
        let Some(bytes) = self.get(namespace, key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| PipelineError::corrupt_cache(self.path(namespace, key), e))
    }

    /// Stores a value as pretty-printed JSON.
    pub fn put_json<T: Serialize + ?Sized>(
        &self,
        namespace: Namespace,
        key: impl AsRef<str>,
        value: &T,
    ) -> PipelineResult<bool> {
        let key = key.as_ref();
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| PipelineError::io(self.path(namespace, key), e.into()))?;
        self.put(namespace, key, &bytes)
    }

    /// Removes the whole cache tree. A missing root is not an error.
    ///
    /// Refuses a root that does not end in a named directory, such as `.`,
    /// `..` or `/`.
    pub fn clear(&self) -> PipelineResult<()> {
        if !matches!(self.root.components().next_back(), Some(Component::Normal(_))) {
            return Err(PipelineError::config(format!(
                "refusing to delete cache root `{}`",
                self.root.display()
            )));
        }
        info!(dir = %self.root.display(), "Cleaning cache folder");
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::io(&self.root, e)),
        }
    }
}
