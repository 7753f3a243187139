//! Registry of files the site must publish.
//!
//! Thumbnails and merged feeds are written under the cache directory, which
//! the host does not copy on its own. Each one is recorded here as a
//! `(site directory, file name)` pair for the host to pick up.

use serde::Serialize;

/// One published file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticAsset {
    /// Site-relative directory, e.g. `assets/mobilizon/media`.
    pub dir: String,
    /// File name within `dir`.
    pub name: String,
}

impl StaticAsset {
    /// Creates an asset entry.
    pub fn new(dir: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Site-relative path of the file.
    pub fn site_path(&self) -> String {
        format!("{}/{}", self.dir.trim_end_matches('/'), self.name)
    }
}

/// Append-only list of published files.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    assets: Vec<StaticAsset>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file.
    pub fn register(&mut self, dir: impl Into<String>, name: impl Into<String>) {
        self.assets.push(StaticAsset::new(dir, name));
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaticAsset> {
        self.assets.iter()
    }

    pub fn as_slice(&self) -> &[StaticAsset] {
        &self.assets
    }
}

/// Joins the cache directory and a namespace into a site directory.
pub(crate) fn site_dir(cache_dir: &str, namespace: &str) -> String {
    format!("{}/{}", cache_dir.trim_matches('/'), namespace)
}
