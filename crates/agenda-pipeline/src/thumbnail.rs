//! Event pictures and organizer avatars, resized for the agenda cards.
//!
//! Images are scaled to cover a 540x300 box: the smaller scale factor that
//! still fills both axes is used, so one side matches the box and the other
//! overflows. Nothing is cropped. Decoding and re-encoding drops EXIF and
//! other embedded metadata.

use std::io::Cursor;

use agenda_core::CacheKey;
use agenda_providers::Downloader;
use image::error::{LimitError, LimitErrorKind};
use image::imageops::FilterType;
use image::{GenericImageView, ImageError, ImageFormat};
use tracing::{debug, info};

use crate::assets::{StaticAssets, site_dir};
use crate::cache::{AssetCache, Namespace};
use crate::error::{PipelineError, PipelineResult};

/// Minimum thumbnail width.
pub const THUMBNAIL_WIDTH: u32 = 540;
/// Minimum thumbnail height.
pub const THUMBNAIL_HEIGHT: u32 = 300;
/// Largest thumbnail, in pixels. Extreme aspect ratios would otherwise blow
/// up the overflowing side.
pub const MAX_THUMBNAIL_PIXELS: u64 = 16 * 1024 * 1024;

/// Size that covers the thumbnail box while keeping the aspect ratio.
///
/// Rounds up, so neither side ever ends below the box.
pub fn fill_dimensions(width: u32, height: u32) -> (u32, u32) {
    let (w, h) = (u64::from(width.max(1)), u64::from(height.max(1)));
    let (bw, bh) = (u64::from(THUMBNAIL_WIDTH), u64::from(THUMBNAIL_HEIGHT));

    // bw/w >= bh/h: width is the constraining side.
    let (nw, nh) = if bw * h >= bh * w {
        (bw, (h * bw).div_ceil(w))
    } else {
        ((w * bh).div_ceil(h), bh)
    };
    (
        u32::try_from(nw).unwrap_or(u32::MAX),
        u32::try_from(nh).unwrap_or(u32::MAX),
    )
}

/// Decodes, resizes and re-encodes an image.
///
/// The source format is kept when it can be encoded, PNG otherwise.
pub fn make_thumbnail(bytes: &[u8], url: &str) -> PipelineResult<Vec<u8>> {
    let format = image::guess_format(bytes).map_err(|e| PipelineError::image(url, e))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PipelineError::image(url, e))?;

    let (width, height) = img.dimensions();
    let (nw, nh) = fill_dimensions(width, height);
    debug!(url = %url, width, height, nw, nh, "Resizing image");
    if u64::from(nw) * u64::from(nh) > MAX_THUMBNAIL_PIXELS {
        let limit = LimitError::from_kind(LimitErrorKind::DimensionError);
        return Err(PipelineError::image(url, ImageError::Limits(limit)));
    }
    let resized = img.resize_exact(nw, nh, FilterType::Lanczos3);

    let output = if format.can_write() {
        format
    } else {
        ImageFormat::Png
    };
    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, output)
        .map_err(|e| PipelineError::image(url, e))?;
    Ok(out.into_inner())
}

/// Downloads and caches thumbnails.
pub struct ThumbnailService<'a> {
    cache: &'a AssetCache,
    downloader: &'a dyn Downloader,
    cache_dir: &'a str,
}

impl<'a> ThumbnailService<'a> {
    /// `cache_dir` is the site-relative cache directory used when registering
    /// the published file.
    pub fn new(cache: &'a AssetCache, downloader: &'a dyn Downloader, cache_dir: &'a str) -> Self {
        Self {
            cache,
            downloader,
            cache_dir,
        }
    }

    /// Makes sure a thumbnail for `url` is cached.
    ///
    /// Does nothing if the thumbnail already exists. Returns whether a new
    /// thumbnail was written.
    pub async fn ensure_thumbnail(
        &self,
        url: &str,
        assets: &mut StaticAssets,
    ) -> PipelineResult<bool> {
        let key = CacheKey::from_url(url);
        if self.cache.exists(Namespace::Media, &key) {
            debug!(key = %key, "Thumbnail already cached");
            return Ok(false);
        }

        let bytes = self.downloader.download(url).await?;
        info!(key = %key, "Thumbnailing");
        let thumbnail = make_thumbnail(&bytes, url)?;

        self.cache.put(Namespace::Media, &key, &thumbnail)?;
        assets.register(
            site_dir(self.cache_dir, Namespace::Media.dir_name()),
            key.as_str(),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDownloader, image_bytes, png_bytes};
    use tempfile::tempdir;

    /// Inserts an APP1 segment right after the JPEG start-of-image marker.
    fn with_app1(jpeg: &[u8], payload: &[u8]) -> Vec<u8> {
        let len = u16::try_from(payload.len() + 2).unwrap();
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn fill_covers_box() {
        assert_eq!(fill_dimensions(1080, 600), (540, 300));
        assert_eq!(fill_dimensions(100, 100), (540, 540));
        assert_eq!(fill_dimensions(2000, 500), (1200, 300));
        assert_eq!(fill_dimensions(300, 1000), (540, 1800));
        // 540 * 301 / 541 is not an integer: round up.
        assert_eq!(fill_dimensions(541, 301), (540, 301));
    }

    #[test]
    fn fill_never_underflows() {
        for (w, h) in [(1, 1), (7, 3), (999, 1), (1, 999), (4000, 2250), (541, 299)] {
            let (nw, nh) = fill_dimensions(w, h);
            assert!(nw >= THUMBNAIL_WIDTH && nh >= THUMBNAIL_HEIGHT, "{w}x{h} -> {nw}x{nh}");
            assert!(nw == THUMBNAIL_WIDTH || nh == THUMBNAIL_HEIGHT, "{w}x{h} -> {nw}x{nh}");
        }
    }

    #[test]
    fn thumbnail_keeps_format() {
        let out = make_thumbnail(&png_bytes(1080, 600), "https://x/a.png").unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!(img.dimensions(), (540, 300));
    }

    #[test]
    fn thumbnail_drops_exif() {
        let jpeg = image_bytes(1080, 600, ImageFormat::Jpeg);
        let tagged = with_app1(&jpeg, b"Exif\0\0GPS-48.8566N-2.3522E");
        assert!(contains(&tagged, b"GPS-48.8566N"));

        let out = make_thumbnail(&tagged, "https://x/a.jpg").unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        assert!(!contains(&out, b"GPS-48.8566N"));
        assert!(!contains(&out, b"Exif"));
        assert_eq!(image::load_from_memory(&out).unwrap().dimensions(), (540, 300));
    }

    #[test]
    fn extreme_aspect_ratio_is_rejected() {
        assert_eq!(fill_dimensions(1, 10_000), (540, 5_400_000));

        let err = make_thumbnail(&png_bytes(1, 10_000), "https://x/tall.png").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Image {
                source: ImageError::Limits(_),
                ..
            }
        ));
        let err = make_thumbnail(&png_bytes(10_000, 1), "https://x/wide.png").unwrap_err();
        assert!(matches!(err, PipelineError::Image { .. }));
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let err = make_thumbnail(b"definitely not an image", "https://x/a.png").unwrap_err();
        assert!(matches!(err, PipelineError::Image { .. }));
    }

    #[tokio::test]
    async fn downloads_once_and_registers() {
        let tmp = tempdir().unwrap();
        let cache = AssetCache::new(tmp.path());
        let url = "https://mobilizon.example/media/pic.png";
        let downloader = FakeDownloader::new().with_response(url, png_bytes(200, 100));
        let service = ThumbnailService::new(&cache, &downloader, "assets/mobilizon");
        let mut assets = StaticAssets::new();

        assert!(service.ensure_thumbnail(url, &mut assets).await.unwrap());
        assert!(!service.ensure_thumbnail(url, &mut assets).await.unwrap());

        assert_eq!(downloader.requests(), [url]);
        assert_eq!(assets.len(), 1);
        assert_eq!(
            assets.as_slice()[0].site_path(),
            "assets/mobilizon/media/https_mobilizon.example_media_pic.png"
        );

        let cached = cache
            .get(Namespace::Media, CacheKey::from_url(url))
            .unwrap()
            .unwrap();
        let img = image::load_from_memory(&cached).unwrap();
        assert_eq!(img.dimensions(), (600, 300));
    }

    #[tokio::test]
    async fn download_failure_is_fatal() {
        let tmp = tempdir().unwrap();
        let cache = AssetCache::new(tmp.path());
        let downloader = FakeDownloader::new();
        let service = ThumbnailService::new(&cache, &downloader, "assets/mobilizon");
        let mut assets = StaticAssets::new();

        let err = service
            .ensure_thumbnail("https://mobilizon.example/missing.png", &mut assets)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Provider(_)));
        assert!(assets.is_empty());
    }
}
