//! Profile picture processing.
//!
//! The bio shows the avatar at a fixed size. The source image is center-cropped
//! to exactly `width×height` with Lanczos3 and written twice:
//!
//! | File | Encoder |
//! |---|---|
//! | `static/avatar-{w}x{h}.webp` | `WebPEncoder::new_lossless` |
//! | `static/avatar-{w}x{h}.jpg` | `JpegEncoder::new_with_quality` (fallback `<img>`) |
//!
//! A missing source file is not an error: the bio simply renders without an
//! avatar.

use crate::config::AvatarConfig;
use crate::profile::AvatarAsset;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Path of the configured source image, if it exists.
pub fn locate_avatar(content_root: &Path, config: &AvatarConfig) -> Option<PathBuf> {
    if config.path.trim().is_empty() {
        return None;
    }
    let path = content_root.join(&config.path);
    path.is_file().then_some(path)
}

/// URLs and dimensions the processed avatar is published under.
pub fn avatar_asset(config: &AvatarConfig) -> AvatarAsset {
    let stem = format!("/static/avatar-{}x{}", config.width, config.height);
    AvatarAsset {
        src: format!("{stem}.jpg"),
        sources: vec![("image/webp".to_string(), format!("{stem}.webp"))],
        width: config.width,
        height: config.height,
        quality: config.quality,
    }
}

/// Check the avatar can be read without processing it.
///
/// Only the image header is decoded; used by dry runs.
pub fn inspect_avatar(
    content_root: &Path,
    config: &AvatarConfig,
) -> Result<Option<AvatarAsset>, AvatarError> {
    let Some(source) = locate_avatar(content_root, config) else {
        return Ok(None);
    };
    let (width, height) =
        image::image_dimensions(&source).map_err(|source_err| AvatarError::Decode {
            path: source.clone(),
            source: source_err,
        })?;
    debug!("avatar {} is {width}x{height}", source.display());
    Ok(Some(avatar_asset(config)))
}

/// Resize the avatar into `output_dir`.
///
/// Returns `Ok(None)` when the source image does not exist.
pub fn process_avatar(
    content_root: &Path,
    config: &AvatarConfig,
    output_dir: &Path,
) -> Result<Option<AvatarAsset>, AvatarError> {
    let Some(source) = locate_avatar(content_root, config) else {
        debug!("no avatar at {}", content_root.join(&config.path).display());
        return Ok(None);
    };

    let img = ImageReader::open(&source)?
        .with_guessed_format()?
        .decode()
        .map_err(|source_err| AvatarError::Decode {
            path: source.clone(),
            source: source_err,
        })?;
    let filled = img.resize_to_fill(config.width, config.height, FilterType::Lanczos3);

    let asset = avatar_asset(config);
    let jpg_path = output_dir.join(asset.src.trim_start_matches('/'));
    if let Some(parent) = jpg_path.parent() {
        fs::create_dir_all(parent)?;
    }
    save_jpeg(&filled, &jpg_path, config.quality)?;
    for (_, src) in &asset.sources {
        save_webp(&filled, &output_dir.join(src.trim_start_matches('/')))?;
    }

    info!(
        "avatar {} → {}x{}",
        source.display(),
        config.width,
        config.height
    );
    Ok(Some(asset))
}

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), AvatarError> {
    let writer = BufWriter::new(fs::File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|source| AvatarError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

fn save_webp(img: &DynamicImage, path: &Path) -> Result<(), AvatarError> {
    let writer = BufWriter::new(fs::File::create(path)?);
    DynamicImage::ImageRgba8(img.to_rgba8())
        .write_with_encoder(WebPEncoder::new_lossless(writer))
        .map_err(|source| AvatarError::Encode {
            path: path.to_path_buf(),
            source,
        })
}
