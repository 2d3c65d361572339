//! Response assembly: content-URI materialization, classification, and
//! per-asset resolution.
//!
//! Runs on the blocking worker. Any per-asset failure aborts the whole
//! batch; there are no partial results.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use mediapick_core::{
    AcquireError, AcquisitionOptions, ExtraMetadata, MediaAsset, MediaUri, TempStore,
};
use mediapick_processing::metadata::{ImageMetadata, VideoMetadata};
use mediapick_processing::mime;
use mediapick_processing::{ImageNormalizer, MediaKind};

use crate::platform::ContentStore;

pub(crate) struct AssembleContext {
    pub store: Arc<dyn ContentStore>,
    pub temp: TempStore,
    pub ffprobe_path: String,
}

/// Resolve every URI into an asset, preserving order.
pub(crate) fn assemble_assets(
    uris: Vec<MediaUri>,
    options: &AcquisitionOptions,
    ctx: &AssembleContext,
) -> Result<Vec<MediaAsset>, AcquireError> {
    let mut assets = Vec::with_capacity(uris.len());
    for uri in uris {
        assets.push(resolve_asset(&uri, options, ctx)?);
    }
    Ok(assets)
}

fn resolve_asset(
    uri: &MediaUri,
    options: &AcquisitionOptions,
    ctx: &AssembleContext,
) -> Result<MediaAsset, AcquireError> {
    // Content resolvers may refuse repeat access, so every content URI is
    // copied into an app-private file up front.
    let local = match uri {
        MediaUri::Content(raw) => materialize(raw, ctx)
            .with_context(|| format!("materialize {raw}"))
            .map_err(AcquireError::Processing)?,
        MediaUri::File(path) => path.clone(),
    };

    let mime_type = resolve_mime(uri, &local, ctx)
        .ok_or_else(|| AcquireError::UnsupportedType("unknown".to_string()))?;

    if let Some(allowed) = &options.restricted_mime_types {
        if !allowed.iter().any(|m| m == &mime_type) {
            return Err(AcquireError::UnsupportedType(mime_type));
        }
    }

    match mime::kind_of(&mime_type) {
        MediaKind::Image => Ok(image_asset(uri, local, mime_type, options, ctx)),
        MediaKind::Video => Ok(video_asset(uri, local, mime_type, options, ctx)),
        MediaKind::Other => Err(AcquireError::UnsupportedType(mime_type)),
    }
}

fn image_asset(
    source: &MediaUri,
    local: PathBuf,
    mime_type: String,
    options: &AcquisitionOptions,
    ctx: &AssembleContext,
) -> MediaAsset {
    let resolved = ImageNormalizer::normalize(&local, &mime_type, options, &ctx.temp);
    // Normalization may have converted the format; re-derive from the
    // output extension when a new file was produced.
    let mime_type = if resolved != local {
        resolved
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime::mime_from_extension)
            .map(str::to_string)
            .unwrap_or(mime_type)
    } else {
        mime_type
    };

    let (width, height) = ImageNormalizer::dimensions(&resolved);
    let file_name = file_name_of(source, ctx);

    let base64 = if options.include_base64 {
        read_base64(&resolved)
    } else {
        None
    };

    let extra = options.include_extra.then(|| {
        let meta = ImageMetadata::read(&resolved);
        ExtraMetadata {
            timestamp: meta.timestamp,
            id: file_name.clone().unwrap_or_default(),
        }
    });

    MediaAsset {
        source_uri: source.to_string(),
        uri: MediaUri::from_path(&resolved).to_string(),
        file_name,
        file_size: file_size_of(&resolved),
        mime_type: Some(mime_type),
        width,
        height,
        original_path: original_path_of(source, ctx),
        duration: None,
        bitrate: None,
        base64,
        extra,
    }
}

fn video_asset(
    source: &MediaUri,
    local: PathBuf,
    mime_type: String,
    options: &AcquisitionOptions,
    ctx: &AssembleContext,
) -> MediaAsset {
    let meta = VideoMetadata::read(&local, &ctx.ffprobe_path);
    let file_name = file_name_of(source, ctx);

    let extra = options.include_extra.then(|| ExtraMetadata {
        timestamp: meta.timestamp.clone(),
        id: file_name.clone().unwrap_or_default(),
    });

    MediaAsset {
        source_uri: source.to_string(),
        uri: MediaUri::from_path(&local).to_string(),
        file_name,
        file_size: file_size_of(&local),
        mime_type: Some(mime_type),
        width: meta.width,
        height: meta.height,
        original_path: original_path_of(source, ctx),
        duration: Some(meta.duration_secs),
        bitrate: Some(meta.bitrate),
        base64: None,
        extra,
    }
}

/// Copy a content URI into a fresh app-private file, naming it with the
/// extension implied by the resolver's MIME type (falling back to the
/// display name's extension).
fn materialize(raw: &str, ctx: &AssembleContext) -> anyhow::Result<PathBuf> {
    let extension = ctx
        .store
        .mime_type(raw)
        .filter(|m| !m.trim().is_empty())
        .map(|m| mime::extension_from_mime(&m).to_string())
        .or_else(|| {
            ctx.store
                .display_name(raw)
                .and_then(|name| name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()))
        })
        .unwrap_or_else(|| "jpg".to_string());

    let dest = ctx.temp.create(&extension).context("create temp file")?;
    let mut reader = ctx.store.open(raw).context("open content uri")?;
    let mut writer = fs::File::create(&dest).context("open temp file")?;
    io::copy(&mut reader, &mut writer).context("copy content")?;
    tracing::debug!(source = raw, dest = %dest.display(), "materialized content uri");
    Ok(dest)
}

/// MIME type of a source: file scheme from the extension, content scheme
/// from the resolver with a filename-extension fallback.
fn resolve_mime(uri: &MediaUri, local: &Path, ctx: &AssembleContext) -> Option<String> {
    match uri {
        MediaUri::File(_) => uri
            .extension()
            .and_then(|e| mime::mime_from_extension(&e))
            .map(str::to_string),
        MediaUri::Content(raw) => ctx
            .store
            .mime_type(raw)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                local
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(mime::mime_from_extension)
                    .map(str::to_string)
            }),
    }
}

fn file_name_of(uri: &MediaUri, ctx: &AssembleContext) -> Option<String> {
    match uri {
        MediaUri::File(_) => uri.last_segment(),
        MediaUri::Content(raw) => ctx.store.display_name(raw).or_else(|| uri.last_segment()),
    }
}

fn original_path_of(uri: &MediaUri, ctx: &AssembleContext) -> Option<String> {
    match uri {
        MediaUri::File(_) => Some(uri.to_string()),
        MediaUri::Content(raw) => ctx.store.original_path(raw),
    }
}

fn file_size_of(path: &Path) -> u64 {
    match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "could not stat file");
            0
        }
    }
}

fn read_base64(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(BASE64.encode(bytes)),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "could not read file for base64");
            None
        }
    }
}
