//! Acquisition options: loosely-typed bridge input → defaulted, typed config.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of media the caller wants to acquire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
    Mixed,
}

/// Capture quality hint forwarded to the platform camera action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    Low,
    High,
}

impl VideoQuality {
    /// Integer form expected by platform capture extras (0 = low, 1 = high).
    pub fn platform_value(self) -> i32 {
        match self {
            VideoQuality::Low => 0,
            VideoQuality::High => 1,
        }
    }
}

/// Fully defaulted acquisition configuration.
///
/// Built from the loosely-typed option map the bridge hands over. Unknown or
/// malformed fields are ignored; parsing never fails.
#[derive(Clone, Debug)]
pub struct AcquisitionOptions {
    pub media_type: MediaType,
    pub selection_limit: u32,
    pub include_base64: bool,
    pub include_extra: bool,
    pub video_quality: VideoQuality,
    /// Image compress quality as a percentage, 0..=100.
    pub quality: u32,
    /// Quality used when converting HEIC/HEIF to JPEG without resizing.
    pub conversion_quality: u32,
    pub convert_to_jpeg: bool,
    /// 0 means unconstrained.
    pub max_width: u32,
    /// 0 means unconstrained.
    pub max_height: u32,
    pub save_to_public_storage: bool,
    /// 0 means unconstrained.
    pub duration_limit_secs: u32,
    pub use_front_camera: bool,
    pub restricted_mime_types: Option<Vec<String>>,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            media_type: MediaType::Photo,
            selection_limit: 1,
            include_base64: false,
            include_extra: false,
            video_quality: VideoQuality::Low,
            quality: 100,
            conversion_quality: 92,
            convert_to_jpeg: true,
            max_width: 0,
            max_height: 0,
            save_to_public_storage: false,
            duration_limit_secs: 0,
            use_front_camera: false,
            restricted_mime_types: None,
        }
    }
}

fn percent(v: &Value, key: &str) -> Option<u32> {
    let q = v.get(key)?.as_f64()?;
    Some((q * 100.0).round().clamp(0.0, 100.0) as u32)
}

impl AcquisitionOptions {
    /// Parse a loosely-typed option map, applying defaults for absent keys.
    ///
    /// `quality` and `conversionQuality` arrive as fractions in `[0, 1]` and
    /// are stored as rounded percentages.
    pub fn from_value(raw: &Value) -> Self {
        let mut opts = Self::default();

        match raw.get("mediaType").and_then(Value::as_str) {
            Some("video") => opts.media_type = MediaType::Video,
            Some("mixed") => opts.media_type = MediaType::Mixed,
            _ => opts.media_type = MediaType::Photo,
        }

        if let Some(limit) = raw.get("selectionLimit").and_then(Value::as_u64) {
            opts.selection_limit = (limit as u32).max(1);
        }
        if let Some(b) = raw.get("includeBase64").and_then(Value::as_bool) {
            opts.include_base64 = b;
        }
        if let Some(b) = raw.get("includeExtra").and_then(Value::as_bool) {
            opts.include_extra = b;
        }

        if let Some(vq) = raw.get("videoQuality").and_then(Value::as_str) {
            if vq.eq_ignore_ascii_case("high") {
                opts.video_quality = VideoQuality::High;
            }
        }

        if let Some(q) = percent(raw, "quality") {
            opts.quality = q;
        }
        if let Some(q) = percent(raw, "conversionQuality") {
            opts.conversion_quality = q;
        }

        if let Some(mode) = raw.get("assetRepresentationMode").and_then(Value::as_str) {
            if mode.eq_ignore_ascii_case("current") {
                opts.convert_to_jpeg = false;
            }
        }

        if let Some(w) = raw.get("maxWidth").and_then(Value::as_u64) {
            opts.max_width = w as u32;
        }
        if let Some(h) = raw.get("maxHeight").and_then(Value::as_u64) {
            opts.max_height = h as u32;
        }
        if let Some(b) = raw.get("saveToPhotos").and_then(Value::as_bool) {
            opts.save_to_public_storage = b;
        }
        if let Some(d) = raw.get("durationLimit").and_then(Value::as_u64) {
            opts.duration_limit_secs = d as u32;
        }
        if raw.get("cameraType").and_then(Value::as_str) == Some("front") {
            opts.use_front_camera = true;
        }

        if let Some(types) = raw.get("restrictMimeTypes").and_then(Value::as_array) {
            let list: Vec<String> = types
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            if !list.is_empty() {
                opts.restricted_mime_types = Some(list);
            }
        }

        opts
    }

    /// A limit of exactly 1 forces single-selection UI regardless of media type.
    pub fn allows_multiple(&self) -> bool {
        self.selection_limit > 1
    }
}
