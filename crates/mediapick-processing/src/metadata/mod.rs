//! Best-effort media metadata extraction.
//!
//! Extraction failure never propagates: a media item with unreadable
//! metadata still resolves, just with absent fields.

mod image;
mod video;

pub use self::image::ImageMetadata;
pub use self::video::VideoMetadata;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Convert a source timestamp to UTC ISO-8601 with milliseconds and zone
/// offset. `format` uses chrono strftime syntax; the source zone is assumed
/// to be UTC. Returns `None` on any parse failure.
pub fn to_utc_iso8601(value: &str, format: &str) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), format).ok()?;
    let utc: DateTime<Utc> = DateTime::from_naive_utc_and_offset(naive, Utc);
    Some(utc.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string())
}
