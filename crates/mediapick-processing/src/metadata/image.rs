//! EXIF-derived image metadata.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use super::to_utc_iso8601;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Timestamp metadata read from an image's EXIF block.
#[derive(Clone, Debug, Default)]
pub struct ImageMetadata {
    pub timestamp: Option<String>,
}

impl ImageMetadata {
    /// Read the EXIF DateTime tag and convert it to UTC ISO-8601. Any I/O or
    /// parse failure yields absent fields; a missing timestamp must never
    /// block the selection.
    pub fn read(path: &Path) -> Self {
        let raw = match Self::read_datetime_tag(path) {
            Some(raw) => raw,
            None => return Self::default(),
        };
        let timestamp = to_utc_iso8601(&raw, EXIF_DATETIME_FORMAT);
        if timestamp.is_none() {
            tracing::debug!(path = %path.display(), value = %raw, "could not parse EXIF datetime");
        }
        Self { timestamp }
    }

    fn read_datetime_tag(path: &Path) -> Option<String> {
        let file = fs::File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
        let field = exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY)?;
        match field.value {
            exif::Value::Ascii(ref v) => v
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string()),
            _ => None,
        }
    }
}
