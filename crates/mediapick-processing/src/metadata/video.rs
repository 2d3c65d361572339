//! Video container metadata via an ffprobe subprocess.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use super::to_utc_iso8601;

const COMPACT_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Technical metadata read from a video container.
///
/// All fields stay at their zero/absent default when ffprobe is missing,
/// fails, or reports nothing usable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoMetadata {
    /// Whole seconds, truncated.
    pub duration_secs: u32,
    /// Bits per second as reported by the container, 0 when unknown.
    pub bitrate: i64,
    /// Display width, with rotation-aware axis swap applied.
    pub width: u32,
    pub height: u32,
    pub timestamp: Option<String>,
}

impl VideoMetadata {
    /// Probe the container. This spawns a subprocess and blocks; callers run
    /// it on the processing worker, never on the UI-owning thread.
    pub fn read(path: &Path, ffprobe: &str) -> Self {
        let output = Command::new(ffprobe)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output();

        let output = match output {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                tracing::debug!(path = %path.display(), status = ?out.status, "ffprobe failed");
                return Self::default();
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "could not run ffprobe");
                return Self::default();
            }
        };

        match serde_json::from_slice::<Value>(&output.stdout) {
            Ok(parsed) => Self::from_ffprobe_json(&parsed),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "ffprobe output was not JSON");
                Self::default()
            }
        }
    }

    fn from_ffprobe_json(parsed: &Value) -> Self {
        let format = parsed.get("format");

        let duration_secs = format
            .and_then(|f| f.get("duration"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
            .map(|secs| secs.trunc() as u32)
            .unwrap_or(0);

        let bitrate = format
            .and_then(|f| f.get("bit_rate"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0);

        let timestamp = format
            .and_then(|f| f.get("tags"))
            .and_then(|t| t.get("creation_time"))
            .and_then(Value::as_str)
            .and_then(|raw| {
                to_utc_iso8601(raw, COMPACT_DATETIME_FORMAT)
                    .or_else(|| to_utc_iso8601(raw, ISO_DATETIME_FORMAT))
            });

        let video_stream = parsed
            .get("streams")
            .and_then(Value::as_array)
            .and_then(|streams| {
                streams.iter().find(|s| {
                    s.get("codec_type").and_then(Value::as_str) == Some("video")
                })
            });

        let (mut width, mut height) = video_stream
            .map(|s| {
                (
                    s.get("width").and_then(Value::as_u64).unwrap_or(0) as u32,
                    s.get("height").and_then(Value::as_u64).unwrap_or(0) as u32,
                )
            })
            .unwrap_or((0, 0));

        if let Some(stream) = video_stream {
            if rotation_swaps_axes(stream) {
                std::mem::swap(&mut width, &mut height);
            }
        }

        Self {
            duration_secs,
            bitrate,
            width,
            height,
            timestamp,
        }
    }
}

/// A 90°/270° rotation swaps the display axes. Rotation is reported either
/// in the stream's side data or in a legacy `rotate` tag.
fn rotation_swaps_axes(stream: &Value) -> bool {
    let rotation = stream
        .get("side_data_list")
        .and_then(Value::as_array)
        .and_then(|list| list.iter().find_map(|sd| sd.get("rotation").and_then(Value::as_i64)))
        .or_else(|| {
            stream
                .get("tags")
                .and_then(|t| t.get("rotate"))
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<i64>().ok())
        });

    match rotation {
        Some(deg) => deg.rem_euclid(180) != 0,
        None => false,
    }
}
