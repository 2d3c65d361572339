//! Response data model: assets and the tri-state response envelope.

use serde::{Deserialize, Serialize};

use crate::error::{AcquireError, ErrorCode};

/// Optional per-asset metadata, populated only when `includeExtra` is set.
///
/// Extraction is best-effort; absent fields mean the source carried no
/// readable metadata, never an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraMetadata {
    /// Capture timestamp as UTC ISO-8601 with milliseconds and zone offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub id: String,
}

/// One selected or captured media item.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    /// URI handed over by the platform (picker or camera).
    pub source_uri: String,
    /// App-private copy the caller can actually read.
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub file_size: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    /// Video duration in whole seconds; absent for images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Video bitrate as reported by the container; absent for images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    /// Present only when `includeBase64` is set (images only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(flatten)]
    pub extra: Option<ExtraMetadata>,
}

/// The single response shape returned per request: exactly one of success,
/// cancellation, or error.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Assets {
        assets: Vec<MediaAsset>,
    },
    Cancelled {
        #[serde(rename = "didCancel")]
        did_cancel: bool,
    },
    Error {
        #[serde(rename = "errorCode")]
        error_code: String,
        #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
    },
}

impl ResponseEnvelope {
    pub fn assets(assets: Vec<MediaAsset>) -> Self {
        ResponseEnvelope::Assets { assets }
    }

    pub fn cancelled() -> Self {
        ResponseEnvelope::Cancelled { did_cancel: true }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseEnvelope::Error {
            error_code: code.as_str().to_string(),
            error_message: Some(message.into()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResponseEnvelope::Cancelled { did_cancel: true })
    }
}

impl From<AcquireError> for ResponseEnvelope {
    fn from(err: AcquireError) -> Self {
        ResponseEnvelope::error(err.code(), err.to_string())
    }
}
