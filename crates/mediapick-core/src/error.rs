//! Error taxonomy for the acquisition pipeline.
//!
//! Precondition and launch failures reject the request before any external
//! action starts; processing failures abort a whole batch. User cancellation
//! is deliberately not an error (see `ResponseEnvelope::cancelled`).

use std::io;

/// Stable machine-readable error codes exposed at the bridge boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    CameraUnavailable,
    Permission,
    Others,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CameraUnavailable => "camera_unavailable",
            ErrorCode::Permission => "permission",
            ErrorCode::Others => "others",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("no camera present on this device")]
    CameraUnavailable,

    #[error("{0}")]
    PermissionDenied(String),

    /// The host app declares the camera permission without holding it.
    /// Reported under the generic code, unlike storage permission denials.
    #[error("{0}")]
    CameraPermission(String),

    #[error("no active UI context")]
    NoUiContext,

    #[error("another acquisition request is already in flight")]
    Busy,

    #[error("could not create temp file: {0}")]
    TempFile(#[source] io::Error),

    #[error("no handler for platform action: {0}")]
    NoHandler(String),

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("asset processing failed: {0}")]
    Processing(#[source] anyhow::Error),
}

impl AcquireError {
    /// Map to the stable code reported in rejections and error envelopes.
    pub fn code(&self) -> ErrorCode {
        match self {
            AcquireError::CameraUnavailable => ErrorCode::CameraUnavailable,
            AcquireError::PermissionDenied(_) => ErrorCode::Permission,
            AcquireError::CameraPermission(_)
            | AcquireError::NoUiContext
            | AcquireError::Busy
            | AcquireError::TempFile(_)
            | AcquireError::NoHandler(_)
            | AcquireError::UnsupportedType(_)
            | AcquireError::Processing(_) => ErrorCode::Others,
        }
    }
}
