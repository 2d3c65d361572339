//! Mediapick Core Library
//!
//! This crate provides the option model, URI model, response data model,
//! error taxonomy, and configuration shared across all mediapick components.

pub mod asset;
pub mod config;
pub mod error;
pub mod options;
pub mod temp;
pub mod uri;

// Re-export commonly used types
pub use asset::{ExtraMetadata, MediaAsset, ResponseEnvelope};
pub use config::PickerConfig;
pub use error::{AcquireError, ErrorCode};
pub use options::{AcquisitionOptions, MediaType, VideoQuality};
pub use temp::TempStore;
pub use uri::MediaUri;
