//! Mediapick processing: image normalization and metadata extraction.
//!
//! Still images are the only media that get resized or converted; video is
//! passed through untouched apart from container metadata extraction.

pub mod image;
pub mod metadata;
pub mod mime;
pub mod orientation;

pub use crate::image::ImageNormalizer;
pub use metadata::{ImageMetadata, VideoMetadata};
pub use mime::MediaKind;
pub use orientation::Orientation;
