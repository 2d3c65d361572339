//! MIME type and file extension resolution.

/// Broad classification used to route an asset through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

/// Classify a MIME type string. Anything that is neither `image/*` nor
/// `video/*` is `Other` and aborts the batch downstream.
pub fn kind_of(mime: &str) -> MediaKind {
    if mime.starts_with("image/") {
        MediaKind::Image
    } else if mime.starts_with("video/") {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}

/// MIME type for a lowercased filename extension.
pub fn mime_from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "3gp" => "video/3gpp",
        _ => return None,
    };
    Some(mime)
}

/// Preferred extension for a MIME type; defaults to `jpg` for anything
/// unrecognized, mirroring the platform picker's bias toward photos.
pub fn extension_from_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/heic" => "heic",
        "image/heif" => "heif",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/x-matroska" => "mkv",
        "video/webm" => "webm",
        "video/x-msvideo" => "avi",
        "video/3gpp" => "3gp",
        _ => "jpg",
    }
}

/// HEIC/HEIF sources are the only ones eligible for JPEG conversion.
pub fn is_heif(mime: &str) -> bool {
    mime == "image/heic" || mime == "image/heif"
}
