//! Media resource handles: app-owned file paths vs. resolver-mediated content URIs.

use std::fmt;
use std::path::{Path, PathBuf};

/// A reference to a media resource as handed over by the platform.
///
/// `File` is a filesystem path owned by the app; `Content` is an opaque
/// resolver-mediated handle that must be materialized into an app-private
/// file before repeat access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaUri {
    File(PathBuf),
    Content(String),
}

impl MediaUri {
    /// Parse a URI string; anything without a recognized scheme is treated
    /// as a plain file path.
    pub fn parse(s: &str) -> Self {
        if let Some(rest) = s.strip_prefix("file://") {
            MediaUri::File(PathBuf::from(rest))
        } else if s.starts_with("content://") {
            MediaUri::Content(s.to_string())
        } else {
            MediaUri::File(PathBuf::from(s))
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        MediaUri::File(path.into())
    }

    pub fn is_content(&self) -> bool {
        matches!(self, MediaUri::Content(_))
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MediaUri::File(p) => Some(p),
            MediaUri::Content(_) => None,
        }
    }

    /// Lowercased filename extension, if one is present.
    pub fn extension(&self) -> Option<String> {
        let segment = self.last_segment()?;
        let (_, ext) = segment.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }

    /// Final path segment of the URI, used as a filename fallback.
    pub fn last_segment(&self) -> Option<String> {
        match self {
            MediaUri::File(p) => p
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            MediaUri::Content(s) => s
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|seg| !seg.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaUri::File(p) => write!(f, "file://{}", p.display()),
            MediaUri::Content(s) => f.write_str(s),
        }
    }
}
