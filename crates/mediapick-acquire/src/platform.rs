//! Platform abstraction: capability checks, content resolution, and the
//! external picker/camera action.

use std::io::Read;
use std::path::{Path, PathBuf};

use mediapick_core::{MediaUri, VideoQuality};

/// MIME filter applied to the platform "get content" action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MimeFilter {
    Images,
    Videos,
    ImagesAndVideos,
}

/// An action the OS is asked to run on the app's behalf.
#[derive(Clone, Debug)]
pub enum PlatformAction {
    CapturePhoto {
        output: PathBuf,
        front_camera: bool,
    },
    CaptureVideo {
        output: PathBuf,
        front_camera: bool,
        quality: VideoQuality,
        duration_limit_secs: Option<u32>,
    },
    PickMedia {
        filter: MimeFilter,
        allow_multiple: bool,
    },
}

/// Identifies one launched request so stray or stale platform callbacks can
/// be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestTicket(pub u64);

/// What the external action eventually reported back.
#[derive(Clone, Debug)]
pub enum ExternalOutcome {
    /// The user confirmed; library picks carry the selected URIs in
    /// platform order, camera captures may leave this empty (the capture
    /// went to the pre-created output file).
    Success { uris: Vec<MediaUri> },
    Cancelled,
    Failed,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("no handler registered for {0}")]
    NoHandler(String),
}

/// Host capability and permission checks, evaluated before any external
/// action starts.
pub trait HostEnvironment: Send + Sync {
    fn camera_available(&self) -> bool;

    /// Whether a foreground UI context exists to run an external action in.
    fn has_ui_context(&self) -> bool;

    /// False only when the host app declares the camera permission without
    /// it being granted; apps that never declare it pass.
    fn camera_permission_fulfilled(&self) -> bool;

    /// Legacy OS versions gate public-storage writes behind an extra
    /// permission.
    fn legacy_write_permission_required(&self) -> bool;
    fn write_permission_granted(&self) -> bool;
}

/// Target collection for the best-effort save of camera captures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublicKind {
    Photo,
    Video,
}

/// OS-mediated access to content URIs and shared storage.
///
/// Implementations may restrict repeat access to a content URI, which is why
/// the pipeline materializes every content source into an app-private file
/// before processing.
pub trait ContentStore: Send + Sync {
    fn open(&self, uri: &str) -> std::io::Result<Box<dyn Read + Send>>;

    /// MIME type as reported by the resolver, if it reports one.
    fn mime_type(&self, uri: &str) -> Option<String>;

    /// Human-readable display name (usually the original filename).
    fn display_name(&self, uri: &str) -> Option<String>;

    /// Underlying filesystem path of the content, when the resolver exposes
    /// one.
    fn original_path(&self, uri: &str) -> Option<String>;

    /// Copy a captured file into the device's public media collection under
    /// the given display name.
    fn save_to_public_storage(
        &self,
        source: &Path,
        kind: PublicKind,
        mime_type: Option<&str>,
        display_name: &str,
    ) -> anyhow::Result<()>;
}

/// Hands a built action to the OS. Must not invoke the result callback
/// synchronously from within `launch`.
pub trait ActionLauncher: Send + Sync {
    fn launch(&self, ticket: RequestTicket, action: PlatformAction) -> Result<(), LaunchError>;
}
