//! Mediapick acquisition: the picker/camera flow controller.
//!
//! The OS-owned picker and camera are modeled as external actors behind
//! [`platform`] traits: the controller launches a [`PlatformAction`], the host
//! feeds the eventual outcome back through
//! [`AcquisitionController::handle_external_result`], and the caller awaits
//! the resulting [`ResponseFuture`].

mod assemble;
pub mod controller;
pub mod platform;

pub use controller::{AcquisitionController, ResponseFuture};
pub use platform::{
    ActionLauncher, ContentStore, ExternalOutcome, HostEnvironment, LaunchError, MimeFilter,
    PlatformAction, PublicKind, RequestTicket,
};

// Re-export the core surface callers need alongside the controller.
pub use mediapick_core::{
    AcquireError, AcquisitionOptions, ErrorCode, MediaAsset, MediaType, MediaUri, PickerConfig,
    ResponseEnvelope, VideoQuality,
};
