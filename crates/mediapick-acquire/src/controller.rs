//! The acquisition controller: a single-request state machine over the
//! platform picker/camera.
//!
//! States: Idle → AwaitingExternalResult → Idle. Launch entry points run
//! synchronously on the caller's thread (validation, temp file, launch); the
//! external result arrives later on an arbitrary thread via
//! [`AcquisitionController::handle_external_result`], and asset processing is
//! pushed onto the blocking worker pool so the response is assembled off the
//! UI-owning thread. The caller's completion channel resolves exactly once.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use uuid::Uuid;

use mediapick_core::{
    AcquireError, AcquisitionOptions, ErrorCode, MediaType, MediaUri, PickerConfig,
    ResponseEnvelope, TempStore,
};
use mediapick_processing::mime;

use crate::assemble::{assemble_assets, AssembleContext};
use crate::platform::{
    ActionLauncher, ContentStore, ExternalOutcome, HostEnvironment, MimeFilter, PlatformAction,
    PublicKind, RequestTicket,
};

const CAMERA_PERMISSION_MESSAGE: &str =
    "the host app declares the camera permission but it has not been granted";

/// Resolves to the response envelope for one acquisition request.
#[derive(Debug)]
pub struct ResponseFuture {
    rx: oneshot::Receiver<ResponseEnvelope>,
}

impl ResponseFuture {
    /// Wait for the external action and asset processing to finish. There is
    /// no timeout: the external actor is OS-owned UI and a request that never
    /// receives a result waits indefinitely.
    pub async fn wait(self) -> ResponseEnvelope {
        self.rx
            .await
            .unwrap_or_else(|_| ResponseEnvelope::error(ErrorCode::Others, "acquisition dropped"))
    }
}

/// The single in-flight request. Consumed exactly once when the external
/// result is observed.
struct PendingRequest {
    ticket: RequestTicket,
    options: AcquisitionOptions,
    /// Pre-created output file for camera capture; absent for library picks.
    camera_output: Option<PathBuf>,
    sender: oneshot::Sender<ResponseEnvelope>,
}

/// Deferred copy of a camera capture into public storage. Runs on the
/// processing worker before asset assembly, which may re-encode and delete
/// the capture file. Failure is logged and never fails the response.
struct PublicSaveJob {
    store: Arc<dyn ContentStore>,
    source: PathBuf,
    kind: PublicKind,
    mime_type: Option<String>,
    display_name: String,
}

impl PublicSaveJob {
    fn run(self) {
        if let Err(err) = self.store.save_to_public_storage(
            &self.source,
            self.kind,
            self.mime_type.as_deref(),
            &self.display_name,
        ) {
            tracing::warn!(
                source = %self.source.display(),
                error = %err,
                "could not save capture to public storage"
            );
        }
    }
}

pub struct AcquisitionController {
    host: Arc<dyn HostEnvironment>,
    store: Arc<dyn ContentStore>,
    launcher: Arc<dyn ActionLauncher>,
    temp: TempStore,
    ffprobe_path: String,
    runtime: tokio::runtime::Handle,
    pending: Mutex<Option<PendingRequest>>,
    next_ticket: AtomicU64,
}

impl AcquisitionController {
    /// Must be called from within a tokio runtime; asset processing and the
    /// public-storage copy run on its blocking worker pool.
    pub fn new(
        host: Arc<dyn HostEnvironment>,
        store: Arc<dyn ContentStore>,
        launcher: Arc<dyn ActionLauncher>,
        config: &PickerConfig,
    ) -> Self {
        Self {
            host,
            store,
            launcher,
            temp: TempStore::new(config),
            ffprobe_path: config.ffprobe_path.clone(),
            runtime: tokio::runtime::Handle::current(),
            pending: Mutex::new(None),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// Launch the platform camera. Rejects without any state change when a
    /// request is already awaiting its external result, or when a
    /// precondition (capability, UI context, permissions) fails.
    pub fn launch_camera(
        &self,
        options: AcquisitionOptions,
    ) -> Result<ResponseFuture, AcquireError> {
        if !self.host.camera_available() {
            return Err(AcquireError::CameraUnavailable);
        }
        if !self.host.has_ui_context() {
            return Err(AcquireError::NoUiContext);
        }
        if !self.host.camera_permission_fulfilled() {
            return Err(AcquireError::CameraPermission(
                CAMERA_PERMISSION_MESSAGE.to_string(),
            ));
        }
        if options.save_to_public_storage
            && self.host.legacy_write_permission_required()
            && !self.host.write_permission_granted()
        {
            return Err(AcquireError::PermissionDenied(
                "write access to public storage denied".to_string(),
            ));
        }

        let is_video = options.media_type == MediaType::Video;
        let extension = if is_video { "mp4" } else { "jpg" };

        // Created before taking the lock so the critical section stays free
        // of filesystem work.
        let output = self.temp.create(extension).map_err(AcquireError::TempFile)?;

        let (ticket, rx) = {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            if pending.is_some() {
                drop(pending);
                TempStore::delete(&output);
                return Err(AcquireError::Busy);
            }

            let ticket = self.issue_ticket();
            let (tx, rx) = oneshot::channel();
            *pending = Some(PendingRequest {
                ticket,
                options: options.clone(),
                camera_output: Some(output.clone()),
                sender: tx,
            });
            (ticket, rx)
        };

        let action = if is_video {
            PlatformAction::CaptureVideo {
                output: output.clone(),
                front_camera: options.use_front_camera,
                quality: options.video_quality,
                duration_limit_secs: (options.duration_limit_secs > 0)
                    .then_some(options.duration_limit_secs),
            }
        } else {
            PlatformAction::CapturePhoto {
                output: output.clone(),
                front_camera: options.use_front_camera,
            }
        };

        tracing::debug!(ticket = ticket.0, video = is_video, "launching camera capture");
        if let Err(err) = self.launcher.launch(ticket, action) {
            self.clear_pending(ticket);
            TempStore::delete(&output);
            return Err(AcquireError::NoHandler(err.to_string()));
        }
        Ok(ResponseFuture { rx })
    }

    /// Launch the platform media picker, filtered by the configured media
    /// type and allowing multiple selection only when selectionLimit > 1.
    pub fn launch_pick_library(
        &self,
        options: AcquisitionOptions,
    ) -> Result<ResponseFuture, AcquireError> {
        if !self.host.has_ui_context() {
            return Err(AcquireError::NoUiContext);
        }

        let filter = match options.media_type {
            MediaType::Photo => MimeFilter::Images,
            MediaType::Video => MimeFilter::Videos,
            MediaType::Mixed => MimeFilter::ImagesAndVideos,
        };
        let action = PlatformAction::PickMedia {
            filter,
            allow_multiple: options.allows_multiple(),
        };

        let (ticket, rx) = {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            if pending.is_some() {
                return Err(AcquireError::Busy);
            }
            let ticket = self.issue_ticket();
            let (tx, rx) = oneshot::channel();
            *pending = Some(PendingRequest {
                ticket,
                options,
                camera_output: None,
                sender: tx,
            });
            (ticket, rx)
        };

        tracing::debug!(ticket = ticket.0, filter = ?filter, "launching library pick");
        if let Err(err) = self.launcher.launch(ticket, action) {
            self.clear_pending(ticket);
            return Err(AcquireError::NoHandler(err.to_string()));
        }
        Ok(ResponseFuture { rx })
    }

    /// Deliver the external action's result. Called by the host from the
    /// platform callback, on any thread. Results for unknown tickets are
    /// ignored; the matching pending request is consumed exactly once.
    pub fn handle_external_result(&self, ticket: RequestTicket, outcome: ExternalOutcome) {
        let pending = {
            let mut guard = self.pending.lock().expect("pending lock poisoned");
            match guard.as_ref() {
                Some(p) if p.ticket == ticket => guard.take(),
                _ => {
                    tracing::debug!(ticket = ticket.0, "ignoring result for unknown request");
                    return;
                }
            }
        };
        let Some(PendingRequest {
            options,
            camera_output,
            sender,
            ..
        }) = pending
        else {
            return;
        };

        let mut public_save = None;
        let uris = match outcome {
            ExternalOutcome::Cancelled | ExternalOutcome::Failed => {
                // Cancel is not an error: the envelope is always the
                // cancellation shape, and any capture temp file is removed.
                if let Some(output) = camera_output {
                    TempStore::delete(&output);
                }
                let _ = sender.send(ResponseEnvelope::cancelled());
                return;
            }
            ExternalOutcome::Success { uris } => match camera_output {
                Some(output) => {
                    if options.save_to_public_storage {
                        public_save = Some(self.public_save_job(&output, &options));
                    }
                    vec![MediaUri::from_path(output)]
                }
                None => uris,
            },
        };

        let ctx = AssembleContext {
            store: self.store.clone(),
            temp: self.temp.clone(),
            ffprobe_path: self.ffprobe_path.clone(),
        };
        self.runtime.spawn_blocking(move || {
            // The copy must finish before assembly, which may replace and
            // delete the capture file it reads from.
            if let Some(job) = public_save {
                job.run();
            }
            let envelope = match assemble_assets(uris, &options, &ctx) {
                Ok(assets) => ResponseEnvelope::assets(assets),
                Err(err) => {
                    tracing::warn!(error = %err, "asset processing failed");
                    err.into()
                }
            };
            let _ = sender.send(envelope);
        });
    }

    fn public_save_job(&self, output: &Path, options: &AcquisitionOptions) -> PublicSaveJob {
        let kind = if options.media_type == MediaType::Video {
            PublicKind::Video
        } else {
            PublicKind::Photo
        };
        let extension = output.extension().and_then(|e| e.to_str());
        let mime_type = extension.and_then(mime::mime_from_extension).map(str::to_string);
        let display_name = match extension {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        PublicSaveJob {
            store: self.store.clone(),
            source: output.to_path_buf(),
            kind,
            mime_type,
            display_name,
        }
    }

    fn issue_ticket(&self) -> RequestTicket {
        RequestTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed))
    }

    fn clear_pending(&self, ticket: RequestTicket) {
        let mut guard = self.pending.lock().expect("pending lock poisoned");
        if matches!(guard.as_ref(), Some(p) if p.ticket == ticket) {
            guard.take();
        }
    }
}
