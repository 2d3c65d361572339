//! In-memory platform mocks for acquisition flow tests.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use mediapick_acquire::{
    ActionLauncher, ContentStore, HostEnvironment, LaunchError, PlatformAction, PublicKind,
    RequestTicket,
};

pub struct MockHost {
    pub camera: bool,
    pub ui: bool,
    pub camera_permission: bool,
    pub legacy_write: bool,
    pub write_granted: bool,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            camera: true,
            ui: true,
            camera_permission: true,
            legacy_write: false,
            write_granted: true,
        }
    }
}

impl HostEnvironment for MockHost {
    fn camera_available(&self) -> bool {
        self.camera
    }
    fn has_ui_context(&self) -> bool {
        self.ui
    }
    fn camera_permission_fulfilled(&self) -> bool {
        self.camera_permission
    }
    fn legacy_write_permission_required(&self) -> bool {
        self.legacy_write
    }
    fn write_permission_granted(&self) -> bool {
        self.write_granted
    }
}

#[derive(Clone, Default)]
pub struct ContentEntry {
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
    pub display_name: Option<String>,
    pub original_path: Option<String>,
}

/// One completed public-storage copy, with the bytes read from the source
/// at copy time.
pub struct SavedPublic {
    pub source: PathBuf,
    pub display_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct MockStore {
    pub entries: HashMap<String, ContentEntry>,
    pub saved_public: Mutex<Vec<SavedPublic>>,
}

impl MockStore {
    pub fn with_entry(mut self, uri: &str, entry: ContentEntry) -> Self {
        self.entries.insert(uri.to_string(), entry);
        self
    }
}

impl ContentStore for MockStore {
    fn open(&self, uri: &str) -> std::io::Result<Box<dyn Read + Send>> {
        match self.entries.get(uri) {
            Some(entry) => Ok(Box::new(Cursor::new(entry.bytes.clone()))),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no content at {uri}"),
            )),
        }
    }

    fn mime_type(&self, uri: &str) -> Option<String> {
        self.entries.get(uri)?.mime.clone()
    }

    fn display_name(&self, uri: &str) -> Option<String> {
        self.entries.get(uri)?.display_name.clone()
    }

    fn original_path(&self, uri: &str) -> Option<String> {
        self.entries.get(uri)?.original_path.clone()
    }

    fn save_to_public_storage(
        &self,
        source: &Path,
        _kind: PublicKind,
        _mime_type: Option<&str>,
        display_name: &str,
    ) -> anyhow::Result<()> {
        // Read like a real copy would: a vanished source must fail.
        let bytes = std::fs::read(source)?;
        self.saved_public.lock().unwrap().push(SavedPublic {
            source: source.to_path_buf(),
            display_name: display_name.to_string(),
            bytes,
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLauncher {
    pub launched: Mutex<Vec<(RequestTicket, PlatformAction)>>,
    pub fail: AtomicBool,
}

impl MockLauncher {
    pub fn last(&self) -> (RequestTicket, PlatformAction) {
        self.launched
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("nothing launched")
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl ActionLauncher for MockLauncher {
    fn launch(&self, ticket: RequestTicket, action: PlatformAction) -> Result<(), LaunchError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LaunchError::NoHandler("mock action".to_string()));
        }
        self.launched.lock().unwrap().push((ticket, action));
        Ok(())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    buffer
}
