// Shared fakes for the resize flow tests
#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use image_resizer::resizer::{
    ClipboardImage, ClipboardSink, CompletionNotifier, DirectoryRevealer, OutputRouter,
    ResizeError, ResizeRequestPayload,
};

#[derive(Default)]
pub struct RecordingClipboard {
    pub images: Mutex<Vec<ClipboardImage>>,
    pub fail_with: Option<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn write_image(&self, image: ClipboardImage) -> Result<(), ResizeError> {
        if let Some(message) = &self.fail_with {
            return Err(ResizeError::ClipboardUnavailable(message.clone()));
        }
        self.images.lock().unwrap().push(image);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRevealer {
    pub revealed: Mutex<Vec<PathBuf>>,
    pub fail: bool,
}

impl DirectoryRevealer for RecordingRevealer {
    fn reveal(&self, dir: &Path) -> Result<(), ResizeError> {
        self.revealed.lock().unwrap().push(dir.to_path_buf());
        if self.fail {
            return Err(ResizeError::Write("no file manager".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Done,
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub signals: Mutex<Vec<Signal>>,
}

impl RecordingNotifier {
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().unwrap().clone()
    }
}

impl CompletionNotifier for RecordingNotifier {
    fn done(&self) {
        self.signals.lock().unwrap().push(Signal::Done);
    }

    fn error(&self, message: &str) {
        self.signals.lock().unwrap().push(Signal::Error(message.to_string()));
    }
}

pub struct Harness {
    pub root: tempfile::TempDir,
    pub output_dir: PathBuf,
    pub clipboard: Arc<RecordingClipboard>,
    pub revealer: Arc<RecordingRevealer>,
    pub notifier: RecordingNotifier,
    pub router: OutputRouter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_fakes(RecordingClipboard::default(), RecordingRevealer::default())
    }

    pub fn with_fakes(clipboard: RecordingClipboard, revealer: RecordingRevealer) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let output_dir = root.path().join("imageresizer");
        let clipboard = Arc::new(clipboard);
        let revealer = Arc::new(revealer);
        let router = OutputRouter::new(
            output_dir.clone(),
            clipboard.clone() as Arc<dyn ClipboardSink>,
            revealer.clone() as Arc<dyn DirectoryRevealer>,
        );
        Self {
            root,
            output_dir,
            clipboard,
            revealer,
            notifier: RecordingNotifier::default(),
            router,
        }
    }

    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.output_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, ((x * 3 + y) % 255) as u8, 255])
    });
    let dyn_img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };
    let mut cursor = Cursor::new(Vec::new());
    dyn_img
        .write_to(&mut cursor, format)
        .expect("failed to encode test image");
    cursor.into_inner()
}

pub fn payload(value: serde_json::Value) -> ResizeRequestPayload {
    serde_json::from_value(value).expect("payload should deserialize")
}
