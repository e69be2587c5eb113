/// Data carried by the detection view
///
/// These structs hold the image the user picked and the image the
/// detection service sent back.

use chrono::{DateTime, Local};
use iced::widget::image::Handle;
use image::ImageFormat;
use std::path::Path;

/// MIME type used when the extension names no known image format
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// An image file chosen through the picker, read fully into memory
#[derive(Clone, PartialEq)]
pub struct SelectedImage {
    /// Filename only (e.g., "street.jpg")
    pub file_name: String,
    /// MIME type derived from the extension
    pub mime_type: String,
    /// Raw file content, sent as-is
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    /// Build from a file name and its content. Content is not inspected.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

/// Guess the MIME type of a file from its extension
pub fn mime_for(file_name: &str) -> &'static str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// A processed image returned by a successful detection call
///
/// The handle owns the only copy of the response body, so replacing or
/// dropping this value releases the image.
#[derive(Clone)]
pub struct ProcessedImage {
    /// Handle the image widget draws from
    pub handle: Handle,
    /// Generation of the request that produced this image
    pub generation: u64,
    pub received_at: DateTime<Local>,
}

impl ProcessedImage {
    pub fn new(bytes: Vec<u8>, generation: u64) -> Self {
        Self {
            handle: Handle::from_bytes(bytes),
            generation,
            received_at: Local::now(),
        }
    }

    /// Response body, exactly as received
    pub fn bytes(&self) -> &[u8] {
        match &self.handle {
            Handle::Bytes(_, bytes) => &bytes[..],
            _ => &[],
        }
    }
}

// Skip the byte buffers in debug output
impl std::fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl std::fmt::Debug for ProcessedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedImage")
            .field("generation", &self.generation)
            .field("len", &self.bytes().len())
            .field("received_at", &self.received_at)
            .finish()
    }
}
