use rfd::AsyncFileDialog;
use std::path::Path;
use tracing::warn;

use crate::state::data::SelectedImage;

/// Extensions offered by the picker. Advisory only: the dialog still lets
/// the user pick any file.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico",
];

/// Show the native file picker and read the chosen file
/// Returns None if the user cancelled or the file could not be read
pub async fn pick_image() -> Option<SelectedImage> {
    let handle = AsyncFileDialog::new()
        .set_title("Select an Image")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
        .await?;

    read_image(handle.path()).await
}

/// Read a file from disk into a `SelectedImage`
/// The content is not checked; any readable file is accepted
pub async fn read_image(path: &Path) -> Option<SelectedImage> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    match tokio::fs::read(path).await {
        Ok(bytes) => Some(SelectedImage::new(file_name, bytes)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read selected file");
            None
        }
    }
}
