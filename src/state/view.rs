/// State behind the upload-and-detect window
///
/// Everything here is independent of the GUI toolkit's runtime so the
/// select/submit/resolve flow can be driven directly in tests. The
/// application feeds it picker results and finished requests as they
/// arrive.

use tracing::{debug, error, info, warn};

use super::data::{ProcessedImage, SelectedImage};
use crate::config::ResponseOrder;
use crate::detect::{DetectError, DetectResult, ErrorKind};

/// A detection call ready to be sent
#[derive(Debug, Clone)]
pub struct DetectionRequest {
    /// Increases by one for every accepted submit
    pub generation: u64,
    /// Snapshot of the selection at submit time
    pub image: SelectedImage,
}

#[derive(Debug)]
pub struct DetectView {
    selected_image: Option<SelectedImage>,
    processed_image: Option<ProcessedImage>,
    /// Last error kind surfaced to the user, cleared by the next success
    notice: Option<ErrorKind>,
    response_order: ResponseOrder,
    next_generation: u64,
    in_flight: usize,
}

impl DetectView {
    pub fn new(response_order: ResponseOrder) -> Self {
        Self {
            selected_image: None,
            processed_image: None,
            notice: None,
            response_order,
            next_generation: 1,
            in_flight: 0,
        }
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.selected_image.as_ref()
    }

    pub fn processed_image(&self) -> Option<&ProcessedImage> {
        self.processed_image.as_ref()
    }

    pub fn notice(&self) -> Option<ErrorKind> {
        self.notice
    }

    /// Number of submitted requests that have not resolved yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply the outcome of the file picker. `None` means the picker was
    /// cancelled and leaves everything as it was.
    pub fn select_file(&mut self, file: Option<SelectedImage>) {
        let Some(file) = file else {
            debug!("File selection cancelled");
            return;
        };

        info!(
            file_name = %file.file_name,
            mime_type = %file.mime_type,
            bytes = file.bytes.len(),
            "Image selected"
        );
        self.selected_image = Some(file);
        self.notice = None;
    }

    /// Start a detection call for the current selection.
    ///
    /// Fails with [`DetectError::MissingInput`] when nothing is selected, in
    /// which case no request must be sent.
    pub fn begin_detection(&mut self) -> DetectResult<DetectionRequest> {
        let Some(image) = self.selected_image.clone() else {
            warn!("Detection requested without a selected image");
            self.notice = Some(ErrorKind::MissingInput);
            return Err(DetectError::MissingInput);
        };

        let generation = self.next_generation;
        self.next_generation += 1;
        self.in_flight += 1;

        if self.in_flight > 1 {
            debug!(generation, in_flight = self.in_flight, "Overlapping detection requests");
        }

        Ok(DetectionRequest { generation, image })
    }

    /// Apply a finished detection call. Returns the error kind to surface,
    /// if any.
    pub fn finish_detection(
        &mut self,
        generation: u64,
        result: DetectResult<Vec<u8>>,
    ) -> Option<ErrorKind> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match result {
            Ok(bytes) => {
                if self.is_stale(generation) {
                    info!(generation, "Dropping result of an older detection request");
                    return None;
                }

                info!(generation, bytes = bytes.len(), "Detection succeeded");
                self.processed_image = Some(ProcessedImage::new(bytes, generation));
                self.notice = None;
                None
            }
            Err(err) => {
                error!(generation, error = %err, "Failed to detect objects");
                let kind = err.kind();
                self.notice = Some(kind);
                Some(kind)
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        match (self.response_order, &self.processed_image) {
            (ResponseOrder::LatestRequest, Some(current)) => current.generation > generation,
            _ => false,
        }
    }

    /// One line describing where the view stands, for the status text
    pub fn status_line(&self) -> String {
        if let Some(kind) = self.notice {
            return kind.user_message().to_string();
        }
        if self.in_flight > 0 {
            return format!("Detecting objects ({} pending)...", self.in_flight);
        }
        match &self.processed_image {
            Some(processed) => format!(
                "Processed image received at {}",
                processed.received_at.format("%H:%M:%S")
            ),
            None => "Ready.".to_string(),
        }
    }
}

impl Default for DetectView {
    fn default() -> Self {
        Self::new(ResponseOrder::default())
    }
}
