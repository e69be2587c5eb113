/// Detection service HTTP client.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::{DetectError, DetectResult};
use crate::config::AppConfig;
use crate::state::data::SelectedImage;

/// Name of the multipart field the service reads the upload from
pub const IMAGE_FIELD: &str = "image";

/// Largest slice of an error body copied into the debug log
const LOGGED_BODY_LIMIT: usize = 512;

/// Posts images to the detection endpoint and returns the processed image.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct DetectClient {
    http: Client,
    endpoint: Url,
}

impl DetectClient {
    pub fn new(config: &AppConfig) -> DetectResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload one image and return the full response body.
    ///
    /// A non-success status is an error regardless of what the body holds.
    pub async fn detect(&self, image: SelectedImage) -> DetectResult<Vec<u8>> {
        let SelectedImage {
            file_name,
            mime_type,
            bytes,
        } = image;

        debug!(
            endpoint = %self.endpoint,
            file_name = %file_name,
            bytes = bytes.len(),
            "Sending detection request"
        );

        let part = Part::bytes(bytes).file_name(file_name).mime_str(&mime_type)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(
                %status,
                body = %truncate(&body, LOGGED_BODY_LIMIT),
                "Detection service rejected request"
            );
            return Err(DetectError::Rejected(status));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
