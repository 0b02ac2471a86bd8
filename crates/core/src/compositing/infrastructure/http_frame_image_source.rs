use std::path::PathBuf;
use std::time::Duration;

use image::RgbaImage;

use crate::compositing::domain::frame_image_source::{FrameAssetError, FrameImageSource};

/// Fetches `http(s)` references over the network and reads anything else
/// from the local filesystem. Every raster is converted to RGBA.
pub struct HttpFrameImageSource {
    client: reqwest::blocking::Client,
}

impl HttpFrameImageSource {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, FrameAssetError> {
        let request_error = |source| FrameAssetError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(request_error)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FrameAssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}

impl FrameImageSource for HttpFrameImageSource {
    fn fetch(&self, reference: &str) -> Result<RgbaImage, FrameAssetError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(FrameAssetError::MissingReference);
        }

        let bytes = if is_remote(reference) {
            self.fetch_remote(reference)?
        } else {
            let path = PathBuf::from(reference);
            std::fs::read(&path).map_err(|source| FrameAssetError::Read { path, source })?
        };

        let decoded =
            image::load_from_memory(&bytes).map_err(|source| FrameAssetError::Decode {
                reference: reference.to_string(),
                source,
            })?;
        Ok(decoded.to_rgba8())
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
