use std::path::PathBuf;

use image::RgbaImage;
use thiserror::Error;

use crate::compositing::domain::frame_asset::{FrameAsset, FrameMeasurements};
use crate::shared::outcome::Outcome;

#[derive(Error, Debug)]
pub enum FrameAssetError {
    #[error("frame has no image reference")]
    MissingReference,
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode frame image {reference}: {source}")]
    Decode {
        reference: String,
        #[source]
        source: image::ImageError,
    },
}

/// Domain interface for retrieving a frame raster by reference (URL or path).
///
/// The raster must be fully loaded before returning; compositing never
/// blocks on I/O.
pub trait FrameImageSource: Send {
    fn fetch(&self, reference: &str) -> Result<RgbaImage, FrameAssetError>;
}

/// Loads one frame, substituting the opaque placeholder when it cannot be
/// fetched or decoded. Other frames are unaffected.
pub fn load_frame_asset(
    source: &dyn FrameImageSource,
    reference: &str,
    measurements: FrameMeasurements,
) -> Outcome<FrameAsset, FrameAssetError> {
    match source.fetch(reference) {
        Ok(raster) => Outcome::Fetched(FrameAsset::new(raster, measurements)),
        Err(cause) => {
            log::warn!("Frame image unavailable, using placeholder: {cause}");
            Outcome::Fallback {
                value: FrameAsset::placeholder(measurements),
                cause,
            }
        }
    }
}
