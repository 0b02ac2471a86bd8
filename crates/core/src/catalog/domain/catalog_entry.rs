use serde::{Deserialize, Serialize};

use crate::classification::domain::face_shape::FrameStyle;
use crate::compositing::domain::frame_asset::FrameMeasurements;

/// One purchasable frame as listed by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCatalogEntry {
    pub name: String,
    /// URL or local path of the frame raster; may be empty.
    pub image_url: String,
    /// Display price as the store formats it.
    pub price: String,
    /// Purchase link.
    pub url: String,
    #[serde(default)]
    pub style: FrameStyle,
    #[serde(default)]
    pub measurements: FrameMeasurements,
}

impl FrameCatalogEntry {
    pub fn new(
        name: impl Into<String>,
        image_url: impl Into<String>,
        price: impl Into<String>,
        url: impl Into<String>,
        style: FrameStyle,
    ) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
            price: price.into(),
            url: url.into(),
            style,
            measurements: FrameMeasurements::default(),
        }
    }

    pub fn with_measurements(mut self, measurements: FrameMeasurements) -> Self {
        self.measurements = measurements;
        self
    }

    /// Lowercase ASCII file-name stem built from the name: runs of anything
    /// that is not a letter or digit collapse into a single `-`.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            slug.push_str("frame");
        }
        slug
    }
}
