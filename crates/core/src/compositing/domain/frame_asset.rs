use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_BRIDGE_MM, DEFAULT_LENS_WIDTH_MM, DEFAULT_TEMPLE_MM, PLACEHOLDER_COLOR,
    PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH,
};

/// Physical frame dimensions in millimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameMeasurements {
    pub lens_width: f64,
    #[serde(default)]
    pub bridge: Option<f64>,
    #[serde(default)]
    pub temple: Option<f64>,
}

impl Default for FrameMeasurements {
    fn default() -> Self {
        Self {
            lens_width: DEFAULT_LENS_WIDTH_MM,
            bridge: Some(DEFAULT_BRIDGE_MM),
            temple: Some(DEFAULT_TEMPLE_MM),
        }
    }
}

impl FrameMeasurements {
    /// Lens width clamped to `floor`; non-finite widths clamp too.
    pub fn lens_width_at_least(&self, floor: f64) -> f64 {
        if self.lens_width.is_finite() {
            self.lens_width.max(floor)
        } else {
            floor
        }
    }

    pub fn bridge_mm(&self) -> f64 {
        self.bridge
            .filter(|b| b.is_finite() && *b >= 0.0)
            .unwrap_or(DEFAULT_BRIDGE_MM)
    }

    pub fn temple_mm(&self) -> f64 {
        self.temple
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_TEMPLE_MM)
    }
}

/// A frame raster (always RGBA) with its physical measurements.
#[derive(Clone, Debug)]
pub struct FrameAsset {
    raster: RgbaImage,
    measurements: FrameMeasurements,
}

impl FrameAsset {
    pub fn new(raster: RgbaImage, measurements: FrameMeasurements) -> Self {
        Self {
            raster,
            measurements,
        }
    }

    /// Opaque black rectangle shown in place of a frame image that could
    /// not be loaded; scaled and placed like a real asset.
    pub fn placeholder(measurements: FrameMeasurements) -> Self {
        Self::new(
            RgbaImage::from_pixel(
                PLACEHOLDER_WIDTH,
                PLACEHOLDER_HEIGHT,
                Rgba(PLACEHOLDER_COLOR),
            ),
            measurements,
        )
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn measurements(&self) -> &FrameMeasurements {
        &self.measurements
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }
}
