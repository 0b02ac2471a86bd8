//! Where and how large a frame lands on a face.
//!
//! Two rules:
//! - **Eye geometry**: scale from the eye span against the lens width,
//!   capped by the eye tilt term, anchored on the eye midpoint and biased
//!   upward by a third of the frame height so it covers the brow line.
//! - **Face dimensions**: without eyes, the frame covers a fixed share of the
//!   face width, centered horizontally at a fixed height.
//!
//! An eye-geometry scale that is not positive and finite (level eyes make
//! the tilt term zero) drops to the face-dimension rule.

use serde::{Deserialize, Serialize};

use crate::classification::domain::face_geometry::EyeGeometry;
use crate::compositing::domain::frame_asset::FrameMeasurements;
use crate::shared::constants::{
    BRIDGE_OFFSET_RATIO, FACE_WIDTH_RATIO, MIN_LENS_WIDTH_MM, VERTICAL_POSITION_RATIO,
};
use crate::shared::placement::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    EyeGeometry,
    FaceDimensions,
}

/// Scale and unclamped rectangle for one frame on one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlacement {
    pub scale: f64,
    pub placement: Placement,
    pub mode: PlacementMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementPolicy {
    /// Share of the face width a frame covers without eye geometry (K).
    pub face_width_ratio: f64,
    /// Frame top as a share of face height without eye geometry (V).
    pub vertical_position_ratio: f64,
    /// Floor for the lens width in any scale computation, in millimeters.
    pub min_lens_width_mm: f64,
    /// Share of the scaled bridge that shifts the frame off the eye midpoint.
    pub bridge_offset_ratio: f64,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            face_width_ratio: FACE_WIDTH_RATIO,
            vertical_position_ratio: VERTICAL_POSITION_RATIO,
            min_lens_width_mm: MIN_LENS_WIDTH_MM,
            bridge_offset_ratio: BRIDGE_OFFSET_RATIO,
        }
    }
}

impl PlacementPolicy {
    pub fn lens_width(&self, measurements: &FrameMeasurements) -> f64 {
        measurements.lens_width_at_least(self.min_lens_width_mm.max(f64::MIN_POSITIVE))
    }

    /// `min(eye_width / lens_width, eye_height / (eye_height + bridge / 2))`.
    pub fn eye_scale(&self, eyes: &EyeGeometry, measurements: &FrameMeasurements) -> f64 {
        let eye_width = eyes.width();
        let eye_height = eyes.height();
        let span_scale = eye_width / self.lens_width(measurements);
        let tilt_scale = eye_height / (eye_height + measurements.bridge_mm() / 2.0);
        span_scale.min(tilt_scale)
    }

    /// `face_width * K / max(lens_width, floor)`.
    pub fn dimension_scale(&self, face_width: u32, measurements: &FrameMeasurements) -> f64 {
        f64::from(face_width) * self.face_width_ratio / self.lens_width(measurements)
    }

    pub fn place(
        &self,
        face_size: (u32, u32),
        frame_size: (u32, u32),
        measurements: &FrameMeasurements,
        eyes: Option<&EyeGeometry>,
    ) -> FramePlacement {
        if let Some(eyes) = eyes {
            let scale = self.eye_scale(eyes, measurements);
            if scale.is_finite() && scale > 0.0 {
                return self.place_on_eyes(frame_size, measurements, eyes, scale);
            }
            log::debug!(
                "Eye geometry gives unusable scale {scale}; placing by face dimensions"
            );
        }
        self.place_on_face(face_size, frame_size, measurements)
    }

    fn place_on_eyes(
        &self,
        frame_size: (u32, u32),
        measurements: &FrameMeasurements,
        eyes: &EyeGeometry,
        scale: f64,
    ) -> FramePlacement {
        let (width, height) = scaled_size(frame_size, scale);
        let bridge_offset = measurements.bridge_mm() * scale * self.bridge_offset_ratio;
        let x = eyes.mid_x() - (f64::from(width) / 2.0 - bridge_offset);
        let y = eyes.left.y - f64::from(height) / 3.0;

        FramePlacement {
            scale,
            placement: Placement::new(to_coord(x), to_coord(y), width, height),
            mode: PlacementMode::EyeGeometry,
        }
    }

    fn place_on_face(
        &self,
        face_size: (u32, u32),
        frame_size: (u32, u32),
        measurements: &FrameMeasurements,
    ) -> FramePlacement {
        let (face_width, face_height) = face_size;
        let scale = self.dimension_scale(face_width, measurements);
        let scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
        let (width, height) = scaled_size(frame_size, scale);
        let x = (i64::from(face_width) - i64::from(width)).div_euclid(2);
        let y = f64::from(face_height) * self.vertical_position_ratio;

        FramePlacement {
            scale,
            placement: Placement::new(
                x.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
                to_coord(y),
                width,
                height,
            ),
            mode: PlacementMode::FaceDimensions,
        }
    }
}

/// Each dimension is scaled and rounded on its own.
fn scaled_size((width, height): (u32, u32), scale: f64) -> (u32, u32) {
    let scale_dim = |d: u32| (f64::from(d) * scale).round().clamp(0.0, f64::from(u32::MAX)) as u32;
    (scale_dim(width), scale_dim(height))
}

fn to_coord(value: f64) -> i32 {
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
