use image::RgbaImage;

use crate::classification::domain::face_geometry::EyeGeometry;
use crate::compositing::domain::frame_asset::FrameAsset;
use crate::compositing::domain::placement_policy::PlacementMode;
use crate::shared::placement::Placement;

/// A face with one frame blended in, plus where the frame went.
#[derive(Clone, Debug)]
pub struct CompositeResult {
    pub image: RgbaImage,
    /// Visible part of the frame, clamped to the canvas.
    pub placement: Placement,
    pub scale: f64,
    pub mode: PlacementMode,
}

/// Domain interface for overlaying a frame onto a face.
///
/// Implementations return a new image of the face's dimensions and never
/// modify `face`.
pub trait FrameCompositor: Send {
    fn composite(
        &self,
        face: &RgbaImage,
        frame: &FrameAsset,
        eyes: Option<&EyeGeometry>,
    ) -> CompositeResult;
}
