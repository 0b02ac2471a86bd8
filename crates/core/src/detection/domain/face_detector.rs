use image::RgbaImage;

use crate::classification::domain::face_geometry::FaceDetection;

/// Domain interface for face detection.
///
/// `Ok(None)` means the detector ran and found no face; `Err` means it could
/// not run at all. Callers recover from both. Implementations may keep
/// state between calls, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        image: &RgbaImage,
    ) -> Result<Option<FaceDetection>, Box<dyn std::error::Error>>;
}
