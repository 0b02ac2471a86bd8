use image::RgbaImage;

use crate::classification::domain::face_geometry::FaceDetection;
use crate::detection::domain::face_detector::FaceDetector;

/// Replays geometry supplied up front instead of running a model.
///
/// Used when landmarks come from outside the process (an upstream detector,
/// a UI where the user marked their eyes, or CLI flags). `None` replays
/// "no face detected" for every image.
pub struct FixedFaceDetector {
    detection: Option<FaceDetection>,
}

impl FixedFaceDetector {
    pub fn new(detection: Option<FaceDetection>) -> Self {
        Self { detection }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect(
        &mut self,
        _image: &RgbaImage,
    ) -> Result<Option<FaceDetection>, Box<dyn std::error::Error>> {
        Ok(self.detection.clone())
    }
}
