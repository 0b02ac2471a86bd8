//! Face shape heuristics.
//!
//! The landmark and bounding-box rules use different ratios (height/width vs.
//! width/height) and different label sets; the configured [`ShapePolicy`]
//! picks which one a detection goes through. Without any detector, the image
//! aspect ratio is the only evidence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::face_geometry::{FaceBox, FaceDetection, FaceLandmarks};
use super::face_shape::FaceShapeLabel;

/// Face height / eye span above which a face is oblong.
pub const LANDMARK_OBLONG_RATIO: f64 = 1.5;
/// Face height / eye span below which a face is round.
pub const LANDMARK_ROUND_RATIO: f64 = 1.1;

/// Box width / height above which a face is oval.
pub const BOX_OVAL_RATIO: f64 = 0.8;
/// Box width / height below which a face is round.
pub const BOX_ROUND_RATIO: f64 = 0.7;

/// Image width / height above which a face is taken as oval.
pub const DIMENSION_OVAL_RATIO: f64 = 0.9;
/// Image width / height below which a face is taken as round.
pub const DIMENSION_ROUND_RATIO: f64 = 0.75;

/// Which detector geometry drives classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapePolicy {
    #[default]
    Landmarks,
    BoundingBox,
}

impl fmt::Display for ShapePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapePolicy::Landmarks => write!(f, "landmarks"),
            ShapePolicy::BoundingBox => write!(f, "bounding-box"),
        }
    }
}

impl FromStr for ShapePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landmarks" => Ok(ShapePolicy::Landmarks),
            "bounding-box" | "box" => Ok(ShapePolicy::BoundingBox),
            other => Err(format!(
                "shape policy must be 'landmarks' or 'bounding-box', got '{other}'"
            )),
        }
    }
}

/// What the caller knows about the face before classifying.
#[derive(Debug, Clone, Copy)]
pub enum FaceEvidence<'a> {
    Detected(&'a FaceDetection),
    NoFaceDetected,
    DetectorFailed,
    DetectorUnavailable,
}

/// Why a classification ended on the default label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    NoFaceDetected,
    DetectorFailed,
    InsufficientGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    Landmarks,
    BoundingBox,
    ImageDimensions,
    Default(DefaultReason),
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationSource::Landmarks => write!(f, "landmarks"),
            ClassificationSource::BoundingBox => write!(f, "bounding box"),
            ClassificationSource::ImageDimensions => write!(f, "image dimensions"),
            ClassificationSource::Default(DefaultReason::NoFaceDetected) => {
                write!(f, "default (no face detected)")
            }
            ClassificationSource::Default(DefaultReason::DetectorFailed) => {
                write!(f, "default (detector failed)")
            }
            ClassificationSource::Default(DefaultReason::InsufficientGeometry) => {
                write!(f, "default (insufficient geometry)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: FaceShapeLabel,
    pub source: ClassificationSource,
}

impl Classification {
    fn fallback(reason: DefaultReason) -> Self {
        Self {
            label: FaceShapeLabel::default(),
            source: ClassificationSource::Default(reason),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self.source, ClassificationSource::Default(_))
    }
}

/// Landmark rule: forehead-to-chin height over eye span, both in pixels.
///
/// Returns `None` when forehead/chin are missing or the span is degenerate.
pub fn classify_landmarks(
    landmarks: &FaceLandmarks,
    image_width: u32,
    image_height: u32,
) -> Option<FaceShapeLabel> {
    let height = landmarks.face_height_px(image_height)?;
    let width = landmarks.eye_span_px(image_width);
    let ratio = positive_ratio(height, width)?;

    Some(if ratio > LANDMARK_OBLONG_RATIO {
        FaceShapeLabel::Oblong
    } else if ratio < LANDMARK_ROUND_RATIO {
        FaceShapeLabel::Rond
    } else {
        FaceShapeLabel::Ovaal
    })
}

/// Bounding-box rule: box width over box height.
pub fn classify_bounding_box(face_box: &FaceBox) -> Option<FaceShapeLabel> {
    let ratio = positive_ratio(face_box.width, face_box.height)?;
    Some(if ratio > BOX_OVAL_RATIO {
        FaceShapeLabel::Ovaal
    } else if ratio < BOX_ROUND_RATIO {
        FaceShapeLabel::Rond
    } else {
        FaceShapeLabel::Rechthoekig
    })
}

/// Dimension rule: the whole image aspect ratio stands in for the face.
pub fn classify_dimensions(image_width: u32, image_height: u32) -> Option<FaceShapeLabel> {
    let ratio = positive_ratio(f64::from(image_width), f64::from(image_height))?;
    Some(if ratio > DIMENSION_OVAL_RATIO {
        FaceShapeLabel::Ovaal
    } else if ratio < DIMENSION_ROUND_RATIO {
        FaceShapeLabel::Rond
    } else {
        FaceShapeLabel::Rechthoekig
    })
}

fn positive_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if !(numerator.is_finite() && denominator.is_finite()) || numerator <= 0.0 || denominator <= 0.0
    {
        return None;
    }
    Some(numerator / denominator)
}

/// Classifies a face from whatever evidence is available, never failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceShapeClassifier {
    policy: ShapePolicy,
}

impl FaceShapeClassifier {
    pub fn new(policy: ShapePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ShapePolicy {
        self.policy
    }

    pub fn classify(
        &self,
        evidence: FaceEvidence<'_>,
        image_width: u32,
        image_height: u32,
    ) -> Classification {
        match evidence {
            FaceEvidence::Detected(detection) => {
                self.classify_detection(detection, image_width, image_height)
            }
            FaceEvidence::NoFaceDetected => Classification::fallback(DefaultReason::NoFaceDetected),
            FaceEvidence::DetectorFailed => Classification::fallback(DefaultReason::DetectorFailed),
            FaceEvidence::DetectorUnavailable => match classify_dimensions(image_width, image_height)
            {
                Some(label) => Classification {
                    label,
                    source: ClassificationSource::ImageDimensions,
                },
                None => Classification::fallback(DefaultReason::InsufficientGeometry),
            },
        }
    }

    /// Uses the policy's geometry first; a detection carrying only the other
    /// kind of geometry goes through that kind's rule instead.
    fn classify_detection(
        &self,
        detection: &FaceDetection,
        image_width: u32,
        image_height: u32,
    ) -> Classification {
        let by_landmarks = || {
            detection
                .landmarks
                .as_ref()
                .and_then(|lm| classify_landmarks(lm, image_width, image_height))
                .map(|label| Classification {
                    label,
                    source: ClassificationSource::Landmarks,
                })
        };
        let by_box = || {
            detection
                .bounding_box
                .as_ref()
                .and_then(classify_bounding_box)
                .map(|label| Classification {
                    label,
                    source: ClassificationSource::BoundingBox,
                })
        };

        let result = match self.policy {
            ShapePolicy::Landmarks => by_landmarks().or_else(by_box),
            ShapePolicy::BoundingBox => by_box().or_else(by_landmarks),
        };
        result.unwrap_or_else(|| {
            log::debug!("Face geometry too sparse to classify; using default label");
            Classification::fallback(DefaultReason::InsufficientGeometry)
        })
    }
}
