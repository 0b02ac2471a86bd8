use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbaImage;

use crate::catalog::domain::catalog_entry::FrameCatalogEntry;
use crate::classification::domain::face_geometry::{EyeGeometry, FaceDetection};
use crate::classification::domain::face_shape_classifier::{
    Classification, FaceEvidence, FaceShapeClassifier,
};
use crate::compositing::domain::frame_compositor::{CompositeResult, FrameCompositor};
use crate::compositing::domain::frame_image_source::{
    load_frame_asset, FrameAssetError, FrameImageSource,
};
use crate::detection::domain::face_detector::FaceDetector;
use crate::imaging::domain::image_writer::{display_size, ImageWriter};
use crate::pipeline::frame_ranker::rank_frames;
use crate::pipeline::try_on_logger::TryOnLogger;
use crate::shared::outcome::Outcome;

/// One frame tried on the face.
#[derive(Debug)]
pub struct TryOnResult {
    pub entry: FrameCatalogEntry,
    pub composite: CompositeResult,
    /// Why the placeholder stood in for the frame image, if it did.
    pub placeholder_cause: Option<FrameAssetError>,
}

impl TryOnResult {
    pub fn used_placeholder(&self) -> bool {
        self.placeholder_cause.is_some()
    }
}

#[derive(Debug)]
pub struct TryOnReport {
    pub classification: Classification,
    /// Eye centers in face pixels, when the detector found landmarks.
    pub eyes: Option<EyeGeometry>,
    pub results: Vec<TryOnResult>,
}

/// Try-on pipeline: detect → classify → rank → load frames → composite.
///
/// Never fails: detector errors, missing geometry and unreachable frame
/// images all have a local recovery that the report records.
pub struct TryOnUseCase {
    detector: Option<Box<dyn FaceDetector>>,
    classifier: FaceShapeClassifier,
    frame_source: Box<dyn FrameImageSource>,
    compositor: Box<dyn FrameCompositor>,
    logger: Box<dyn TryOnLogger>,
    max_frames: usize,
}

impl TryOnUseCase {
    pub fn new(
        detector: Option<Box<dyn FaceDetector>>,
        classifier: FaceShapeClassifier,
        frame_source: Box<dyn FrameImageSource>,
        compositor: Box<dyn FrameCompositor>,
        logger: Box<dyn TryOnLogger>,
        max_frames: usize,
    ) -> Self {
        Self {
            detector,
            classifier,
            frame_source,
            compositor,
            logger,
            max_frames,
        }
    }

    /// Classifies the face only.
    pub fn classify(&mut self, face: &RgbaImage) -> Classification {
        let detection = self.detect(face);
        self.classify_detection(face, &detection)
    }

    pub fn execute(&mut self, face: &RgbaImage, catalog: &[FrameCatalogEntry]) -> TryOnReport {
        let detection = self.detect(face);
        let classification = self.classify_detection(face, &detection);
        self.logger.info(&format!(
            "Face shape: {} ({})",
            classification.label, classification.source
        ));

        let eyes = match &detection {
            Detection::Found(found) => found
                .landmarks
                .as_ref()
                .map(|lm| lm.eye_geometry(face.width(), face.height())),
            _ => None,
        };

        let mut ranked = rank_frames(catalog, classification.label);
        ranked.truncate(self.max_frames);
        let total = ranked.len();

        let mut results = Vec::with_capacity(total);
        for (i, entry) in ranked.into_iter().enumerate() {
            self.logger.progress(i + 1, total);

            let t0 = Instant::now();
            let outcome = load_frame_asset(
                self.frame_source.as_ref(),
                &entry.image_url,
                entry.measurements,
            );
            self.logger
                .timing("fetch", t0.elapsed().as_secs_f64() * 1000.0);

            let (asset, placeholder_cause) = match outcome {
                Outcome::Fetched(asset) => (asset, None),
                Outcome::Fallback { value, cause } => {
                    self.logger.placeholder_used(&entry.name);
                    (value, Some(cause))
                }
            };

            let t0 = Instant::now();
            let composite = self.compositor.composite(face, &asset, eyes.as_ref());
            self.logger
                .timing("composite", t0.elapsed().as_secs_f64() * 1000.0);

            results.push(TryOnResult {
                entry,
                composite,
                placeholder_cause,
            });
        }

        self.logger.summary();
        TryOnReport {
            classification,
            eyes,
            results,
        }
    }

    fn detect(&mut self, face: &RgbaImage) -> Detection {
        let Some(detector) = self.detector.as_mut() else {
            return Detection::Unavailable;
        };
        let t0 = Instant::now();
        let detection = match detector.detect(face) {
            Ok(Some(found)) => Detection::Found(found),
            Ok(None) => {
                log::info!("No face detected");
                Detection::NotFound
            }
            Err(e) => {
                log::warn!("Face detection failed: {e}");
                Detection::Failed
            }
        };
        self.logger
            .timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
        detection
    }

    fn classify_detection(&self, face: &RgbaImage, detection: &Detection) -> Classification {
        let evidence = match detection {
            Detection::Found(found) => FaceEvidence::Detected(found),
            Detection::NotFound => FaceEvidence::NoFaceDetected,
            Detection::Failed => FaceEvidence::DetectorFailed,
            Detection::Unavailable => FaceEvidence::DetectorUnavailable,
        };
        let classification = self.classifier.classify(evidence, face.width(), face.height());
        log::debug!(
            "Classified {}x{} face as {} from {}",
            face.width(),
            face.height(),
            classification.label,
            classification.source
        );
        classification
    }
}

enum Detection {
    Found(FaceDetection),
    NotFound,
    Failed,
    Unavailable,
}

/// File name for the `index`-th (1-based) result: `<index>-<slug>.png`.
pub fn result_file_name(index: usize, entry: &FrameCatalogEntry) -> String {
    format!("{index}-{}.png", entry.slug())
}

/// Writes every composed image into `out_dir`, optionally scaled down to
/// `display_width` with the aspect ratio kept. Returns the written paths in
/// result order.
pub fn export_results(
    writer: &dyn ImageWriter,
    out_dir: &Path,
    report: &TryOnReport,
    display_width: Option<u32>,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut written = Vec::with_capacity(report.results.len());
    for (i, result) in report.results.iter().enumerate() {
        let path = out_dir.join(result_file_name(i + 1, &result.entry));
        let image = &result.composite.image;
        let size = display_width.and_then(|w| display_size(image.dimensions(), w));
        writer.write(&path, image, size)?;
        written.push(path);
    }
    Ok(written)
}
