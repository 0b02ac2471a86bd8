mod settings;

use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, SystemTime};

use clap::{Args, Parser, Subcommand};

use brilfit_core::catalog::domain::catalog_entry::FrameCatalogEntry;
use brilfit_core::catalog::domain::catalog_repository::{CatalogOrigin, CatalogRepository};
use brilfit_core::catalog::infrastructure::catalog_store::CatalogStore;
use brilfit_core::catalog::infrastructure::static_catalog::fallback_entries;
use brilfit_core::catalog::infrastructure::woocommerce_source::WooCommerceCatalogSource;
use brilfit_core::classification::domain::face_geometry::{
    FaceBox, FaceDetection, FaceLandmarks, Point,
};
use brilfit_core::classification::domain::face_shape_classifier::{
    Classification, FaceEvidence, FaceShapeClassifier, ShapePolicy,
};
use brilfit_core::compositing::infrastructure::alpha_compositor::AlphaCompositor;
use brilfit_core::compositing::infrastructure::http_frame_image_source::HttpFrameImageSource;
use brilfit_core::detection::domain::face_detector::FaceDetector;
use brilfit_core::detection::infrastructure::fixed_face_detector::FixedFaceDetector;
use brilfit_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use brilfit_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use brilfit_core::pipeline::try_on_logger::StdoutTryOnLogger;
use brilfit_core::pipeline::try_on_use_case::{export_results, TryOnUseCase};
use brilfit_core::shared::constants::IMAGE_EXTENSIONS;

use crate::settings::Settings;

/// Virtual eyeglasses try-on against a WooCommerce frame catalog.
#[derive(Parser)]
#[command(name = "brilfit")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Store base URL (overrides settings and WOOCOMMERCE_URL).
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Ignore the cached catalog and fetch it again.
    #[arg(long, global = true)]
    refresh: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the frames currently for sale.
    Catalog,

    /// Print the face shape of a photo.
    Classify {
        /// Face photo.
        face: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Compose frames onto a face photo and write one image per frame.
    TryOn {
        /// Face photo.
        face: PathBuf,

        /// Output directory.
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,

        /// Number of frames to try.
        #[arg(long)]
        count: Option<usize>,

        /// Use this image (URL or path) for every frame instead of the catalog image.
        #[arg(long)]
        frame_image: Option<String>,

        /// Width the written images are scaled to (aspect ratio kept).
        #[arg(long)]
        display_width: Option<u32>,

        /// Write images at the face photo's size.
        #[arg(long, conflicts_with = "display_width")]
        full_size: bool,
    },
}

/// Face geometry from an upstream detector, in normalized `x,y` coordinates
/// unless noted otherwise.
#[derive(Args, Default)]
struct GeometryArgs {
    /// Left eye center.
    #[arg(long)]
    left_eye: Option<Point>,

    /// Right eye center.
    #[arg(long)]
    right_eye: Option<Point>,

    /// Top of the forehead.
    #[arg(long)]
    forehead: Option<Point>,

    /// Bottom of the chin.
    #[arg(long)]
    chin: Option<Point>,

    /// Face bounding box in pixels: x,y,w,h.
    #[arg(long)]
    face_box: Option<FaceBox>,

    /// The detector ran and found no face.
    #[arg(long)]
    no_face: bool,

    /// Which geometry drives classification: landmarks or bounding-box.
    #[arg(long)]
    shape_policy: Option<ShapePolicy>,
}

impl GeometryArgs {
    fn has_geometry(&self) -> bool {
        self.left_eye.is_some()
            || self.right_eye.is_some()
            || self.forehead.is_some()
            || self.chin.is_some()
            || self.face_box.is_some()
    }

    fn detection(&self) -> Option<FaceDetection> {
        let landmarks = match (self.left_eye, self.right_eye) {
            (Some(left), Some(right)) => {
                let landmarks = FaceLandmarks::new(left, right);
                Some(match (self.forehead, self.chin) {
                    (Some(forehead), Some(chin)) => landmarks.with_vertical(forehead, chin),
                    _ => landmarks,
                })
            }
            _ => None,
        };
        if landmarks.is_none() && self.face_box.is_none() {
            return None;
        }
        Some(FaceDetection {
            landmarks,
            bounding_box: self.face_box,
        })
    }

    /// `None` when no detector output was supplied at all.
    /// Classifies straight from the supplied geometry, without a detector.
    fn classify(&self, classifier: &FaceShapeClassifier, width: u32, height: u32) -> Classification {
        if self.no_face {
            return classifier.classify(FaceEvidence::NoFaceDetected, width, height);
        }
        match self.detection() {
            Some(detection) => classifier.classify(FaceEvidence::Detected(&detection), width, height),
            None => classifier.classify(FaceEvidence::DetectorUnavailable, width, height),
        }
    }

    fn detector(&self) -> Option<Box<dyn FaceDetector>> {
        if self.no_face {
            return Some(Box::new(FixedFaceDetector::new(None)));
        }
        self.detection()
            .map(|d| Box::new(FixedFaceDetector::new(Some(d))) as Box<dyn FaceDetector>)
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut settings = Settings::load();
    if let Some(url) = &cli.store_url {
        settings.store_url = url.clone();
    }

    match &cli.command {
        Command::Catalog => run_catalog(&settings, cli.refresh),
        Command::Classify { face, geometry } => run_classify(&settings, face, geometry),
        Command::TryOn {
            face,
            out,
            geometry,
            count,
            frame_image,
            display_width,
            full_size,
        } => {
            if let Some(count) = count {
                settings.try_on_count = *count;
            }
            if let Some(width) = display_width {
                settings.display_width = *width;
            }
            let display_width = (!full_size).then_some(settings.display_width);
            run_try_on(
                &settings,
                cli.refresh,
                face,
                out,
                geometry,
                frame_image.as_deref(),
                display_width,
            )
        }
    }
}

fn run_catalog(settings: &Settings, refresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (entries, origin) = load_catalog(settings, refresh)?;
    println!("{} frames ({})", entries.len(), describe_origin(origin));
    for entry in &entries {
        println!(
            "  {} | €{} | {} | {}",
            entry.name, entry.price, entry.style, entry.url
        );
    }
    Ok(())
}

fn run_classify(
    settings: &Settings,
    face: &Path,
    geometry: &GeometryArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = ImageFileReader::new().read(face)?;
    let policy = geometry.shape_policy.unwrap_or(settings.shape_policy);
    let classifier = FaceShapeClassifier::new(policy);
    let classification = geometry.classify(&classifier, image.width(), image.height());
    println!("{} ({})", classification.label, classification.source);
    Ok(())
}

fn run_try_on(
    settings: &Settings,
    refresh: bool,
    face: &Path,
    out: &Path,
    geometry: &GeometryArgs,
    frame_image: Option<&str>,
    display_width: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = ImageFileReader::new().read(face)?;
    let (mut entries, origin) = load_catalog(settings, refresh)?;
    log::info!("{} frames ({})", entries.len(), describe_origin(origin));
    if let Some(reference) = frame_image {
        for entry in &mut entries {
            entry.image_url = reference.to_string();
        }
    }

    let policy = geometry.shape_policy.unwrap_or(settings.shape_policy);
    let mut use_case = TryOnUseCase::new(
        geometry.detector(),
        FaceShapeClassifier::new(policy),
        Box::new(HttpFrameImageSource::new(Duration::from_secs(
            settings.frame_timeout_secs,
        ))?),
        Box::new(AlphaCompositor::new(settings.placement)),
        Box::new(StdoutTryOnLogger::new()),
        settings.try_on_count,
    );
    let report = use_case.execute(&image, &entries);
    println!(
        "Face shape: {} ({})",
        report.classification.label, report.classification.source
    );

    let paths = export_results(&ImageFileWriter::new(), out, &report, display_width)?;
    for (path, result) in paths.iter().zip(&report.results) {
        let note = if result.used_placeholder() {
            " [placeholder]"
        } else {
            ""
        };
        println!(
            "  {}: {} €{}{note}",
            path.display(),
            result.entry.name,
            result.entry.price
        );
        log::info!("Buy {} at {}", result.entry.name, result.entry.url);
    }
    if paths.is_empty() {
        log::warn!("No frames to try on");
    }
    Ok(())
}

/// Catalog through the on-disk cache; the cache is rewritten after a
/// successful fetch.
fn load_catalog(
    settings: &Settings,
    refresh: bool,
) -> Result<(Vec<FrameCatalogEntry>, CatalogOrigin), Box<dyn std::error::Error>> {
    let source = WooCommerceCatalogSource::new(
        settings.store_url.clone(),
        settings.credentials(),
        Duration::from_secs(settings.catalog_timeout_secs),
    )?
    .with_page_size(settings.page_size);

    let store = match CatalogStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("Catalog cache disabled: {e}");
            None
        }
    };

    let mut repository = CatalogRepository::new(Box::new(source), fallback_entries())
        .with_ttl(Duration::from_secs(settings.catalog_ttl_secs))
        .with_max_count(settings.page_size)
        .with_cache(store.as_ref().and_then(CatalogStore::load));

    let now = SystemTime::now();
    let outcome = if refresh {
        repository.refresh(now)
    } else {
        repository.frames(now)
    };
    let frames = outcome.into_value();

    if frames.origin == CatalogOrigin::Remote {
        if let (Some(store), Some(cache)) = (&store, repository.cache()) {
            if let Err(e) = store.save(cache) {
                log::warn!("Could not save catalog cache: {e}");
            }
        }
    }
    Ok((frames.entries, frames.origin))
}

fn describe_origin(origin: CatalogOrigin) -> &'static str {
    match origin {
        CatalogOrigin::Cache => "cached",
        CatalogOrigin::Remote => "from the store",
        CatalogOrigin::StaticFallback => "store unavailable, showing built-in list",
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Catalog => Ok(()),
        Command::Classify { face, geometry } => {
            validate_face(face)?;
            validate_geometry(geometry)
        }
        Command::TryOn {
            face,
            geometry,
            count,
            display_width,
            ..
        } => {
            validate_face(face)?;
            validate_geometry(geometry)?;
            if *count == Some(0) {
                return Err("Count must be at least 1".into());
            }
            if *display_width == Some(0) {
                return Err("Display width must be positive".into());
            }
            Ok(())
        }
    }
}

fn validate_face(face: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !face.exists() {
        return Err(format!("Face photo not found: {}", face.display()).into());
    }
    if !is_image(face) {
        return Err(format!(
            "Face photo must be one of: {}, got {}",
            IMAGE_EXTENSIONS.join(", "),
            face.display()
        )
        .into());
    }
    Ok(())
}

fn validate_geometry(geometry: &GeometryArgs) -> Result<(), Box<dyn std::error::Error>> {
    if geometry.no_face && geometry.has_geometry() {
        return Err("--no-face cannot be combined with face geometry".into());
    }
    if geometry.left_eye.is_some() != geometry.right_eye.is_some() {
        return Err("--left-eye and --right-eye must be given together".into());
    }
    if geometry.forehead.is_some() != geometry.chin.is_some() {
        return Err("--forehead and --chin must be given together".into());
    }
    if geometry.forehead.is_some() && geometry.left_eye.is_none() {
        return Err("--forehead and --chin need --left-eye and --right-eye".into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
