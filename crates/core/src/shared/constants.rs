pub const DEFAULT_STORE_URL: &str = "https://elzeroptiek.nl";
pub const WOOCOMMERCE_PRODUCTS_PATH: &str = "/wp-json/wc/v3/products";

/// Products requested per catalog page.
pub const CATALOG_PAGE_SIZE: usize = 100;

/// How long a fetched catalog stays fresh (one hour).
pub const CATALOG_TTL_SECS: u64 = 3600;

pub const CATALOG_TIMEOUT_SECS: u64 = 10;
pub const FRAME_IMAGE_TIMEOUT_SECS: u64 = 5;

/// Frames tried per request when the caller does not say otherwise.
pub const DEFAULT_TRY_ON_COUNT: usize = 3;

/// Width the UI showed composed try-ons at.
pub const DEFAULT_DISPLAY_WIDTH: u32 = 200;

pub const DEFAULT_LENS_WIDTH_MM: f64 = 50.0;
pub const DEFAULT_BRIDGE_MM: f64 = 18.0;
pub const DEFAULT_TEMPLE_MM: f64 = 140.0;

/// Lower bound on the lens width used in any scale computation.
pub const MIN_LENS_WIDTH_MM: f64 = 40.0;

/// Fraction of the face width covered by a frame without eye geometry.
pub const FACE_WIDTH_RATIO: f64 = 0.65;

/// Vertical frame position, as a fraction of face height, without eye geometry.
pub const VERTICAL_POSITION_RATIO: f64 = 0.28;

/// Share of the scaled bridge width that shifts the frame off the eye midpoint.
pub const BRIDGE_OFFSET_RATIO: f64 = 0.5;

pub const PLACEHOLDER_WIDTH: u32 = 200;
pub const PLACEHOLDER_HEIGHT: u32 = 80;
pub const PLACEHOLDER_COLOR: [u8; 4] = [0, 0, 0, 255];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
