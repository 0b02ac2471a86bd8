use std::path::Path;

use image::RgbaImage;

/// Writes a single composed image to a file.
pub trait ImageWriter: Send {
    /// Writes an image to the given path, optionally resizing to the given dimensions.
    fn write(
        &self,
        path: &Path,
        image: &RgbaImage,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Size that fits `display_width` while keeping the aspect ratio of
/// `(width, height)`. `None` when any dimension is zero.
pub fn display_size((width, height): (u32, u32), display_width: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || display_width == 0 {
        return None;
    }
    let scaled = (f64::from(height) * f64::from(display_width) / f64::from(width)).round();
    Some((display_width, (scaled as u32).max(1)))
}
