use std::path::Path;

use image::RgbaImage;

/// Decodes face photos with the `image` crate. Whatever the source format,
/// the result is RGBA.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<RgbaImage, Box<dyn std::error::Error>> {
        let img = image::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(img.to_rgba8())
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, Box<dyn std::error::Error>> {
        Ok(image::load_from_memory(bytes)?.to_rgba8())
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}
