use std::path::Path;

use image::RgbaImage;

use crate::imaging::domain::image_writer::ImageWriter;

/// Writes a composed try-on to an image file using the `image` crate.
///
/// The format follows the file extension. Supports optional resizing to the
/// display size.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        image: &RgbaImage,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match size {
            Some((w, h)) if (w, h) != image.dimensions() => {
                image::imageops::resize(image, w, h, image::imageops::FilterType::Triangle)
                    .save(path)?
            }
            _ => image.save(path)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn make_image(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(pixel))
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_image(100, 80, [50, 100, 200, 255]), None)
            .unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_image(50, 50, [50, 100, 200, 255]), None)
            .unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200, 255]);
    }

    #[test]
    fn test_write_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        ImageFileWriter::new()
            .write(&path, &make_image(400, 600, [128, 128, 128, 255]), Some((200, 300)))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (200, 300));
    }

    #[test]
    fn test_write_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.png");
        ImageFileWriter::new()
            .write(&path, &make_image(4, 4, [0, 0, 0, 255]), None)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_under_a_file_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();
        let result = ImageFileWriter::new().write(
            &blocker.join("out.png"),
            &make_image(10, 10, [0, 0, 0, 255]),
            None,
        );
        assert!(result.is_err());
    }
}
