use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::classification::domain::face_geometry::EyeGeometry;
use crate::compositing::domain::frame_asset::FrameAsset;
use crate::compositing::domain::frame_compositor::{CompositeResult, FrameCompositor};
use crate::compositing::domain::placement_policy::PlacementPolicy;
use crate::shared::placement::Placement;

/// Lanczos3 support plus one pixel: source pixels kept on each side of a
/// resample window when upscaling, scaled by the ratio when downscaling.
const LANCZOS_MARGIN: f64 = 4.0;

/// CPU compositor: Lanczos resize, then per-pixel "over" blend.
///
/// Only the visible part of the placement is resampled and touched; fully
/// transparent frame pixels leave the face pixel bit-identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaCompositor {
    policy: PlacementPolicy,
}

impl AlphaCompositor {
    pub fn new(policy: PlacementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }
}

impl FrameCompositor for AlphaCompositor {
    fn composite(
        &self,
        face: &RgbaImage,
        frame: &FrameAsset,
        eyes: Option<&EyeGeometry>,
    ) -> CompositeResult {
        let mut canvas = face.clone();
        let framed = self.policy.place(
            face.dimensions(),
            frame.dimensions(),
            frame.measurements(),
            eyes,
        );
        let visible = framed.placement.clamp_to(face.width(), face.height());

        log::debug!(
            "Placing frame at scale {:.3} ({:?}): full {:?}, visible {}x{} at ({}, {})",
            framed.scale,
            framed.mode,
            framed.placement.full_size(),
            visible.width,
            visible.height,
            visible.x,
            visible.y
        );

        if !visible.is_empty() {
            let (overlay, offset) = resample_visible(frame.raster(), &visible);
            blend_into(&mut canvas, &overlay, offset, &visible);
        }

        CompositeResult {
            image: canvas,
            placement: visible,
            scale: framed.scale,
            mode: framed.mode,
        }
    }
}

/// One axis of the source window that feeds a visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisWindow {
    src_start: u32,
    src_len: u32,
    dst_len: u32,
    dst_offset: u32,
}

/// Maps the visible span `[offset, offset + len)` of a `src -> full` resize
/// back to the source pixels whose kernels reach it.
///
/// `dst_offset + len <= dst_len` always holds.
fn axis_window(src: u32, full: u32, offset: u32, len: u32) -> AxisWindow {
    let ratio = f64::from(src) / f64::from(full);
    let margin = LANCZOS_MARGIN * ratio.max(1.0);
    let start = (f64::from(offset) * ratio - margin).floor().max(0.0) as u32;
    let end = ((f64::from(offset) + f64::from(len)) * ratio + margin)
        .ceil()
        .min(f64::from(src)) as u32;
    let src_len = end.saturating_sub(start).max(1);

    let dst_offset = (f64::from(offset) - f64::from(start) / ratio)
        .round()
        .max(0.0) as u32;
    let dst_len = ((f64::from(src_len) / ratio).round() as u32).max(dst_offset + len);

    AxisWindow {
        src_start: start,
        src_len,
        dst_len,
        dst_offset,
    }
}

/// Resamples the part of `raster` that `visible` shows once scaled to the
/// placement's full size. Returns the overlay and the offset of the visible
/// area inside it.
///
/// The overlay is bounded by the visible area plus the filter margin, never
/// by the full scaled size.
fn resample_visible(raster: &RgbaImage, visible: &Placement) -> (RgbaImage, (u32, u32)) {
    let (full_width, full_height) = visible.full_size();
    let (offset_x, offset_y) = visible.source_offset();
    let wx = axis_window(raster.width(), full_width, offset_x, visible.width);
    let wy = axis_window(raster.height(), full_height, offset_y, visible.height);

    let source =
        imageops::crop_imm(raster, wx.src_start, wy.src_start, wx.src_len, wy.src_len).to_image();
    let overlay = if source.dimensions() == (wx.dst_len, wy.dst_len) {
        source
    } else {
        imageops::resize(&source, wx.dst_len, wy.dst_len, FilterType::Lanczos3)
    };
    (overlay, (wx.dst_offset, wy.dst_offset))
}

/// Blends `overlay`, starting at `(src_x, src_y)`, onto the visible area of
/// `canvas`.
///
/// `visible` must be clamped to `canvas` and fit inside `overlay` from the
/// given offset.
fn blend_into(
    canvas: &mut RgbaImage,
    overlay: &RgbaImage,
    (src_x, src_y): (u32, u32),
    visible: &Placement,
) {
    let dst_x = visible.x.max(0) as u32;
    let dst_y = visible.y.max(0) as u32;

    for row in 0..visible.height {
        for col in 0..visible.width {
            let src = overlay.get_pixel(src_x + col, src_y + row);
            if src[3] == 0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(dst_x + col, dst_y + row);
            *dst = blend_pixel(*dst, *src);
        }
    }
}

/// `dst * (1 - a) + src * a` per color channel; alpha composes "over".
fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let alpha = u32::from(src[3]);
    let inverse = 255 - alpha;
    let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * inverse + 127) / 255) as u8;
    let out_alpha = alpha + (u32::from(dst[3]) * inverse + 127) / 255;

    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        out_alpha.min(255) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::face_geometry::Point;
    use crate::compositing::domain::frame_asset::FrameMeasurements;
    use crate::compositing::domain::placement_policy::PlacementMode;
    use rstest::rstest;

    const SKIN: [u8; 4] = [200, 160, 130, 255];

    fn face(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(SKIN))
    }

    fn frame(width: u32, height: u32, pixel: [u8; 4]) -> FrameAsset {
        FrameAsset::new(
            RgbaImage::from_pixel(width, height, Rgba(pixel)),
            FrameMeasurements::default(),
        )
    }

    fn tilted_eyes() -> EyeGeometry {
        EyeGeometry::new(Point::new(140.0, 300.0), Point::new(260.0, 330.0))
    }

    // ── Pixel blending ───────────────────────────────────────────────

    #[rstest]
    #[case::opaque([10, 20, 30, 255], [10, 20, 30, 255])]
    #[case::half([0, 0, 0, 128], [100, 80, 65, 255])]
    fn test_blend_pixel(#[case] src: [u8; 4], #[case] expected: [u8; 4]) {
        assert_eq!(blend_pixel(Rgba(SKIN), Rgba(src)).0, expected);
    }

    #[test]
    fn test_blend_onto_transparent_destination() {
        let out = blend_pixel(Rgba([0, 0, 0, 0]), Rgba([255, 255, 255, 128]));
        assert_eq!(out[3], 128);
    }

    // ── Compositing ──────────────────────────────────────────────────

    #[test]
    fn test_output_dimensions_match_face() {
        let compositor = AlphaCompositor::default();
        for (w, h) in [(400, 600), (300, 300), (50, 900)] {
            let result = compositor.composite(&face(w, h), &frame(200, 80, [0, 0, 0, 255]), None);
            assert_eq!(result.image.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_input_face_is_not_mutated() {
        let original = face(400, 600);
        let copy = original.clone();
        AlphaCompositor::default().composite(
            &original,
            &frame(200, 80, [0, 0, 0, 255]),
            Some(&tilted_eyes()),
        );
        assert_eq!(original, copy);
    }

    #[test]
    fn test_transparent_frame_leaves_face_unchanged() {
        let original = face(400, 600);
        let result = AlphaCompositor::default().composite(
            &original,
            &frame(200, 80, [255, 0, 0, 0]),
            Some(&tilted_eyes()),
        );
        assert_eq!(result.image, original);
    }

    #[test]
    fn test_transparent_pixels_inside_frame_are_noops() {
        // Left half of the frame opaque black, right half fully transparent.
        let mut raster = RgbaImage::from_pixel(200, 80, Rgba([0, 0, 0, 0]));
        for y in 0..80 {
            for x in 0..100 {
                raster.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let asset = FrameAsset::new(raster, FrameMeasurements::default());
        // K = 0.25 on a 200 wide face keeps the frame unscaled: 200 * 0.25 / 50 = 1.0
        let policy = PlacementPolicy {
            face_width_ratio: 0.25,
            ..PlacementPolicy::default()
        };
        // Frame at x = 0, y = 0.28 * 200 = 56
        let original = face(200, 200);
        let result = AlphaCompositor::new(policy).composite(&original, &asset, None);
        assert_eq!(result.scale, 1.0);
        assert_eq!((result.placement.x, result.placement.y), (0, 56));

        assert_eq!(result.image.get_pixel(10, 60).0, [0, 0, 0, 255]);
        assert_eq!(result.image.get_pixel(150, 60).0, SKIN);
    }

    #[test]
    fn test_pixels_outside_placement_untouched() {
        let original = face(400, 600);
        let result = AlphaCompositor::default().composite(
            &original,
            &frame(200, 80, [0, 0, 0, 255]),
            Some(&tilted_eyes()),
        );
        let p = result.placement;
        for (x, y) in [(0, 0), (399, 599), (p.x as u32 - 1, p.y as u32), (p.x as u32, p.y as u32 + p.height)] {
            assert_eq!(result.image.get_pixel(x, y).0, SKIN, "pixel ({x}, {y}) changed");
        }
    }

    #[test]
    fn test_opaque_frame_paints_scaled_rectangle() {
        let result = AlphaCompositor::default().composite(
            &face(400, 600),
            &frame(200, 80, [0, 0, 0, 255]),
            Some(&tilted_eyes()),
        );
        assert_eq!(result.mode, PlacementMode::EyeGeometry);
        let p = result.placement;
        assert_eq!((p.x, p.y, p.width, p.height), (130, 279, 154, 62));

        let black = result
            .image
            .pixels()
            .filter(|px| px.0 == [0, 0, 0, 255])
            .count();
        assert_eq!(black, 154 * 62);
    }

    #[test]
    fn test_compositing_is_repeatable() {
        let compositor = AlphaCompositor::default();
        let mut raster = RgbaImage::new(60, 24);
        for (x, y, px) in raster.enumerate_pixels_mut() {
            *px = Rgba([(x * 4) as u8, (y * 10) as u8, 90, ((x + y) * 3) as u8]);
        }
        let asset = FrameAsset::new(raster, FrameMeasurements::default());
        let a = compositor.composite(&face(400, 600), &asset, Some(&tilted_eyes()));
        let b = compositor.composite(&face(400, 600), &asset, Some(&tilted_eyes()));
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn test_frame_larger_than_face_is_clamped() {
        // 300 face, dimension scale 3.9 on a 200x80 frame → 780x312, centered.
        let result = AlphaCompositor::default().composite(
            &face(300, 400),
            &frame(200, 80, [0, 0, 0, 255]),
            None,
        );
        let p = result.placement;
        assert_eq!((p.x, p.width), (0, 300));
        assert_eq!(p.y, 112);
        assert_eq!(p.height, 288);
        assert_eq!(result.image.dimensions(), (300, 400));
        assert_eq!(result.image.get_pixel(0, 111).0, SKIN);
        assert_eq!(result.image.get_pixel(0, 112).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_heavily_upscaled_frame_resamples_only_visible_window() {
        // 2000 face, 400x200 frame: scale 26 gives a 10400x5200 full raster.
        let raster = RgbaImage::from_pixel(400, 200, Rgba([0, 0, 0, 255]));
        let visible = Placement::new(-4200, 560, 10400, 5200).clamp_to(2000, 2000);
        assert_eq!((visible.width, visible.height), (2000, 1440));

        let (overlay, (off_x, off_y)) = resample_visible(&raster, &visible);
        assert!(off_x + visible.width <= overlay.width());
        assert!(off_y + visible.height <= overlay.height());
        let visible_area = u64::from(visible.width) * u64::from(visible.height);
        let overlay_area = u64::from(overlay.width()) * u64::from(overlay.height());
        assert!(
            overlay_area < 2 * visible_area,
            "overlay {:?} for visible {}x{}",
            overlay.dimensions(),
            visible.width,
            visible.height
        );
    }

    #[test]
    fn test_large_scale_composite_paints_visible_area() {
        // 1000 face, dimension scale 13 on a 400x200 frame → 5200x2600, centered.
        let result = AlphaCompositor::default().composite(
            &face(1000, 1000),
            &frame(400, 200, [0, 0, 0, 255]),
            None,
        );
        let p = result.placement;
        assert_eq!((p.x, p.y, p.width, p.height), (0, 280, 1000, 720));
        assert_eq!(p.full_size(), (5200, 2600));
        assert_eq!(result.image.get_pixel(0, 279).0, SKIN);
        assert_eq!(result.image.get_pixel(0, 280).0, [0, 0, 0, 255]);
        assert_eq!(result.image.get_pixel(999, 999).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_windowed_resample_matches_full_resize() {
        let mut raster = RgbaImage::new(40, 80);
        for (x, y, px) in raster.enumerate_pixels_mut() {
            *px = Rgba([(x * 6) as u8, (y * 3) as u8, ((x + y) % 17 * 15) as u8, 255]);
        }
        let asset = FrameAsset::new(raster.clone(), FrameMeasurements::default());
        // 400 * 1.25 / 50 = 10 → 400x800 full, rows 300..450 visible.
        let policy = PlacementPolicy {
            face_width_ratio: 1.25,
            vertical_position_ratio: -2.0,
            ..PlacementPolicy::default()
        };
        let result = AlphaCompositor::new(policy).composite(&face(400, 150), &asset, None);
        assert_eq!(result.placement.full_size(), (400, 800));
        assert_eq!(result.placement.source_offset(), (0, 300));

        let reference = imageops::resize(&raster, 400, 800, FilterType::Lanczos3);
        for y in 0..150 {
            for x in 0..400 {
                let got = result.image.get_pixel(x, y).0;
                let want = reference.get_pixel(x, y + 300).0;
                for c in 0..4 {
                    assert!(
                        got[c].abs_diff(want[c]) <= 1,
                        "pixel ({x}, {y}) channel {c}: {} vs {}",
                        got[c],
                        want[c]
                    );
                }
            }
        }
    }

    #[rstest]
    #[case::whole_source(200, 154, 0, 154, AxisWindow { src_start: 0, src_len: 200, dst_len: 154, dst_offset: 0 })]
    #[case::unscaled_crop(200, 200, 50, 100, AxisWindow { src_start: 46, src_len: 108, dst_len: 108, dst_offset: 4 })]
    #[case::upscaled_middle(80, 800, 300, 150, AxisWindow { src_start: 26, src_len: 23, dst_len: 230, dst_offset: 40 })]
    fn test_axis_window(
        #[case] src: u32,
        #[case] full: u32,
        #[case] offset: u32,
        #[case] len: u32,
        #[case] expected: AxisWindow,
    ) {
        assert_eq!(axis_window(src, full, offset, len), expected);
    }

    #[test]
    fn test_frame_entirely_off_canvas_changes_nothing() {
        let eyes = EyeGeometry::new(Point::new(-500.0, -500.0), Point::new(-380.0, -470.0));
        let original = face(400, 600);
        let result =
            AlphaCompositor::default().composite(&original, &frame(200, 80, [0, 0, 0, 255]), Some(&eyes));
        assert!(result.placement.is_empty());
        assert_eq!(result.image, original);
    }
}
