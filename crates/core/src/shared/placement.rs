/// Rectangle at which a frame raster lands on a face canvas.
///
/// Carries both clamped (visible) and unclamped (full) geometry so a frame
/// hanging off a canvas edge keeps its full size and position; only the
/// visible part is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub full_width: Option<u32>,
    pub full_height: Option<u32>,
    pub unclamped_x: Option<i32>,
    pub unclamped_y: Option<i32>,
}

impl Placement {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            full_width: None,
            full_height: None,
            unclamped_x: None,
            unclamped_y: None,
        }
    }

    /// Intersects the full rectangle with a `canvas_width` x `canvas_height`
    /// canvas. A rectangle entirely off-canvas clamps to zero size.
    pub fn clamp_to(&self, canvas_width: u32, canvas_height: u32) -> Placement {
        let (fw, fh, ux, uy) = self.unclamped_geometry();
        let cw = i64::from(canvas_width);
        let ch = i64::from(canvas_height);

        let x1 = i64::from(ux).clamp(0, cw);
        let y1 = i64::from(uy).clamp(0, ch);
        let x2 = (i64::from(ux) + i64::from(fw)).clamp(0, cw);
        let y2 = (i64::from(uy) + i64::from(fh)).clamp(0, ch);

        Placement {
            x: x1 as i32,
            y: y1 as i32,
            width: (x2 - x1).max(0) as u32,
            height: (y2 - y1).max(0) as u32,
            full_width: Some(fw),
            full_height: Some(fh),
            unclamped_x: Some(ux),
            unclamped_y: Some(uy),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Offset of the visible area inside the full frame raster.
    pub fn source_offset(&self) -> (u32, u32) {
        let (_, _, ux, uy) = self.unclamped_geometry();
        (
            (i64::from(self.x) - i64::from(ux)).max(0) as u32,
            (i64::from(self.y) - i64::from(uy)).max(0) as u32,
        )
    }

    pub fn full_size(&self) -> (u32, u32) {
        let (fw, fh, _, _) = self.unclamped_geometry();
        (fw, fh)
    }

    /// Horizontal center of the full rectangle.
    pub fn center_x(&self) -> f64 {
        let (fw, _, ux, _) = self.unclamped_geometry();
        f64::from(ux) + f64::from(fw) / 2.0
    }

    fn unclamped_geometry(&self) -> (u32, u32, i32, i32) {
        (
            self.full_width.unwrap_or(self.width),
            self.full_height.unwrap_or(self.height),
            self.unclamped_x.unwrap_or(self.x),
            self.unclamped_y.unwrap_or(self.y),
        )
    }
}
