//! Face geometry as produced by a detector.
//!
//! Landmarks are normalized to `[0, 1]` image coordinates, the way
//! mesh-style detectors report them; bounding boxes and eye geometry are in
//! pixels.

use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn to_pixels(self, width: u32, height: u32) -> Point {
        Point::new(self.x * f64::from(width), self.y * f64::from(height))
    }
}

/// Parses `"x,y"`.
impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_floats(s, 2)?;
        Ok(Point::new(values[0], values[1]))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    pub left_eye: Point,
    pub right_eye: Point,
    pub forehead: Option<Point>,
    pub chin: Option<Point>,
}

impl FaceLandmarks {
    pub fn new(left_eye: Point, right_eye: Point) -> Self {
        Self {
            left_eye,
            right_eye,
            forehead: None,
            chin: None,
        }
    }

    pub fn with_vertical(mut self, forehead: Point, chin: Point) -> Self {
        self.forehead = Some(forehead);
        self.chin = Some(chin);
        self
    }

    /// Horizontal eye span in pixels.
    pub fn eye_span_px(&self, image_width: u32) -> f64 {
        (self.left_eye.x - self.right_eye.x).abs() * f64::from(image_width)
    }

    /// Forehead-to-chin distance in pixels, when both points are known.
    pub fn face_height_px(&self, image_height: u32) -> Option<f64> {
        match (self.forehead, self.chin) {
            (Some(top), Some(bottom)) => Some((top.y - bottom.y).abs() * f64::from(image_height)),
            _ => None,
        }
    }

    pub fn eye_geometry(&self, image_width: u32, image_height: u32) -> EyeGeometry {
        EyeGeometry::new(
            self.left_eye.to_pixels(image_width, image_height),
            self.right_eye.to_pixels(image_width, image_height),
        )
    }
}

/// Axis-aligned face box in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Parses `"x,y,w,h"`.
impl FromStr for FaceBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = parse_floats(s, 4)?;
        Ok(FaceBox::new(v[0], v[1], v[2], v[3]))
    }
}

/// Whatever a detector managed to find for one face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceDetection {
    pub landmarks: Option<FaceLandmarks>,
    pub bounding_box: Option<FaceBox>,
}

/// Eye centers in pixel coordinates of the face canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeGeometry {
    pub left: Point,
    pub right: Point,
}

impl EyeGeometry {
    pub fn new(left: Point, right: Point) -> Self {
        Self { left, right }
    }

    pub fn width(&self) -> f64 {
        (self.left.x - self.right.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.left.y - self.right.y).abs()
    }

    pub fn mid_x(&self) -> f64 {
        (self.left.x + self.right.x) / 2.0
    }
}

fn parse_floats(s: &str, expected: usize) -> Result<Vec<f64>, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {e}", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(format!(
            "expected {expected} comma-separated values, got {}",
            values.len()
        ));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!("values must be finite, got '{s}'"));
    }
    Ok(values)
}
