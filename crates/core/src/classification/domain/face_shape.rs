use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse face shape category, named as the storefront tags its frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceShapeLabel {
    Rond,
    #[default]
    Ovaal,
    Rechthoekig,
    Oblong,
    Hartvormig,
}

impl FaceShapeLabel {
    pub const ALL: &[FaceShapeLabel] = &[
        FaceShapeLabel::Rond,
        FaceShapeLabel::Ovaal,
        FaceShapeLabel::Rechthoekig,
        FaceShapeLabel::Oblong,
        FaceShapeLabel::Hartvormig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceShapeLabel::Rond => "rond",
            FaceShapeLabel::Ovaal => "ovaal",
            FaceShapeLabel::Rechthoekig => "rechthoekig",
            FaceShapeLabel::Oblong => "oblong",
            FaceShapeLabel::Hartvormig => "hartvormig",
        }
    }
}

impl fmt::Display for FaceShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style tag on a catalog frame.
///
/// Shares the face shape vocabulary plus `kat-ogig` (cat-eye), which has no
/// face shape counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameStyle {
    Rond,
    #[default]
    Ovaal,
    Rechthoekig,
    Oblong,
    Hartvormig,
    KatOgig,
}

impl FrameStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameStyle::Rond => "rond",
            FrameStyle::Ovaal => "ovaal",
            FrameStyle::Rechthoekig => "rechthoekig",
            FrameStyle::Oblong => "oblong",
            FrameStyle::Hartvormig => "hartvormig",
            FrameStyle::KatOgig => "kat-ogig",
        }
    }

    pub fn suits(&self, shape: FaceShapeLabel) -> bool {
        matches!(
            (self, shape),
            (FrameStyle::Rond, FaceShapeLabel::Rond)
                | (FrameStyle::Ovaal, FaceShapeLabel::Ovaal)
                | (FrameStyle::Rechthoekig, FaceShapeLabel::Rechthoekig)
                | (FrameStyle::Oblong, FaceShapeLabel::Oblong)
                | (FrameStyle::Hartvormig, FaceShapeLabel::Hartvormig)
        )
    }
}

impl fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rond" => Ok(FrameStyle::Rond),
            "ovaal" => Ok(FrameStyle::Ovaal),
            "rechthoekig" => Ok(FrameStyle::Rechthoekig),
            "oblong" => Ok(FrameStyle::Oblong),
            "hartvormig" => Ok(FrameStyle::Hartvormig),
            "kat-ogig" | "katogig" => Ok(FrameStyle::KatOgig),
            other => Err(format!("unknown frame style '{other}'")),
        }
    }
}
