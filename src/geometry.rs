use core::fmt;
use core::str::FromStr;

use crate::error::RepngError;

/// How the output dimensions are derived from the input dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReshapeMode {
    /// Same dimensions as the input.
    #[default]
    None,
    /// Square of (at most) equal area. May drop up to `2 * side` pixels.
    Square,
    /// Portrait: width is the shorter input side.
    Tall,
    /// Landscape: width is the longer input side.
    Wide,
}

impl ReshapeMode {
    pub const ALL: [ReshapeMode; 4] = [Self::None, Self::Square, Self::Tall, Self::Wide];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Square => "square",
            Self::Tall => "tall",
            Self::Wide => "wide",
        }
    }
}

impl fmt::Display for ReshapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReshapeMode {
    type Err = RepngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RepngError::InvalidParameter(format!("unknown reshape mode `{s}`")))
    }
}

/// Output image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes of RGBA data needed to fill this geometry, or `None` if that
    /// does not fit in `usize`.
    pub fn byte_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Derive the output geometry from the input dimensions. Never looks at pixels.
pub fn resolve(width: u32, height: u32, mode: ReshapeMode) -> Geometry {
    match mode {
        ReshapeMode::None => Geometry::new(width, height),
        ReshapeMode::Square => {
            // sqrt(u32::MAX * u32::MAX) < 2^32, so the side always fits.
            let side = (width as u64 * height as u64).isqrt() as u32;
            Geometry::new(side, side)
        }
        ReshapeMode::Tall => Geometry::new(width.min(height), width.max(height)),
        ReshapeMode::Wide => Geometry::new(width.max(height), width.min(height)),
    }
}
