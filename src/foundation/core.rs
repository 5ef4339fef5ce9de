use crate::foundation::error::{PlinthError, PlinthResult};

pub use kurbo::{Affine, Point, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> PlinthResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlinthError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

/// Axis-aligned integer pixel rectangle.
///
/// Values are rounded once, at construction, and may lie partly or fully off-canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl PixelRect {
    /// Round floating-point geometry to the nearest integer pixel rectangle.
    pub fn from_f64(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: round_i32(x),
            y: round_i32(y),
            width: round_i32(width),
            height: round_i32(height),
        }
    }

    /// Right edge (exclusive), saturating at the `i32` range.
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating at the `i32` range.
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

fn round_i32(v: f64) -> i32 {
    v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Normalized subject anchor on the canvas.
///
/// `x` is the horizontal center as a fraction of canvas width, `y` the fraction of canvas
/// height where the subject's bottom edge sits. Neither is clamped.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Horizontal center fraction.
    pub x: f64,
    /// Bottom-edge fraction (0 = top, 1 = bottom).
    pub y: f64,
    /// Multiplier applied to every subject dimension.
    pub scale: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.85,
            scale: 1.0,
        }
    }
}

impl Placement {
    /// Build a placement, rejecting non-finite values and non-positive scale.
    pub fn new(x: f64, y: f64, scale: f64) -> PlinthResult<Self> {
        let p = Self { x, y, scale };
        p.validate()?;
        Ok(p)
    }

    /// Check the placement invariants.
    pub fn validate(&self) -> PlinthResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(PlinthError::validation("placement x/y must be finite"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PlinthError::validation(
                "placement scale must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
