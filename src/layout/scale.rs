//! Resolution-independent effect magnitudes.
//!
//! Blur radii and similar pixel-space magnitudes are authored once against a reference canvas
//! width and rescaled for whatever width is actually rendered, so a small interactive preview and
//! a full-resolution export look alike.

/// Canvas width at which base effect magnitudes are calibrated.
pub const REFERENCE_WIDTH: f64 = 3000.0;

/// Default floor for resolved magnitudes.
pub const DEFAULT_MIN_VALUE: f64 = 0.5;

/// Rescales base magnitudes from [`REFERENCE_WIDTH`] to an output width.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaledValueResolver {
    /// Width the base values were authored at.
    pub reference_width: f64,
    /// Lower bound for every resolved value.
    pub min_value: f64,
}

impl Default for ScaledValueResolver {
    fn default() -> Self {
        Self {
            reference_width: REFERENCE_WIDTH,
            min_value: DEFAULT_MIN_VALUE,
        }
    }
}

impl ScaledValueResolver {
    /// Resolve `base` for an output of `current_width` pixels.
    pub fn resolve(&self, base: f64, current_width: f64) -> f64 {
        (base * current_width / self.reference_width).max(self.min_value)
    }
}

/// Resolve `base` against [`REFERENCE_WIDTH`] with an explicit floor.
pub fn resolve_scaled_value(base: f64, current_width: f64, min_value: f64) -> f64 {
    ScaledValueResolver {
        reference_width: REFERENCE_WIDTH,
        min_value,
    }
    .resolve(base, current_width)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/scale.rs"]
mod tests;
