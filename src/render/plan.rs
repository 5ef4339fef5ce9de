use crate::{
    effects::composite::VerticalFade,
    foundation::core::PixelRect,
    foundation::error::{PlinthError, PlinthResult},
    layout::scale::ScaledValueResolver,
    layout::solver::CompositeLayout,
};

/// Base depth-of-field blur (gaussian sigma) at the reference width.
pub const DEFAULT_BLUR_BASE_RADIUS: f64 = 9.0;

/// Fading mirror drawn under the product.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReflectionOptions {
    /// Alpha at the reflection's top edge, in `[0, 1]`.
    pub opacity: f32,
    /// Fraction of the reflection height over which it fades out, in `(0, 1]`.
    pub falloff: f32,
}

impl ReflectionOptions {
    /// Check ranges.
    pub fn validate(&self) -> PlinthResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(PlinthError::validation("reflection opacity must be in [0, 1]"));
        }
        if !(self.falloff > 0.0 && self.falloff <= 1.0) {
            return Err(PlinthError::validation("reflection falloff must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Caller-requested effects for one composite.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositeOptions {
    /// Reflection settings; `None` draws no reflection.
    #[serde(default)]
    pub reflection: Option<ReflectionOptions>,
    /// Blur the backdrop.
    #[serde(default)]
    pub depth_of_field: bool,
    /// Blur sigma at the reference width, rescaled to the canvas width.
    #[serde(default = "default_blur_base_radius")]
    pub blur_base_radius: f64,
}

fn default_blur_base_radius() -> f64 {
    DEFAULT_BLUR_BASE_RADIUS
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            reflection: None,
            depth_of_field: false,
            blur_base_radius: DEFAULT_BLUR_BASE_RADIUS,
        }
    }
}

impl CompositeOptions {
    /// Check ranges.
    pub fn validate(&self) -> PlinthResult<()> {
        if let Some(r) = &self.reflection {
            r.validate()?;
        }
        if !self.blur_base_radius.is_finite() || self.blur_base_radius < 0.0 {
            return Err(PlinthError::validation(
                "blur_base_radius must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Which input a draw reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// Backdrop, stretched to the canvas.
    Backdrop,
    /// Subject including its drop-shadow padding.
    Shadowed,
    /// Bare product cutout.
    Clean,
}

/// One drawing instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    /// Scale `slot` into `dest` and source-over it.
    Image {
        /// Input to draw.
        slot: ImageSlot,
        /// Target rectangle; may extend off-canvas.
        dest: PixelRect,
        /// Flip vertically before drawing.
        mirror_y: bool,
        /// Row-wise alpha ramp applied while drawing.
        fade: Option<VerticalFade>,
    },
    /// Gaussian blur of everything drawn so far.
    Blur {
        /// Gaussian standard deviation in output pixels.
        sigma_px: f32,
    },
}

/// Ordered drawing instructions for one composite.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositePlan {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Draws in execution order.
    pub ops: Vec<DrawOp>,
}

/// Turn a layout and options into drawing instructions.
///
/// The order is fixed: backdrop, optional blur, optional reflection, subject.
pub fn plan_composite(
    layout: &CompositeLayout,
    opts: &CompositeOptions,
) -> PlinthResult<CompositePlan> {
    opts.validate()?;
    if layout.canvas_width == 0 || layout.canvas_height == 0 {
        return Err(PlinthError::validation("canvas width/height must be > 0"));
    }

    let canvas_rect = PixelRect {
        x: 0,
        y: 0,
        width: i32::try_from(layout.canvas_width)
            .map_err(|_| PlinthError::validation("canvas width overflow"))?,
        height: i32::try_from(layout.canvas_height)
            .map_err(|_| PlinthError::validation("canvas height overflow"))?,
    };

    let mut ops = Vec::with_capacity(4);
    ops.push(DrawOp::Image {
        slot: ImageSlot::Backdrop,
        dest: canvas_rect,
        mirror_y: false,
        fade: None,
    });

    if opts.depth_of_field && opts.blur_base_radius > 0.0 {
        let sigma = ScaledValueResolver::default()
            .resolve(opts.blur_base_radius, f64::from(layout.canvas_width));
        ops.push(DrawOp::Blur {
            sigma_px: sigma as f32,
        });
    }

    if let Some(r) = opts.reflection
        && r.opacity > 0.0
        && !layout.reflection_rect.is_empty()
    {
        ops.push(DrawOp::Image {
            slot: ImageSlot::Clean,
            dest: layout.reflection_rect,
            mirror_y: true,
            fade: Some(VerticalFade {
                opacity: r.opacity,
                falloff: r.falloff,
            }),
        });
    }

    ops.push(DrawOp::Image {
        slot: ImageSlot::Shadowed,
        dest: layout.shadowed_subject_rect,
        mirror_y: false,
        fade: None,
    });

    Ok(CompositePlan {
        width: layout.canvas_width,
        height: layout.canvas_height,
        ops,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
