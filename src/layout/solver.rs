use crate::{
    foundation::core::{Canvas, PixelRect, Placement},
    foundation::error::{PlinthError, PlinthResult},
};

pub use kurbo::Size;

/// Resolved placement of a subject and its reflection on one canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompositeLayout {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Bounds of the subject image including its shadow padding.
    pub shadowed_subject_rect: PixelRect,
    /// Bounds of the bare product, centered inside `shadowed_subject_rect`.
    pub product_rect: PixelRect,
    /// Mirror target directly under `product_rect`.
    pub reflection_rect: PixelRect,
}

/// Compute subject, product and reflection rectangles for `placement`.
///
/// `shadowed` is the natural size of the subject image with its drop-shadow padding, `clean`
/// the natural size of the bare product cutout. All arithmetic stays in `f64` until each
/// rectangle is built, so rounding never compounds.
#[tracing::instrument(level = "debug")]
pub fn compute_layout(
    canvas: Canvas,
    shadowed: Size,
    clean: Size,
    placement: Placement,
) -> PlinthResult<CompositeLayout> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PlinthError::validation("canvas width/height must be > 0"));
    }
    placement.validate()?;
    validate_size(shadowed, "shadowed")?;
    validate_size(clean, "clean")?;

    let canvas_w = f64::from(canvas.width);
    let canvas_h = f64::from(canvas.height);

    let shadowed_w = shadowed.width * placement.scale;
    let shadowed_h = shadowed.height * placement.scale;
    let shadowed_x = canvas_w * placement.x - shadowed_w / 2.0;
    // placement.y anchors the bottom edge.
    let shadowed_y = canvas_h * placement.y - shadowed_h;

    let clean_w = clean.width * placement.scale;
    let clean_h = clean.height * placement.scale;
    let pad_x = (shadowed_w - clean_w) / 2.0;
    let pad_y = (shadowed_h - clean_h) / 2.0;

    let shadowed_subject_rect =
        PixelRect::from_f64(shadowed_x, shadowed_y, shadowed_w, shadowed_h);
    let product_rect =
        PixelRect::from_f64(shadowed_x + pad_x, shadowed_y + pad_y, clean_w, clean_h);
    let reflection_rect = PixelRect {
        x: product_rect.x,
        y: product_rect.bottom(),
        width: product_rect.width,
        height: product_rect.height,
    };

    Ok(CompositeLayout {
        canvas_width: canvas.width,
        canvas_height: canvas.height,
        shadowed_subject_rect,
        product_rect,
        reflection_rect,
    })
}

fn validate_size(size: Size, what: &str) -> PlinthResult<()> {
    if !size.width.is_finite()
        || !size.height.is_finite()
        || size.width <= 0.0
        || size.height <= 0.0
    {
        return Err(PlinthError::validation(format!(
            "{what} subject size must be finite and > 0",
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
