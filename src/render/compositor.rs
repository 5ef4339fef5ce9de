use crate::{
    assets::store::PreparedImage,
    foundation::error::{PlinthError, PlinthResult},
    layout::solver::CompositeLayout,
    render::cpu::CpuSurface,
    render::passes::{CompositeInputs, FrameRGBA, execute_plan},
    render::plan::{CompositeOptions, plan_composite},
};

/// Draw backdrop, optional blur, optional reflection and the shadowed subject into one frame.
///
/// The backdrop is stretched to the canvas regardless of its aspect ratio. Either a full
/// frame is returned or an error; nothing partial escapes.
#[tracing::instrument(
    level = "debug",
    skip(backdrop, shadowed, clean, layout),
    fields(canvas_w = layout.canvas_width, canvas_h = layout.canvas_height)
)]
pub fn composite(
    backdrop: &PreparedImage,
    shadowed: &PreparedImage,
    clean: &PreparedImage,
    layout: &CompositeLayout,
    opts: &CompositeOptions,
) -> PlinthResult<FrameRGBA> {
    for (name, img) in [
        ("backdrop", backdrop),
        ("shadowed subject", shadowed),
        ("clean product", clean),
    ] {
        if img.width == 0 || img.height == 0 {
            return Err(PlinthError::validation(format!("{name} image is empty")));
        }
    }

    let plan = plan_composite(layout, opts)?;
    let mut surface = CpuSurface::new(plan.width, plan.height)?;
    let frame = execute_plan(
        &mut surface,
        &plan,
        CompositeInputs {
            backdrop,
            shadowed,
            clean,
        },
    )?;
    tracing::debug!(ops = plan.ops.len(), "composite finished");
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
