use std::path::Path;

use crate::{
    assets::decode::load_image,
    assets::orientation::apply_orientation,
    assets::store::PreparedImage,
    composition::model::{ImageSource, Stage},
    deskew::orchestrator::{DeskewResult, detect_and_correct},
    foundation::core::Canvas,
    foundation::error::PlinthResult,
    layout::solver::{CompositeLayout, Size, compute_layout},
    render::compositor::composite,
    render::passes::FrameRGBA,
};

/// Decoded, oriented and optionally straightened inputs of a [`Stage`].
#[derive(Clone, Debug)]
pub struct PreparedStage {
    /// Backdrop photo.
    pub backdrop: PreparedImage,
    /// Subject with shadow padding.
    pub shadowed: PreparedImage,
    /// Bare product; the shadowed image when the stage names none.
    pub clean: PreparedImage,
    /// Deskew decision, when the stage asked for one.
    pub deskew: Option<DeskewResult>,
}

/// Everything produced by [`render_stage`].
#[derive(Clone, Debug)]
pub struct StageRender {
    /// Placement used for drawing.
    pub layout: CompositeLayout,
    /// Final composite.
    pub frame: FrameRGBA,
    /// Deskew decision, when the stage asked for one.
    pub deskew: Option<DeskewResult>,
}

fn load_source(root: &Path, src: &ImageSource) -> PlinthResult<PreparedImage> {
    let img = load_image(&root.join(&src.path))?;
    apply_orientation(&img, src.orientation)
}

/// Load every input of `stage` concurrently, apply orientation and run deskew if requested.
///
/// Paths resolve against `root`. Any decode failure aborts the whole stage.
#[tracing::instrument(skip(stage, root), fields(root = %root.display()))]
pub fn prepare_stage(stage: &Stage, root: &Path) -> PlinthResult<PreparedStage> {
    stage.validate()?;

    let (backdrop, (shadowed, clean)) = rayon::join(
        || load_source(root, &stage.backdrop),
        || {
            rayon::join(
                || load_source(root, &stage.shadowed),
                || stage.clean.as_ref().map(|c| load_source(root, c)).transpose(),
            )
        },
    );
    let backdrop = backdrop?;
    let mut shadowed = shadowed?;
    let mut clean = clean?;

    let deskew = stage.deskew.map(|opts| {
        let result = detect_and_correct(&shadowed, clean.as_ref(), &opts);
        if let Some(rotated) = &result.rotated_image {
            shadowed = rotated.clone();
        }
        if let Some(rotated) = &result.clean_rotated_image {
            clean = Some(rotated.clone());
        }
        result
    });

    let clean = clean.unwrap_or_else(|| shadowed.clone());
    Ok(PreparedStage {
        backdrop,
        shadowed,
        clean,
        deskew,
    })
}

impl PreparedStage {
    /// Canvas for `stage`: its explicit size, else the backdrop's.
    pub fn canvas(&self, stage: &Stage) -> PlinthResult<Canvas> {
        match stage.canvas {
            Some(c) => Canvas::new(c.width, c.height),
            None => Canvas::new(self.backdrop.width, self.backdrop.height),
        }
    }

    /// Resolve the layout for `stage` from the prepared image sizes.
    pub fn layout(&self, stage: &Stage) -> PlinthResult<CompositeLayout> {
        compute_layout(
            self.canvas(stage)?,
            Size::new(f64::from(self.shadowed.width), f64::from(self.shadowed.height)),
            Size::new(f64::from(self.clean.width), f64::from(self.clean.height)),
            stage.placement,
        )
    }
}

/// Decode, orient, straighten, lay out and composite `stage` in one call.
pub fn render_stage(stage: &Stage, root: &Path) -> PlinthResult<StageRender> {
    let prepared = prepare_stage(stage, root)?;
    let layout = prepared.layout(stage)?;
    let frame = composite(
        &prepared.backdrop,
        &prepared.shadowed,
        &prepared.clean,
        &layout,
        &stage.composite_options(),
    )?;
    Ok(StageRender {
        layout,
        frame,
        deskew: prepared.deskew,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
