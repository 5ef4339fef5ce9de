use crate::{
    assets::store::PreparedImage,
    effects::composite::VerticalFade,
    foundation::core::PixelRect,
    foundation::error::{PlinthError, PlinthResult},
    render::plan::{CompositePlan, DrawOp, ImageSlot},
};

/// Final composite returned by a [`DrawSurface`].
///
/// Frames are premultiplied alpha when produced by the compositor; the flag makes that explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Copy of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            crate::assets::store::unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }
}

/// The three decoded inputs a plan draws from.
#[derive(Clone, Copy, Debug)]
pub struct CompositeInputs<'a> {
    /// Backdrop photo.
    pub backdrop: &'a PreparedImage,
    /// Subject with shadow padding.
    pub shadowed: &'a PreparedImage,
    /// Bare product cutout, used for the reflection.
    pub clean: &'a PreparedImage,
}

impl<'a> CompositeInputs<'a> {
    fn get(&self, slot: ImageSlot) -> &'a PreparedImage {
        match slot {
            ImageSlot::Backdrop => self.backdrop,
            ImageSlot::Shadowed => self.shadowed,
            ImageSlot::Clean => self.clean,
        }
    }
}

/// A raster target that can execute [`DrawOp`]s.
pub trait DrawSurface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Scale `image` into `dest` and source-over it; parts outside the surface are clipped.
    fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: PixelRect,
        mirror_y: bool,
        fade: Option<VerticalFade>,
    ) -> PlinthResult<()>;

    /// Gaussian blur of the current contents.
    fn blur(&mut self, sigma_px: f32) -> PlinthResult<()>;

    /// Copy out the current contents.
    fn readback(&mut self) -> PlinthResult<FrameRGBA>;
}

/// Run every op of `plan` on `surface` in order and read back the result.
pub fn execute_plan<S: DrawSurface + ?Sized>(
    surface: &mut S,
    plan: &CompositePlan,
    inputs: CompositeInputs<'_>,
) -> PlinthResult<FrameRGBA> {
    if surface.size() != (plan.width, plan.height) {
        return Err(PlinthError::surface(format!(
            "surface is {:?}, plan expects {}x{}",
            surface.size(),
            plan.width,
            plan.height
        )));
    }

    for op in &plan.ops {
        match *op {
            DrawOp::Image {
                slot,
                dest,
                mirror_y,
                fade,
            } => surface.draw_image(inputs.get(slot), dest, mirror_y, fade)?,
            DrawOp::Blur { sigma_px } => surface.blur(sigma_px)?,
        }
    }

    surface.readback()
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
