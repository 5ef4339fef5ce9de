use std::borrow::Cow;

use image::{Rgba, imageops::FilterType};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

use crate::{
    assets::store::PreparedImage,
    effects::blur::{blur_rgba8_premul, radius_for_sigma},
    effects::composite::{VerticalFade, over},
    foundation::core::PixelRect,
    foundation::error::{PlinthError, PlinthResult},
    render::passes::{DrawSurface, FrameRGBA},
};

/// Premultiplied RGBA8 raster that executes plans on the CPU.
#[derive(Clone, Debug)]
pub struct CpuSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CpuSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> PlinthResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlinthError::surface("surface width/height must be > 0"));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PlinthError::surface("surface size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }
}

/// Canvas-space span of a draw after clipping, half-open on both axes.
#[derive(Clone, Copy, Debug)]
struct Window {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Window {
    fn width(self) -> usize {
        (self.x1 - self.x0) as usize
    }

    fn height(self) -> usize {
        (self.y1 - self.y0) as usize
    }
}

fn as_rgba_image(image: &PreparedImage) -> PlinthResult<image::RgbaImage> {
    image::RgbaImage::from_raw(
        image.width,
        image.height,
        image.rgba8_premul.as_ref().clone(),
    )
    .ok_or_else(|| PlinthError::surface("image buffer does not match its dimensions"))
}

fn scaled_pixels(image: &PreparedImage, width: u32, height: u32) -> PlinthResult<Cow<'_, [u8]>> {
    if image.width == width && image.height == height {
        return Ok(Cow::Borrowed(image.rgba8_premul.as_slice()));
    }
    let src = as_rgba_image(image)?;
    let resized = image::imageops::resize(&src, width, height, FilterType::Triangle);
    Ok(Cow::Owned(resized.into_raw()))
}

/// Pixels to blend into `win`, row-major and already mirrored when asked.
///
/// Fully visible draws and downscales resize the whole image, so their cost is bounded by the
/// canvas or the source. A clipped upscale only samples the visible window.
fn visible_pixels(
    image: &PreparedImage,
    dest: PixelRect,
    win: Window,
    mirror_y: bool,
) -> PlinthResult<Vec<u8>> {
    let (dw, dh) = (dest.width as u32, dest.height as u32);
    let fully_visible = win.width() == dw as usize && win.height() == dh as usize;
    if !fully_visible && (dw > image.width || dh > image.height) {
        return warp_window(image, dest, win, mirror_y);
    }

    let full = scaled_pixels(image, dw, dh)?;
    let col0 = (win.x0 - i64::from(dest.x)) as usize;
    let mut out = Vec::with_capacity(win.width() * win.height() * 4);
    for y in win.y0..win.y1 {
        let row = (y - i64::from(dest.y)) as u32;
        let src_row = (if mirror_y { dh - 1 - row } else { row }) as usize;
        let start = (src_row * dw as usize + col0) * 4;
        out.extend_from_slice(&full[start..start + win.width() * 4]);
    }
    Ok(out)
}

/// Bilinear resample of the part of `dest` that lands inside `win`.
fn warp_window(
    image: &PreparedImage,
    dest: PixelRect,
    win: Window,
    mirror_y: bool,
) -> PlinthResult<Vec<u8>> {
    let src = edge_padded(image);
    let sx = f64::from(dest.width) / f64::from(image.width);
    let sy = f64::from(dest.height) / f64::from(image.height);
    let ox = (win.x0 - i64::from(dest.x)) as f64;
    let oy = (win.y0 - i64::from(dest.y)) as f64;

    // Padded pixel p is source pixel p - 1. Pixel centers sit on integers, so it lands at
    // (p - 0.5) * scale - 0.5 in dest space.
    let tx = -0.5 * sx - 0.5 - ox;
    let (syy, ty) = if mirror_y {
        (-sy, f64::from(dest.height) - 0.5 + 0.5 * sy - oy)
    } else {
        (sy, -0.5 * sy - 0.5 - oy)
    };
    #[rustfmt::skip]
    let projection = Projection::from_matrix([
        sx as f32, 0.0,        tx as f32,
        0.0,       syy as f32, ty as f32,
        0.0,       0.0,        1.0,
    ])
    .ok_or_else(|| PlinthError::surface("draw transform is not invertible"))?;

    let mut out = image::RgbaImage::new(win.width() as u32, win.height() as u32);
    warp_into(
        &src,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut out,
    );
    Ok(out.into_raw())
}

/// Copy of `image` with a one-pixel border repeating its edges.
fn edge_padded(image: &PreparedImage) -> image::RgbaImage {
    let (w, h) = (image.width, image.height);
    let src = image.rgba8_premul.as_slice();
    image::RgbaImage::from_fn(w + 2, h + 2, |x, y| {
        let sx = x.saturating_sub(1).min(w - 1);
        let sy = y.saturating_sub(1).min(h - 1);
        let i = ((sy * w + sx) * 4) as usize;
        Rgba([src[i], src[i + 1], src[i + 2], src[i + 3]])
    })
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, image),
        fields(src_w = image.width, src_h = image.height)
    )]
    fn draw_image(
        &mut self,
        image: &PreparedImage,
        dest: PixelRect,
        mirror_y: bool,
        fade: Option<VerticalFade>,
    ) -> PlinthResult<()> {
        if dest.is_empty() || image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let (cw, ch) = (self.width as i64, self.height as i64);
        let x0 = i64::from(dest.x).max(0);
        let y0 = i64::from(dest.y).max(0);
        let x1 = i64::from(dest.right()).min(cw);
        let y1 = i64::from(dest.bottom()).min(ch);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let win = Window { x0, y0, x1, y1 };
        let pixels = visible_pixels(image, dest, win, mirror_y)?;
        let dh = dest.height as u32;

        for (y, src_row) in (y0..y1).zip(pixels.chunks_exact(win.width() * 4)) {
            let row = (y - i64::from(dest.y)) as u32;
            let opacity = fade.map_or(1.0, |f| f.factor_at(row, dh));
            if opacity <= 0.0 {
                continue;
            }
            let di = (y as usize * self.width as usize + x0 as usize) * 4;
            let dst_row = &mut self.data[di..di + win.width() * 4];
            for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
                d.copy_from_slice(&out);
            }
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn blur(&mut self, sigma_px: f32) -> PlinthResult<()> {
        let radius = radius_for_sigma(sigma_px);
        if radius == 0 {
            return Ok(());
        }
        self.data = blur_rgba8_premul(&self.data, self.width, self.height, radius, sigma_px)?;
        Ok(())
    }

    fn readback(&mut self) -> PlinthResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
