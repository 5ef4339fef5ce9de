use image::Rgba;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

use crate::{
    assets::store::PreparedImage,
    foundation::core::{Affine, Vec2},
    foundation::error::{PlinthError, PlinthResult},
};

/// Axis-aligned bounds of a `width`×`height` image rotated by `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let w = f64::from(width);
    let h = f64::from(height);
    // Shave float noise so exact quarter turns do not gain a pixel.
    let new_w = (w * cos + h * sin - 1e-9).ceil().max(1.0);
    let new_h = (w * sin + h * cos - 1e-9).ceil().max(1.0);
    (new_w as u32, new_h as u32)
}

/// Rotate `img` by `degrees` about its center onto an expanded transparent canvas.
///
/// Positive angles turn clockwise on screen (image y points down). Sampling is bilinear in
/// premultiplied space, and the source gets a transparent one-pixel ring so rotated edges
/// fade out instead of clipping hard.
pub fn rotate_image(img: &PreparedImage, degrees: f64) -> PlinthResult<PreparedImage> {
    if !degrees.is_finite() {
        return Err(PlinthError::validation("rotation angle must be finite"));
    }
    if img.width == 0 || img.height == 0 {
        return Err(PlinthError::validation("cannot rotate an empty image"));
    }
    let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.as_ref().clone())
        .ok_or_else(|| PlinthError::surface("image buffer does not match its dimensions"))?;
    let mut padded = image::RgbaImage::new(img.width + 2, img.height + 2);
    image::imageops::replace(&mut padded, &src, 1, 1);

    // Pixel centers sit on integer coordinates for the warp.
    let (out_w, out_h) = rotated_bounds(img.width, img.height, degrees);
    let src_center = Vec2::new(
        (f64::from(img.width) + 1.0) / 2.0,
        (f64::from(img.height) + 1.0) / 2.0,
    );
    let dst_center = Vec2::new(
        (f64::from(out_w) - 1.0) / 2.0,
        (f64::from(out_h) - 1.0) / 2.0,
    );
    let forward = Affine::translate(dst_center)
        * Affine::rotate(degrees.to_radians())
        * Affine::translate(-src_center);
    let [a, b, c, d, e, f] = forward.as_coeffs();

    #[rustfmt::skip]
    let projection = Projection::from_matrix([
        a as f32, c as f32, e as f32,
        b as f32, d as f32, f as f32,
        0.0,      0.0,      1.0,
    ])
    .ok_or_else(|| PlinthError::surface("rotation is not invertible"))?;

    let mut out = image::RgbaImage::new(out_w, out_h);
    warp_into(
        &padded,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut out,
    );
    PreparedImage::from_premul(out_w, out_h, out.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/deskew/rotate.rs"]
mod tests;
