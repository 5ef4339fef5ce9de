//! EXIF orientation codes (1–8) as fixed 2D affine transforms.
//!
//! Reading the tag out of JPEG bytes is left to the caller; this module only consumes the
//! integer code. Unknown codes behave like code 1.

use image::imageops::{flip_horizontal, flip_vertical, rotate90, rotate180, rotate270};

use crate::{
    assets::store::PreparedImage,
    foundation::core::Affine,
    foundation::error::{PlinthError, PlinthResult},
};

/// Normalize a raw orientation tag, mapping anything outside 1–8 to 1.
pub fn normalize_orientation(code: u32) -> u8 {
    match code {
        1..=8 => code as u8,
        _ => 1,
    }
}

/// `true` for the four codes that swap width and height.
pub fn swaps_axes(code: u32) -> bool {
    matches!(normalize_orientation(code), 5..=8)
}

/// Dimensions of a `width`×`height` image once `code` is applied.
pub fn oriented_size(code: u32, width: u32, height: u32) -> (u32, u32) {
    if swaps_axes(code) {
        (height, width)
    } else {
        (width, height)
    }
}

/// Transform mapping stored pixel space onto display space for `code`.
pub fn orientation_transform(code: u32, width: u32, height: u32) -> Affine {
    let w = f64::from(width);
    let h = f64::from(height);
    match normalize_orientation(code) {
        2 => Affine::new([-1.0, 0.0, 0.0, 1.0, w, 0.0]),
        3 => Affine::new([-1.0, 0.0, 0.0, -1.0, w, h]),
        4 => Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, h]),
        5 => Affine::new([0.0, 1.0, 1.0, 0.0, 0.0, 0.0]),
        6 => Affine::new([0.0, 1.0, -1.0, 0.0, h, 0.0]),
        7 => Affine::new([0.0, -1.0, -1.0, 0.0, h, w]),
        8 => Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, w]),
        _ => Affine::IDENTITY,
    }
}

/// Reorder the pixels of `img` into display orientation.
pub fn apply_orientation(img: &PreparedImage, code: u32) -> PlinthResult<PreparedImage> {
    let code = normalize_orientation(code);
    if code == 1 {
        return Ok(img.clone());
    }
    let stored =
        image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.as_ref().clone())
            .ok_or_else(|| PlinthError::validation("image buffer does not match its dimensions"))?;
    let shown = match code {
        2 => flip_horizontal(&stored),
        3 => rotate180(&stored),
        4 => flip_vertical(&stored),
        5 => flip_horizontal(&rotate90(&stored)),
        6 => rotate90(&stored),
        7 => flip_horizontal(&rotate270(&stored)),
        8 => rotate270(&stored),
        _ => stored,
    };
    let (width, height) = shown.dimensions();
    PreparedImage::from_premul(width, height, shown.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/orientation.rs"]
mod tests;
