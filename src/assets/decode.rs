use std::path::Path;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{PlinthError, PlinthResult},
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PlinthResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PlinthError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> PlinthResult<PreparedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| PlinthError::decode(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

/// Decode two independent images concurrently; both must succeed.
pub fn decode_pair(a: &[u8], b: &[u8]) -> PlinthResult<(PreparedImage, PreparedImage)> {
    let (a, b) = rayon::join(|| decode_image(a), || decode_image(b));
    Ok((a?, b?))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
