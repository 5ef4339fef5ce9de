use crate::foundation::error::{PlinthError, PlinthResult};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of premultiplied `src` onto `dst`, with `src` scaled by `opacity` first.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over of two equal-length premultiplied RGBA8 buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PlinthResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PlinthError::surface(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Top-to-bottom linear alpha ramp used to fade a reflection.
///
/// Alpha starts at `opacity` on the first row and reaches zero after `falloff` of the height;
/// rows below that are fully transparent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VerticalFade {
    /// Alpha multiplier at the top edge, in `[0, 1]`.
    pub opacity: f32,
    /// Fraction of the height over which alpha falls to zero, in `(0, 1]`.
    pub falloff: f32,
}

impl VerticalFade {
    /// Alpha multiplier for row `row` of a `height`-row draw.
    pub fn factor_at(self, row: u32, height: u32) -> f32 {
        let opacity = self.opacity.clamp(0.0, 1.0);
        let falloff = self.falloff.clamp(0.0, 1.0);
        let extent = falloff * height as f32;
        if opacity <= 0.0 || extent <= 0.0 {
            return 0.0;
        }
        let t = (row as f32 + 0.5) / extent;
        (opacity * (1.0 - t)).max(0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
