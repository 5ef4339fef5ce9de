use std::{collections::HashMap, sync::Arc};

use crate::foundation::error::{PlinthError, PlinthResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap an already premultiplied buffer, checking its length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> PlinthResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PlinthError::validation("image size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(PlinthError::validation(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiply a straight-alpha RGBA8 buffer and wrap it.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> PlinthResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Alpha channel as one byte per pixel.
    pub fn alpha(&self) -> Vec<u8> {
        self.rgba8_premul.chunks_exact(4).map(|px| px[3]).collect()
    }

    /// Copy out as straight (un-premultiplied) RGBA8.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((u16::from(px[0]) * a + 127) / 255) as u8;
        px[1] = ((u16::from(px[1]) * a + 127) / 255) as u8;
        px[2] = ((u16::from(px[2]) * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in 0..3 {
            px[c] = ((u32::from(px[c]) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Session-scoped image cache keyed by opaque upload identifiers.
///
/// Owned by the orchestrating layer: created at session start, cleared on reset. Layout,
/// compositing and deskew never look anything up here; callers resolve images first and hand
/// over plain buffers.
#[derive(Clone, Debug, Default)]
pub struct SessionAssetStore {
    images: HashMap<String, PreparedImage>,
}

impl SessionAssetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the image stored under `key`, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        image: PreparedImage,
    ) -> Option<PreparedImage> {
        self.images.insert(key.into(), image)
    }

    /// Lookup the image stored under `key`.
    pub fn get(&self, key: &str) -> PlinthResult<&PreparedImage> {
        self.images
            .get(key)
            .ok_or_else(|| PlinthError::evaluation(format!("unknown session asset '{key}'")))
    }

    /// `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    /// Remove and return the image stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<PreparedImage> {
        self.images.remove(key)
    }

    /// Drop every cached image (session reset).
    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
