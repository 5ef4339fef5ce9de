//! Image decoding, orientation normalisation and the per-session image store.

/// Encoded bytes to premultiplied RGBA8.
pub mod decode;
/// EXIF orientation codes applied to pixel buffers.
pub mod orientation;
/// Decoded image type and session cache.
pub mod store;
