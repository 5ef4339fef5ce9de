//! Compositing: plan construction, the drawing-surface seam and its CPU implementation.

/// Public compositing entry point.
pub mod compositor;
/// CPU raster surface.
pub mod cpu;
/// PNG export.
pub mod export;
/// Surface trait, frame type and plan executor.
pub mod passes;
/// End-to-end stage rendering.
pub mod pipeline;
/// Draw-op planning.
pub mod plan;
