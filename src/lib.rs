//! Plinth stages product photos: it places a cutout product on a backdrop with a drop shadow
//! and a fading reflection, and straightens products whose resting baseline is tilted.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: encoded bytes -> [`PreparedImage`] (premultiplied RGBA8), inputs in parallel
//! 2. **Orient**: EXIF orientation codes applied with [`apply_orientation`]
//! 3. **Deskew** (optional): [`detect_and_correct`] measures the bottom contour of the alpha
//!    mask, fits a line with RANSAC and rotates the subject upright when policy allows
//! 4. **Layout**: [`compute_layout`] turns a [`Placement`] into integer rectangles
//! 5. **Composite**: [`composite`] draws backdrop, optional blur, reflection and subject through
//!    a [`DrawSurface`] (CPU by default) into a [`FrameRGBA`]
//!
//! [`render_stage`] runs all five steps from a JSON [`Stage`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: layout is pure, and deskew's RANSAC runs from a fixed seed.
//! - **Premultiplied RGBA8** end-to-end; export converts to straight alpha.
//! - Deskew never errors: every failure is folded into [`DeskewResult::reason`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod analysis;
mod assets;
mod composition;
mod deskew;
mod effects;
mod foundation;
mod layout;
mod preview;
mod render;

pub use analysis::baseline::{
    BaselineFit, BaselineFitter, DEFAULT_SEED, RANSAC_ITERATIONS, center_weighted,
    morphological_confidence, trim_corners,
};
pub use analysis::contour::{BoundingBox, bottom_contour, bounding_box};
pub use analysis::mask::AlphaMask;
pub use assets::decode::{decode_image, decode_pair, load_image};
pub use assets::orientation::{
    apply_orientation, normalize_orientation, orientation_transform, oriented_size, swaps_axes,
};
pub use assets::store::{PreparedImage, SessionAssetStore};
pub use composition::model::{ImageSource, Stage};
pub use deskew::orchestrator::{
    BaselineMeasurement, DEFAULT_MAX_ANALYSIS_DIM, DeskewOptions, DeskewOutcome, DeskewResult,
    DeskewVariant, VariantParams, detect_and_correct, detect_and_correct_bytes, measure_baseline,
};
pub use deskew::rotate::{rotate_image, rotated_bounds};
pub use effects::blur::{blur_rgba8_premul, radius_for_sigma};
pub use effects::composite::{PremulRgba8, VerticalFade, over, over_in_place};
pub use foundation::core::{Affine, Canvas, PixelRect, Placement, Point, Vec2};
pub use foundation::error::{PlinthError, PlinthResult};
pub use layout::scale::{
    DEFAULT_MIN_VALUE, REFERENCE_WIDTH, ScaledValueResolver, resolve_scaled_value,
};
pub use layout::solver::{CompositeLayout, Size, compute_layout};
pub use preview::shadow_url::{DELIVERY_HOST, ShadowParams, shadow_preview_url};
pub use render::compositor::composite;
pub use render::cpu::CpuSurface;
pub use render::export::{encode_png, save_png};
pub use render::passes::{CompositeInputs, DrawSurface, FrameRGBA, execute_plan};
pub use render::pipeline::{PreparedStage, StageRender, prepare_stage, render_stage};
pub use render::plan::{
    CompositeOptions, CompositePlan, DEFAULT_BLUR_BASE_RADIUS, DrawOp, ImageSlot,
    ReflectionOptions, plan_composite,
};
