//! Baseline detection and rotation policy.
//!
//! One call runs `mask analysis → point sampling → line fit → policy check → rotate | skip`
//! without retries. Every exit path, including unreadable input, produces a [`DeskewResult`];
//! nothing here returns an error. All analysis buffers are locals of the call and are dropped
//! before it returns.

use crate::{
    analysis::baseline::{
        BaselineFit, BaselineFitter, DEFAULT_SEED, center_weighted, morphological_confidence,
        trim_corners,
    },
    analysis::contour::{bottom_contour, bounding_box},
    analysis::mask::AlphaMask,
    assets::decode::decode_image,
    assets::store::PreparedImage,
    deskew::rotate::rotate_image,
    foundation::error::{PlinthError, PlinthResult},
};

/// Default longest side of the analysis mask.
pub const DEFAULT_MAX_ANALYSIS_DIM: u32 = 1024;

/// Which mask-analysis and fitting pipeline to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskewVariant {
    /// Closing + largest component, center-weighted fit, blended confidence.
    #[default]
    Morphological,
    /// Raw bounding box + contour, corner-trimmed fit, consensus confidence.
    Contour,
}

/// Thresholds belonging to one [`DeskewVariant`]. Never mixed across variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantParams {
    /// Disk radius for closing, in analysis pixels (0 disables it).
    pub closing_radius: u32,
    /// Minimum alpha for connected-component membership; `None` skips component filtering.
    pub component_threshold: Option<u8>,
    /// Minimum alpha for a contour sample.
    pub contour_threshold: u8,
    /// RANSAC perpendicular inlier distance.
    pub inlier_threshold: f64,
    /// Minimum points handed to the fitter.
    pub min_points: usize,
    /// Fraction of points dropped from each end before fitting.
    pub corner_trim: f64,
    /// Confidence (0–100) below which rotation is refused.
    pub min_confidence: f64,
    /// Largest correctable tilt.
    pub max_angle_degrees: f64,
    /// Tilt below which the image counts as already straight.
    pub negligible_angle_degrees: f64,
}

impl DeskewVariant {
    /// Thresholds for this variant.
    pub fn params(self) -> VariantParams {
        match self {
            DeskewVariant::Morphological => VariantParams {
                closing_radius: 3,
                component_threshold: Some(20),
                contour_threshold: 128,
                inlier_threshold: 2.5,
                min_points: 20,
                corner_trim: 0.0,
                min_confidence: 75.0,
                max_angle_degrees: 10.0,
                negligible_angle_degrees: 0.1,
            },
            DeskewVariant::Contour => VariantParams {
                closing_radius: 0,
                component_threshold: None,
                // alpha > 200
                contour_threshold: 201,
                inlier_threshold: 5.0,
                min_points: 10,
                corner_trim: 0.15,
                min_confidence: 25.0,
                max_angle_degrees: 15.0,
                negligible_angle_degrees: 0.5,
            },
        }
    }
}

/// Caller-tunable deskew settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeskewOptions {
    /// Pipeline to run.
    #[serde(default)]
    pub variant: DeskewVariant,
    /// RANSAC seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Longest side of the analysis mask; larger inputs are downscaled first.
    #[serde(default = "default_max_analysis_dim")]
    pub max_analysis_dim: u32,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_analysis_dim() -> u32 {
    DEFAULT_MAX_ANALYSIS_DIM
}

impl Default for DeskewOptions {
    fn default() -> Self {
        Self {
            variant: DeskewVariant::default(),
            seed: DEFAULT_SEED,
            max_analysis_dim: DEFAULT_MAX_ANALYSIS_DIM,
        }
    }
}

/// Terminal state of a deskew call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskewOutcome {
    /// Images were rotated.
    Rotated,
    /// Tilt too small to be worth resampling.
    AlreadyStraight,
    /// Fit was not trustworthy enough.
    LowConfidence,
    /// Tilt beyond the correctable range.
    AngleOutOfRange,
    /// No object, too few samples, or no usable line.
    InsufficientEvidence,
    /// Input could not be decoded or rotated.
    Unreadable,
}

/// Result of one deskew call. Rotated buffers are freshly allocated and owned by the caller.
#[derive(Clone, Debug)]
pub struct DeskewResult {
    /// Rotated primary (shadowed) image, when rotation was applied.
    pub rotated_image: Option<PreparedImage>,
    /// Rotated clean image, when one was supplied and rotation was applied.
    pub clean_rotated_image: Option<PreparedImage>,
    /// Detected baseline tilt; positive when the right end sits lower.
    pub angle_degrees: f64,
    /// Fit confidence, 0–100.
    pub confidence_percent: f64,
    /// Human-readable explanation of the decision.
    pub reason: String,
    /// Machine-readable decision.
    pub outcome: DeskewOutcome,
}

impl DeskewResult {
    fn skipped(outcome: DeskewOutcome, angle: f64, confidence: f64, reason: String) -> Self {
        Self {
            rotated_image: None,
            clean_rotated_image: None,
            angle_degrees: angle,
            confidence_percent: confidence,
            reason,
            outcome,
        }
    }

    /// `true` when rotated buffers are present.
    pub fn is_rotated(&self) -> bool {
        self.rotated_image.is_some()
    }

    /// Rotation applied (or that would be applied) to straighten the baseline.
    pub fn correction_degrees(&self) -> f64 {
        -self.angle_degrees
    }
}

/// A measured baseline before any policy is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineMeasurement {
    /// Winning line.
    pub fit: BaselineFit,
    /// Tilt in degrees.
    pub angle_degrees: f64,
    /// Confidence, 0–100.
    pub confidence_percent: f64,
    /// Width of the mask the fit ran on.
    pub analysed_width: u32,
}

/// Measure the resting baseline of `img` without deciding anything.
///
/// Insufficient evidence comes back as [`PlinthError::Evaluation`] carrying the
/// human-readable reason.
pub fn measure_baseline(
    img: &PreparedImage,
    opts: &DeskewOptions,
) -> PlinthResult<BaselineMeasurement> {
    let params = opts.variant.params();
    let mask = {
        let full = AlphaMask::from_image(img);
        let (small, factor) = full.downscaled(opts.max_analysis_dim);
        tracing::debug!(
            width = small.width,
            height = small.height,
            factor,
            "analysis mask"
        );
        small
    };

    let mask = if params.closing_radius > 0 {
        mask.close(params.closing_radius)
    } else {
        mask
    };
    let mask = match params.component_threshold {
        Some(threshold) => match mask.largest_component(threshold) {
            Some((kept, _)) => kept,
            None => return Err(PlinthError::evaluation("no object detected in alpha mask")),
        },
        None => mask,
    };

    let bbox_threshold = match params.component_threshold {
        Some(_) => 1,
        None => params.contour_threshold,
    };
    let Some(bbox) = bounding_box(&mask, bbox_threshold) else {
        return Err(PlinthError::evaluation("no object detected in alpha mask"));
    };
    let contour = bottom_contour(&mask, bbox, params.contour_threshold);
    let analysed_width = mask.width;
    drop(mask);

    let samples = match opts.variant {
        DeskewVariant::Morphological => {
            if contour.len() < params.min_points {
                return Err(PlinthError::evaluation(format!(
                    "only {} baseline samples, need {}",
                    contour.len(),
                    params.min_points
                )));
            }
            center_weighted(&contour)
        }
        DeskewVariant::Contour => {
            let trimmed = trim_corners(&contour, params.corner_trim);
            if trimmed.len() < params.min_points {
                return Err(PlinthError::evaluation(format!(
                    "only {} baseline samples after corner trim, need {}",
                    trimmed.len(),
                    params.min_points
                )));
            }
            trimmed
        }
    };

    let fitter = BaselineFitter {
        min_points: params.min_points,
        seed: opts.seed,
        ..BaselineFitter::new(params.inlier_threshold)
    };
    let Some(fit) = fitter.fit(&samples) else {
        return Err(PlinthError::evaluation("no valid baseline line could be fitted"));
    };

    let angle_degrees = fit.angle_degrees();
    let confidence_percent = match opts.variant {
        DeskewVariant::Morphological => {
            morphological_confidence(&fit, params.inlier_threshold, f64::from(analysed_width))
        }
        DeskewVariant::Contour => fit.consensus_ratio * 100.0,
    };
    tracing::debug!(
        slope = fit.slope,
        inliers = fit.inlier_count,
        considered = fit.total_considered,
        angle_degrees,
        confidence_percent,
        "baseline fit"
    );

    Ok(BaselineMeasurement {
        fit,
        angle_degrees,
        confidence_percent,
        analysed_width,
    })
}

/// Detect the baseline tilt of `image` and rotate it (and `clean`) upright when policy allows.
///
/// Detection runs on `clean` when supplied, since a drop shadow skews the bottom contour; both
/// images are then rotated by the identical angle about their own centers.
#[tracing::instrument(skip(image, clean), fields(width = image.width, height = image.height))]
pub fn detect_and_correct(
    image: &PreparedImage,
    clean: Option<&PreparedImage>,
    opts: &DeskewOptions,
) -> DeskewResult {
    let params = opts.variant.params();
    let analysed = clean.unwrap_or(image);

    let m = match measure_baseline(analysed, opts) {
        Ok(m) => m,
        Err(err) => {
            let reason = match err {
                PlinthError::Evaluation(reason) => reason,
                other => other.to_string(),
            };
            tracing::info!(%reason, "deskew skipped");
            return DeskewResult::skipped(DeskewOutcome::InsufficientEvidence, 0.0, 0.0, reason);
        }
    };
    let angle = m.angle_degrees;
    let confidence = m.confidence_percent;

    if confidence < params.min_confidence {
        let reason = format!(
            "confidence {confidence:.1}% below {:.0}% (angle {angle:.2}°)",
            params.min_confidence
        );
        tracing::info!(%reason, "deskew skipped");
        return DeskewResult::skipped(DeskewOutcome::LowConfidence, angle, confidence, reason);
    }
    if angle.abs() > params.max_angle_degrees {
        let reason = format!(
            "angle {angle:.2}° exceeds ±{:.0}° limit",
            params.max_angle_degrees
        );
        tracing::info!(%reason, "deskew skipped");
        return DeskewResult::skipped(DeskewOutcome::AngleOutOfRange, angle, confidence, reason);
    }
    if angle.abs() < params.negligible_angle_degrees {
        let reason = format!("no rotation needed (angle {angle:.2}°)");
        tracing::info!(%reason, "deskew skipped");
        return DeskewResult::skipped(DeskewOutcome::AlreadyStraight, angle, confidence, reason);
    }

    let correction = -angle;
    let rotated = match rotate_image(image, correction) {
        Ok(r) => r,
        Err(e) => {
            return DeskewResult::skipped(
                DeskewOutcome::Unreadable,
                angle,
                confidence,
                format!("rotation failed: {e}"),
            );
        }
    };
    let clean_rotated = match clean.map(|c| rotate_image(c, correction)).transpose() {
        Ok(r) => r,
        Err(e) => {
            return DeskewResult::skipped(
                DeskewOutcome::Unreadable,
                angle,
                confidence,
                format!("clean image rotation failed: {e}"),
            );
        }
    };

    tracing::info!(angle, confidence, "deskew applied");
    DeskewResult {
        rotated_image: Some(rotated),
        clean_rotated_image: clean_rotated,
        angle_degrees: angle,
        confidence_percent: confidence,
        reason: format!("rotated by {correction:.2}° (confidence {confidence:.1}%)"),
        outcome: DeskewOutcome::Rotated,
    }
}

/// Byte-level entry point: decode failures become an [`DeskewOutcome::Unreadable`] result.
pub fn detect_and_correct_bytes(
    image: &[u8],
    clean: Option<&[u8]>,
    opts: &DeskewOptions,
) -> DeskewResult {
    let (image, clean) = rayon::join(
        || decode_image(image),
        || clean.map(decode_image).transpose(),
    );
    match (image, clean) {
        (Ok(image), Ok(clean)) => detect_and_correct(&image, clean.as_ref(), opts),
        (Err(e), _) | (_, Err(e)) => DeskewResult::skipped(
            DeskewOutcome::Unreadable,
            0.0,
            0.0,
            format!("could not load image: {e}"),
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deskew/orchestrator.rs"]
mod tests;
