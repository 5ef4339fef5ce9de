//! RANSAC baseline fitting over bottom-contour samples.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::core::Point;

/// Iterations per fit.
pub const RANSAC_ITERATIONS: usize = 200;

/// Default RNG seed; fits are reproducible for identical input.
pub const DEFAULT_SEED: u64 = 0x5EED_BA5E;

/// Best line found by [`BaselineFitter::fit`], as `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineFit {
    /// Line slope in image space (y grows downwards).
    pub slope: f64,
    /// Line intercept at `x = 0`.
    pub intercept: f64,
    /// Points within the inlier threshold.
    pub inlier_count: usize,
    /// `inlier_count / total_considered`.
    pub consensus_ratio: f64,
    /// Mean perpendicular distance of the inliers.
    pub mean_inlier_residual: f64,
    /// Horizontal extent covered by the inliers.
    pub inlier_x_span: f64,
    /// Points the fit was run over, after any pre-processing.
    pub total_considered: usize,
}

impl BaselineFit {
    /// Tilt of the line in degrees; positive when the right end sits lower.
    pub fn angle_degrees(&self) -> f64 {
        self.slope.atan().to_degrees()
    }
}

/// Random-sample-consensus line fitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineFitter {
    /// Candidate lines tried.
    pub iterations: usize,
    /// Max perpendicular distance for a point to count as an inlier.
    pub inlier_threshold: f64,
    /// Fewer input points than this and no fit is attempted.
    pub min_points: usize,
    /// RNG seed.
    pub seed: u64,
}

impl BaselineFitter {
    /// Fitter with `inlier_threshold` and the default iteration count, seed and a
    /// 10 point minimum.
    pub fn new(inlier_threshold: f64) -> Self {
        Self {
            iterations: RANSAC_ITERATIONS,
            inlier_threshold,
            min_points: 10,
            seed: DEFAULT_SEED,
        }
    }

    /// Fit a line through `points`.
    ///
    /// Returns `None` when there are fewer than `min_points` points or no sampled pair was
    /// ever at least one pixel apart horizontally.
    pub fn fit(&self, points: &[Point]) -> Option<BaselineFit> {
        let n = points.len();
        if n < self.min_points.max(2) {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<(f64, f64, usize)> = None;

        for _ in 0..self.iterations {
            let a = rng.gen_range(0..n);
            let mut b = rng.gen_range(0..n - 1);
            if b >= a {
                b += 1;
            }
            let (pa, pb) = (points[a], points[b]);
            let dx = pb.x - pa.x;
            if dx.abs() < 1.0 {
                continue;
            }
            let slope = (pb.y - pa.y) / dx;
            let intercept = pa.y - slope * pa.x;
            let count = count_inliers(points, slope, intercept, self.inlier_threshold);
            if best.is_none_or(|(_, _, c)| count > c) {
                best = Some((slope, intercept, count));
            }
        }

        let (slope, intercept, _) = best?;
        let sampled = self.stats_for(points, slope, intercept);
        let refined = refine_least_squares(points, slope, intercept, self.inlier_threshold)
            .map(|(s, i)| self.stats_for(points, s, i));

        match refined {
            Some(r) if r.inlier_count >= sampled.inlier_count => Some(r),
            _ => Some(sampled),
        }
    }

    fn stats_for(&self, points: &[Point], slope: f64, intercept: f64) -> BaselineFit {
        let mut count = 0usize;
        let mut residual_sum = 0.0;
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        for p in points {
            let r = residual(*p, slope, intercept);
            if r <= self.inlier_threshold {
                count += 1;
                residual_sum += r;
                min_x = min_x.min(p.x);
                max_x = max_x.max(p.x);
            }
        }
        let (mean, span) = if count > 0 {
            (residual_sum / count as f64, max_x - min_x)
        } else {
            (0.0, 0.0)
        };
        BaselineFit {
            slope,
            intercept,
            inlier_count: count,
            consensus_ratio: count as f64 / points.len() as f64,
            mean_inlier_residual: mean,
            inlier_x_span: span,
            total_considered: points.len(),
        }
    }
}

fn residual(p: Point, slope: f64, intercept: f64) -> f64 {
    (slope * p.x - p.y + intercept).abs() / (slope * slope + 1.0).sqrt()
}

fn count_inliers(points: &[Point], slope: f64, intercept: f64, threshold: f64) -> usize {
    points
        .iter()
        .filter(|p| residual(**p, slope, intercept) <= threshold)
        .count()
}

/// Ordinary least squares over the inliers of the sampled line.
fn refine_least_squares(
    points: &[Point],
    slope: f64,
    intercept: f64,
    threshold: f64,
) -> Option<(f64, f64)> {
    let inliers: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| residual(*p, slope, intercept) <= threshold)
        .collect();
    if inliers.len() < 2 {
        return None;
    }
    let n = inliers.len() as f64;
    let mean_x = inliers.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = inliers.iter().map(|p| p.y).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for p in &inliers {
        sxx += (p.x - mean_x) * (p.x - mean_x);
        sxy += (p.x - mean_x) * (p.y - mean_y);
    }
    if sxx < 1e-9 {
        return None;
    }
    let m = sxy / sxx;
    Some((m, mean_y - m * mean_x))
}

/// Duplicate points by a cosine weight peaking at the horizontal center.
///
/// A point at the center appears four times, one at either end once, damping the rounded
/// corners found at the left and right of most product bases.
pub fn center_weighted(points: &[Point]) -> Vec<Point> {
    let Some((min_x, max_x)) = x_range(points) else {
        return Vec::new();
    };
    let half = (max_x - min_x) / 2.0;
    if half <= 0.0 {
        return points.to_vec();
    }
    let cx = min_x + half;
    let mut out = Vec::with_capacity(points.len() * 3);
    for p in points {
        let d = ((p.x - cx).abs() / half).min(1.0);
        let w = (d * std::f64::consts::FRAC_PI_2).cos();
        let copies = 1 + (w * 3.0).round() as usize;
        out.extend(std::iter::repeat_n(*p, copies));
    }
    out
}

/// Sort by x and drop `fraction` of the points from each end.
pub fn trim_corners(points: &[Point], fraction: f64) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    let k = (sorted.len() as f64 * fraction.clamp(0.0, 0.5)).floor() as usize;
    if 2 * k >= sorted.len() {
        return Vec::new();
    }
    sorted[k..sorted.len() - k].to_vec()
}

/// Confidence (0–100) for a fit over a smoothed, single-component mask.
///
/// Blends consensus and residual tightness 60/40, halves it when the inliers span less than
/// 40 % of `analysed_width`, and scales by 0.6 beyond 8° of tilt.
pub fn morphological_confidence(
    fit: &BaselineFit,
    inlier_threshold: f64,
    analysed_width: f64,
) -> f64 {
    let residual_score = (1.0 - fit.mean_inlier_residual / inlier_threshold).max(0.0);
    let mut confidence = (fit.consensus_ratio * 0.6 + residual_score * 0.4) * 100.0;
    if fit.inlier_x_span < 0.4 * analysed_width {
        confidence *= 0.5;
    }
    if fit.angle_degrees().abs() > 8.0 {
        confidence *= 0.6;
    }
    confidence
}

fn x_range(points: &[Point]) -> Option<(f64, f64)> {
    let first = points.first()?;
    Some(
        points
            .iter()
            .fold((first.x, first.x), |(lo, hi), p| (lo.min(p.x), hi.max(p.x))),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/baseline.rs"]
mod tests;
