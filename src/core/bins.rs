//! core/bins.rs — frequency-grid analysis.
//!
//! Recovers bin edges and widths from a sequence of bin-center frequencies by
//! testing two grid hypotheses in order: constant step, then exponential
//! (`center[i] = c1·exp(c2·i)`, 1-indexed — the spacing used by heave buoys
//! such as the Datawell Waverider). Axes matching neither shape are rejected.

use crate::core::DebinError;

/// Detected spacing law of a frequency axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridShape {
    /// Evenly spaced centers; `step` is the mean successive difference.
    Constant { step: f64 },
    /// Geometric progression `c1·exp(c2·i)` for 1-indexed bin i.
    Exponential { c1: f64, c2: f64 },
}

/// A frequency axis with recovered bin edges.
///
/// All four arrays have one entry per bin; `width[i] = right[i] - left[i] > 0`.
/// `centers` are the regenerated centers of the detected hypothesis, not the
/// raw input (they differ by at most the detection tolerance).
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyBins {
    pub centers: Vec<f64>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub width: Vec<f64>,
    pub shape: GridShape,
}

impl FrequencyBins {
    /// Default bound on the absolute frequency-step deviation.
    pub const DEFAULT_ABS_TOLERANCE: f64 = 1e-3;

    /// Detect the grid shape of `bin_centers` and derive bin edges.
    ///
    /// `absolute_tolerance` bounds the deviation of the actual centers from
    /// the fitted hypothesis, in the same unit as the centers (Hz or rad/s).
    pub fn detect(bin_centers: &[f64], absolute_tolerance: f64) -> Result<Self, DebinError> {
        let n = bin_centers.len();
        if n < 2 {
            return Err(DebinError::ShapeMismatch {
                context: "bin centers",
                expected: 2,
                got: n,
            });
        }
        for i in 1..n {
            if bin_centers[i] <= bin_centers[i - 1] {
                return Err(DebinError::NonMonotonicCenters { index: i });
            }
        }

        // Hypothesis 1: constant step.
        let diffs: Vec<f64> = bin_centers.windows(2).map(|w| w[1] - w[0]).collect();
        let (mut d_min, mut d_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &d in &diffs {
            d_min = d_min.min(d);
            d_max = d_max.max(d);
        }
        if d_max - d_min < absolute_tolerance {
            let step = diffs.iter().sum::<f64>() / diffs.len() as f64;
            // Re-space the centers evenly over the observed range.
            let lo = bin_centers[0];
            let hi = bin_centers[n - 1];
            let centers: Vec<f64> = (0..n)
                .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
                .collect();
            let left: Vec<f64> = centers.iter().map(|&c| c - 0.5 * step).collect();
            let right: Vec<f64> = centers.iter().map(|&c| c + 0.5 * step).collect();
            let width = left.iter().zip(&right).map(|(&l, &r)| r - l).collect();
            return Ok(Self {
                centers,
                left,
                right,
                width,
                shape: GridShape::Constant { step },
            });
        }

        // Hypothesis 2: exponential. The growth ratio is averaged over all
        // consecutive pairs to soak up the limited significant digits of
        // published axes; c1 is backed out from the highest bin.
        let ratio = bin_centers
            .windows(2)
            .map(|w| w[1] / w[0])
            .sum::<f64>()
            / (n - 1) as f64;
        let c2 = ratio.ln();
        let c1 = bin_centers[n - 1] / (c2 * n as f64).exp();

        let centers: Vec<f64> = (1..=n).map(|i| c1 * (c2 * i as f64).exp()).collect();
        let max_deviation = bin_centers
            .iter()
            .zip(&centers)
            .map(|(&a, &b)| (a - b).abs())
            .fold(0.0, f64::max);

        if max_deviation < absolute_tolerance {
            let left: Vec<f64> = (1..=n)
                .map(|i| c1 * (c2 * (i as f64 - 0.5)).exp())
                .collect();
            let right: Vec<f64> = (1..=n)
                .map(|i| c1 * (c2 * (i as f64 + 0.5)).exp())
                .collect();
            let width = left.iter().zip(&right).map(|(&l, &r)| r - l).collect();
            return Ok(Self {
                centers,
                left,
                right,
                width,
                shape: GridShape::Exponential { c1, c2 },
            });
        }

        Err(DebinError::GridDetection {
            max_deviation,
            tolerance: absolute_tolerance,
        })
    }

    /// Number of bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.centers.len()
    }

    /// Zeroth moment `Σ width·value` — the total energy the reconstruction
    /// must preserve.
    pub fn zeroth_moment(&self, values: &[f64]) -> Result<f64, DebinError> {
        self.check_len(values, "zeroth_moment values")?;
        Ok(self
            .width
            .iter()
            .zip(values)
            .map(|(&w, &v)| w * v)
            .sum())
    }

    /// Flattened (x, y) pairs tracing the bin-average densities as a step
    /// function across the bin edges: two x values and a repeated y per bin.
    pub fn step_coordinates(&self, values: &[f64]) -> Result<(Vec<f64>, Vec<f64>), DebinError> {
        self.check_len(values, "step_coordinates values")?;
        let mut x = Vec::with_capacity(2 * self.n_bins());
        let mut y = Vec::with_capacity(2 * self.n_bins());
        for i in 0..self.n_bins() {
            x.push(self.left[i]);
            x.push(self.right[i]);
            y.push(values[i]);
            y.push(values[i]);
        }
        Ok((x, y))
    }

    fn check_len(&self, values: &[f64], context: &'static str) -> Result<(), DebinError> {
        if values.len() != self.n_bins() {
            return Err(DebinError::ShapeMismatch {
                context,
                expected: self.n_bins(),
                got: values.len(),
            });
        }
        Ok(())
    }
}

/// Trapezoid-rule integral of `values` sampled at `coords`.
pub fn trapezoid(values: &[f64], coords: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), coords.len());
    values
        .windows(2)
        .zip(coords.windows(2))
        .map(|(v, c)| 0.5 * (v[0] + v[1]) * (c[1] - c[0]))
        .sum()
}
