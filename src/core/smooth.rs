//! core/smooth.rs — energy-preserving debinning of one direction slice.
//!
//! Reinterprets bin-average densities as point samples of a continuous
//! function at the same frequencies. A fixed-point iteration interpolates
//! densities at the internal bin edges, pins the outer edges to zero, and
//! re-solves each center so the bin's trapezoid energy equals the original
//! per-bin energy. Relaxation (factor 0.5) plus a whole-domain rescale to the
//! original m0 stabilize the loop.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::bins::{trapezoid, FrequencyBins};
use crate::core::DebinError;

/// Densities at or below this are treated as no energy at all; the trivial
/// path returns them unchanged (iterating would divide by a near-zero m0).
pub const TRIVIAL_DENSITY_EPS: f64 = 1e-6;

// Relaxation: next = 0.5·new + 0.5·current. Converges quicker than the raw
// update on the grids seen in practice.
const RELAX: f64 = 0.5;

// Sentinel for the previous-update buffer; large enough that the first
// iteration can never pass the convergence test.
const UPDATE_SENTINEL: f64 = 999.0;

/// Iteration budget and stop criterion of the fixed-point solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverParams {
    #[serde(default = "SolverParams::default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "SolverParams::default_tolerance")]
    pub tolerance: f64,
}

impl SolverParams {
    fn default_max_iter() -> usize {
        100
    }
    fn default_tolerance() -> f64 {
        1e-5
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iter: Self::default_max_iter(),
            tolerance: Self::default_tolerance(),
        }
    }
}

/// One direction's reconstructed continuous spectrum.
///
/// `freq` are the detected grid's centers; `values` are point samples whose
/// trapezoidal integral reproduces the original binned energy. Immutable
/// after construction.
#[derive(Debug, Clone)]
pub struct ContinuousSpectrum {
    pub freq: Vec<f64>,
    pub values: Vec<f64>,
    /// Iterations the solver used; 0 for the trivial near-zero path.
    pub iterations: usize,
}

/// Detect the frequency grid at the default tolerance, then debin.
pub fn to_continuous_1d(
    freq: &[f64],
    values: &[f64],
    params: &SolverParams,
) -> Result<ContinuousSpectrum, DebinError> {
    let bins = FrequencyBins::detect(freq, FrequencyBins::DEFAULT_ABS_TOLERANCE)?;
    debin(&bins, values, params)
}

/// Debin one direction slice on a pre-detected grid.
///
/// The grid detection is the expensive part to repeat across a directional
/// spectrum, so [`crate::core::directional::assemble`] detects once and calls
/// this per row.
pub fn debin(
    bins: &FrequencyBins,
    values: &[f64],
    params: &SolverParams,
) -> Result<ContinuousSpectrum, DebinError> {
    let n = bins.n_bins();
    if values.len() != n {
        return Err(DebinError::ShapeMismatch {
            context: "debin values",
            expected: n,
            got: values.len(),
        });
    }

    // Trivial case: no energy to redistribute.
    if values.iter().all(|&v| v <= TRIVIAL_DENSITY_EPS) {
        return Ok(ContinuousSpectrum {
            freq: bins.centers.clone(),
            values: values.to_vec(),
            iterations: 0,
        });
    }

    let centers = &bins.centers;

    // Per-bin energy, total energy, bin half-widths.
    let e0: Vec<f64> = bins
        .width
        .iter()
        .zip(values)
        .map(|(&w, &v)| w * v)
        .collect();
    let m0_bins: f64 = e0.iter().sum();
    let d_left: Vec<f64> = centers.iter().zip(&bins.left).map(|(&c, &l)| c - l).collect();
    let d_right: Vec<f64> = bins.right.iter().zip(centers).map(|(&r, &c)| r - c).collect();

    // Distances from each internal edge (left[k+1]) to its neighboring centers.
    let dfl: Vec<f64> = (0..n - 1).map(|k| bins.left[k + 1] - centers[k]).collect();
    let dfr: Vec<f64> = (0..n - 1).map(|k| centers[k + 1] - bins.left[k + 1]).collect();

    let mut efth = values.to_vec();
    let mut last_update = vec![UPDATE_SENTINEL; n];
    let mut trace_log = Vec::with_capacity(params.max_iter);

    for iter in 0..params.max_iter {
        // Density at each internal edge: linear blend of the two adjacent
        // centers, closer center weighted more.
        let edge: Vec<f64> = (0..n - 1)
            .map(|k| efth[k] + dfl[k] * (efth[k + 1] - efth[k]) / (dfl[k] + dfr[k]))
            .collect();

        // Solve each center so the bin's trapezoid energy equals e0, with the
        // two outer edges pinned to zero density. Clamp at zero afterwards.
        let new_estimate: Vec<f64> = (0..n)
            .map(|i| {
                let s_l = if i == 0 { 0.0 } else { edge[i - 1] };
                let s_r = if i == n - 1 { 0.0 } else { edge[i] };
                let est = (e0[i] - 0.5 * s_l * d_left[i] - 0.5 * s_r * d_right[i])
                    / (0.5 * (d_left[i] + d_right[i]));
                est.max(0.0)
            })
            .collect();

        // Convergence metric: change of the raw (pre-relaxation) update
        // between consecutive iterations.
        let mut max_delta = 0.0f64;
        for i in 0..n {
            let update = new_estimate[i] - efth[i];
            max_delta = max_delta.max((update - last_update[i]).abs());
            last_update[i] = update;
        }
        trace_log.push(max_delta);
        trace!(target: "wavedebin::smooth", iter, max_delta);

        for i in 0..n {
            efth[i] = RELAX * new_estimate[i] + (1.0 - RELAX) * efth[i];
        }

        // Rescale to the original m0; the edge-based updates drift globally.
        let m0_cont = trapezoid(&efth, centers);
        let scale = m0_bins / m0_cont;
        for v in &mut efth {
            *v *= scale;
        }

        // Convergence is tested after relax + rescale; iteration counts on
        // real data depend on this ordering.
        if max_delta < params.tolerance {
            debug!(
                target: "wavedebin::smooth",
                iterations = iter + 1,
                m0 = m0_bins,
                "debin converged"
            );
            return Ok(ContinuousSpectrum {
                freq: bins.centers.clone(),
                values: efth,
                iterations: iter + 1,
            });
        }
    }

    warn!(
        target: "wavedebin::smooth",
        max_iter = params.max_iter,
        last_delta = trace_log.last().copied().unwrap_or(f64::NAN),
        "debin did not converge"
    );
    Err(DebinError::Convergence {
        max_iter: params.max_iter,
        trace: trace_log,
    })
}
