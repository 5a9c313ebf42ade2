//! core/directional.rs — assembly of a full directional spectrum.
//!
//! Runs the debinning solver over every direction row of a
//! `[direction][frequency]` input, normalizes and sorts the direction axis,
//! and guarantees a 0° row by inverse-distance interpolation across the
//! wrap-around when none is present.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::bins::FrequencyBins;
use crate::core::smooth::SolverParams;
use crate::core::smooth_worker::debin_rows;
use crate::core::DebinError;

/// Knobs for [`assemble`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssembleParams {
    #[serde(default)]
    pub solver: SolverParams,
    /// Tolerance handed to grid detection, in the frequency unit.
    #[serde(default = "AssembleParams::default_grid_tolerance")]
    pub grid_tolerance: f64,
    /// Worker threads for the per-direction solves; 1 runs sequentially.
    #[serde(default = "AssembleParams::default_workers")]
    pub workers: usize,
}

impl AssembleParams {
    fn default_grid_tolerance() -> f64 {
        FrequencyBins::DEFAULT_ABS_TOLERANCE
    }
    fn default_workers() -> usize {
        1
    }
}

impl Default for AssembleParams {
    fn default() -> Self {
        Self {
            solver: SolverParams::default(),
            grid_tolerance: Self::default_grid_tolerance(),
            workers: Self::default_workers(),
        }
    }
}

/// A continuous directional wave spectrum.
///
/// `vals` is indexed `[frequency][direction]`. `dirs` is in degrees,
/// ascending, within [0, 360), and always contains 0. The arrays are owned
/// exclusively by the caller; nothing here aliases them.
#[derive(Debug, Clone)]
pub struct DirectionalSpectrum {
    /// Frequency axis as supplied by the caller [Hz].
    pub freq: Vec<f64>,
    /// Direction axis [deg], ascending, starting at 0.
    pub dirs: Vec<f64>,
    /// Continuous spectral density [m²/Hz per deg], `[frequency][direction]`.
    pub vals: Vec<Vec<f64>>,
    /// Direction unit flag; always true for this constructor.
    pub degrees: bool,
}

/// Interpolation weights for a synthesized 0° row.
///
/// `d_low` is the angular gap from the lowest direction down to 0°, `d_high`
/// the gap from 360° down to the highest. Returns
/// `(weight_on_lowest_row, weight_on_highest_row)`: each neighbor is weighted
/// by the *other* neighbor's distance, so the closer row dominates and the
/// weights sum to 1.
pub fn zero_direction_weights(d_low: f64, d_high: f64) -> (f64, f64) {
    let d = d_low + d_high;
    (d_high / d, d_low / d)
}

/// Debin every direction row of `data` and assemble a continuous
/// [`DirectionalSpectrum`].
///
/// `data` is `[direction][frequency]`; directions may be in any order and
/// outside [0, 360).
pub fn assemble(
    freq: &[f64],
    dirs: &[f64],
    data: &[Vec<f64>],
    params: &AssembleParams,
) -> Result<DirectionalSpectrum, DebinError> {
    if dirs.is_empty() {
        return Err(DebinError::ShapeMismatch {
            context: "directions",
            expected: 1,
            got: 0,
        });
    }
    if data.len() != dirs.len() {
        return Err(DebinError::ShapeMismatch {
            context: "data rows",
            expected: dirs.len(),
            got: data.len(),
        });
    }
    for row in data {
        if row.len() != freq.len() {
            return Err(DebinError::ShapeMismatch {
                context: "data row length",
                expected: freq.len(),
                got: row.len(),
            });
        }
    }

    // Detect the grid once; every row shares the frequency axis.
    let bins = FrequencyBins::detect(freq, params.grid_tolerance)?;
    let continuous = debin_rows(&bins, data, &params.solver, params.workers)?;

    // Normalize into [0, 360) and sort rows by direction. The sort is stable
    // so duplicate directions keep their input order.
    let mut order: Vec<usize> = (0..dirs.len()).collect();
    let normalized: Vec<f64> = dirs.iter().map(|d| d.rem_euclid(360.0)).collect();
    order.sort_by(|&a, &b| normalized[a].total_cmp(&normalized[b]));

    let mut sorted_dirs: Vec<f64> = order.iter().map(|&i| normalized[i]).collect();
    let mut rows: Vec<Vec<f64>> = order.iter().map(|&i| continuous[i].clone()).collect();

    if !sorted_dirs.contains(&0.0) {
        let d_low = sorted_dirs[0];
        let d_high = 360.0 - sorted_dirs[sorted_dirs.len() - 1];
        let (w_low, w_high) = zero_direction_weights(d_low, d_high);
        debug!(
            target: "wavedebin::directional",
            d_low,
            d_high,
            w_low,
            w_high,
            "synthesizing 0 deg row"
        );
        let first = &rows[0];
        let last = &rows[rows.len() - 1];
        let zero_row: Vec<f64> = first
            .iter()
            .zip(last)
            .map(|(&lo, &hi)| w_low * lo + w_high * hi)
            .collect();
        rows.insert(0, zero_row);
        sorted_dirs.insert(0, 0.0);
    }

    debug!(
        target: "wavedebin::directional",
        n_freq = freq.len(),
        n_dir = sorted_dirs.len(),
        "assembled directional spectrum"
    );

    // Transpose [direction][frequency] -> [frequency][direction].
    let vals: Vec<Vec<f64>> = (0..freq.len())
        .map(|i| rows.iter().map(|row| row[i]).collect())
        .collect();

    Ok(DirectionalSpectrum {
        freq: freq.to_vec(),
        dirs: sorted_dirs,
        vals,
        degrees: true,
    })
}
