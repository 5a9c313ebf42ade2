//! Numerical core: frequency-grid detection, energy-preserving debinning,
//! directional assembly. Pure array computation, no I/O.

pub mod bins;
pub mod directional;
pub mod smooth;
pub mod smooth_worker;
pub mod synthetic;

/// Errors returned by the debinning core.
///
/// All variants are terminal: nothing is retried or downgraded, since
/// downstream wave statistics are only meaningful if reconstruction is
/// exact and convergent. The caller decides whether to abort or skip the
/// offending direction / time-step.
#[derive(Debug, Clone, PartialEq)]
pub enum DebinError {
    /// Bin centers are not strictly increasing; `index` is the first
    /// position whose center does not exceed its predecessor.
    NonMonotonicCenters { index: usize },
    /// The frequency axis matches neither the constant-step nor the
    /// exponential hypothesis within tolerance. `max_deviation` is the
    /// residual of the exponential fit.
    GridDetection { max_deviation: f64, tolerance: f64 },
    /// The fixed-point iteration did not stabilize within `max_iter`
    /// passes. `trace` holds the per-iteration maximum delta for diagnosis.
    Convergence { max_iter: usize, trace: Vec<f64> },
    /// Array dimensions are inconsistent at a public entry point.
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
}

impl std::fmt::Display for DebinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebinError::NonMonotonicCenters { index } => {
                write!(f, "bin centers not strictly increasing at index {index}")
            }
            DebinError::GridDetection {
                max_deviation,
                tolerance,
            } => write!(
                f,
                "frequency grid shape not detected (max deviation {max_deviation:.6e} \
                 exceeds tolerance {tolerance:.6e}); clean input data or increase tolerance"
            ),
            DebinError::Convergence { max_iter, trace } => write!(
                f,
                "convergence criteria not reached after {max_iter} iterations \
                 (last max delta {:.6e})",
                trace.last().copied().unwrap_or(f64::NAN)
            ),
            DebinError::ShapeMismatch {
                context,
                expected,
                got,
            } => write!(f, "shape mismatch in {context}: expected {expected}, got {got}"),
        }
    }
}

impl std::error::Error for DebinError {}
