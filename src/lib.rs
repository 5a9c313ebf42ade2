//! wavedebin — energy-preserving reconstruction of continuous wave spectra
//! from binned measurements.
//!
//! Input is a discretely-binned directional wave spectrum (frequency bins ×
//! directions, bin-average densities). Output is a continuous-in-frequency
//! density sampled at the same bin centers, with each bin's original energy
//! preserved exactly. File parsing, plotting and downstream statistics
//! (Hs, Tp, ...) live with the callers, not here.

pub mod config;
pub mod core;
