//! core/synthetic.rs — synthetic sea-state generators.
//!
//! Small pure generators producing realistic binned inputs for tests and
//! benches: a Pierson–Moskowitz frequency shape and a cosine-power
//! directional spreading function.

/// Pierson–Moskowitz spectral density sampled at `freq` [Hz], scaled so the
/// integrated energy corresponds to significant wave height `hs` [m] at peak
/// period `tp` [s]: `S(f) = (5/16)·Hs²·fp⁴·f⁻⁵·exp(−1.25·(fp/f)⁴)`.
pub fn pierson_moskowitz(freq: &[f64], hs: f64, tp: f64) -> Vec<f64> {
    let fp = 1.0 / tp;
    freq.iter()
        .map(|&f| {
            if f <= 0.0 {
                return 0.0;
            }
            let r = fp / f;
            (5.0 / 16.0) * hs * hs * fp.powi(4) * f.powi(-5) * (-1.25 * r.powi(4)).exp()
        })
        .collect()
}

/// Cosine-power directional spreading weights over `dirs` [deg]:
/// `D(θ) ∝ cos^{2s}((θ − mean_dir)/2)`, normalized to sum to 1.
pub fn cosine_spread(dirs: &[f64], mean_dir: f64, s: f64) -> Vec<f64> {
    let mut weights: Vec<f64> = dirs
        .iter()
        .map(|&d| {
            // Wrap the offset into [-180, 180] before halving.
            let mut delta = (d - mean_dir).rem_euclid(360.0);
            if delta > 180.0 {
                delta -= 360.0;
            }
            let half = (delta / 2.0).to_radians();
            half.cos().abs().powf(2.0 * s)
        })
        .collect();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pm_spectrum_peaks_near_peak_frequency() {
        let freq: Vec<f64> = (1..=100).map(|i| i as f64 * 0.005).collect();
        let s = pierson_moskowitz(&freq, 2.0, 10.0);
        assert!(s.iter().all(|&v| v >= 0.0));
        let i_max = s
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_relative_eq!(freq[i_max], 0.1, epsilon = 0.01);
    }

    #[test]
    fn cosine_spread_is_maximal_at_mean_direction() {
        let dirs: Vec<f64> = (0..36).map(|i| i as f64 * 10.0).collect();
        let w = cosine_spread(&dirs, 90.0, 4.0);
        assert_relative_eq!(w.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        let i_max = w
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_relative_eq!(dirs[i_max], 90.0, epsilon = 1e-12);
    }

    #[test]
    fn cosine_spread_wraps_across_north() {
        let dirs = [10.0, 180.0, 350.0];
        let w = cosine_spread(&dirs, 0.0, 2.0);
        // 10 and 350 are both 10 deg from the mean; 180 is opposite.
        assert_relative_eq!(w[0], w[2], epsilon = 1e-12);
        assert!(w[1] < w[0]);
    }
}
