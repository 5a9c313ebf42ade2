use approx::assert_relative_eq;
use wavedebin::core::bins::{FrequencyBins, GridShape};
use wavedebin::core::DebinError;

#[test]
fn constant_grid_round_trip() {
    let centers = [0.1, 0.2, 0.3, 0.4, 0.5];
    let bins = FrequencyBins::detect(&centers, 1e-3).unwrap();
    match bins.shape {
        GridShape::Constant { step } => assert_relative_eq!(step, 0.1, epsilon = 1e-12),
        other => panic!("expected constant shape, got {other:?}"),
    }
    for (i, &c) in centers.iter().enumerate() {
        assert_relative_eq!(bins.width[i], 0.1, epsilon = 1e-12);
        assert_relative_eq!(bins.left[i], c - 0.05, epsilon = 1e-12);
        assert_relative_eq!(bins.right[i], c + 0.05, epsilon = 1e-12);
    }
}

#[test]
fn exponential_grid_round_trip() {
    // Waverider-style geometric axis.
    let (c1, c2) = (0.05, 0.1);
    let centers: Vec<f64> = (1..=20).map(|i| c1 * (c2 * i as f64).exp()).collect();
    let bins = FrequencyBins::detect(&centers, 1e-3).unwrap();
    match bins.shape {
        GridShape::Exponential { c1: g1, c2: g2 } => {
            assert_relative_eq!(g1, c1, epsilon = 1e-6);
            assert_relative_eq!(g2, c2, epsilon = 1e-6);
        }
        other => panic!("expected exponential shape, got {other:?}"),
    }
    for (orig, regen) in centers.iter().zip(&bins.centers) {
        assert_relative_eq!(orig, regen, epsilon = 1e-9);
    }
}

#[test]
fn jittered_constant_grid_depends_on_tolerance() {
    let mut centers: Vec<f64> = (1..=30).map(|i| i as f64 * 0.01).collect();
    centers[7] += 1e-4;
    centers[19] -= 1e-4;

    // Loose tolerance absorbs the jitter.
    let bins = FrequencyBins::detect(&centers, 1e-3).unwrap();
    assert!(matches!(bins.shape, GridShape::Constant { .. }));

    // Tight tolerance rejects both hypotheses: too uneven for constant, far
    // from geometric.
    match FrequencyBins::detect(&centers, 1e-7) {
        Err(DebinError::GridDetection { .. }) => {}
        other => panic!("expected GridDetection, got {other:?}"),
    }
}

#[test]
fn two_center_axis_is_detected_as_constant() {
    let bins = FrequencyBins::detect(&[0.1, 0.3], 1e-3).unwrap();
    assert!(matches!(bins.shape, GridShape::Constant { .. }));
    assert_relative_eq!(bins.width[0], 0.2, epsilon = 1e-12);
    assert_relative_eq!(bins.width[1], 0.2, epsilon = 1e-12);
}
