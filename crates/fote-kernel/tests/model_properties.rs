//! Whole-pipeline properties over a deterministic family of random samples.

use fote_kernel::linalg::{add, mat_vec, sub, trace};
use fote_kernel::{FoteEngine, Mat3, NullClassifier, NullType, Sample, Vec3, eigenvalues};

/// Small deterministic generator so runs are reproducible without a
/// dependency.
struct SplitMix(u64);

impl SplitMix {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn vec3(&mut self, lo: f64, hi: f64) -> Vec3 {
        [self.range(lo, hi), self.range(lo, hi), self.range(lo, hi)]
    }
}

fn random_sample(rng: &mut SplitMix) -> Sample {
    let center = rng.vec3(-5.0e4, 5.0e4);
    let positions = [0, 1, 2, 3].map(|_| add(&center, &rng.vec3(-30.0, 30.0)));
    let fields = [0, 1, 2, 3].map(|_| rng.vec3(-50.0, 50.0));
    Sample::new(rng.range(0.0, 1.0e9), fields, positions)
}

#[test]
fn reconstruction_is_exact_at_the_probes() {
    let engine = FoteEngine::default();
    let mut rng = SplitMix(7);
    let mut checked = 0;
    for _ in 0..500 {
        let sample = random_sample(&mut rng);
        let Ok(estimate) = engine.analyze(&sample) else {
            continue;
        };
        assert!(
            estimate.max_reconstruction_error <= 1e-10,
            "reconstruction error {} for {sample:?}",
            estimate.max_reconstruction_error
        );
        checked += 1;
    }
    assert!(checked > 450, "too many degenerate samples: {checked}");
}

#[test]
fn traceless_spectra_always_classify() {
    let classifier = NullClassifier::default();
    let mut rng = SplitMix(23);
    for _ in 0..20_000 {
        let mut m: Mat3 = [rng.vec3(-1.0, 1.0), rng.vec3(-1.0, 1.0), rng.vec3(-1.0, 1.0)];
        let correction = trace(&m) / 3.0;
        for (d, row) in m.iter_mut().enumerate() {
            row[d] -= correction;
        }
        let spectrum = eigenvalues(&m);
        let result = classifier
            .classify(&spectrum)
            .unwrap_or_else(|e| panic!("{e} for {m:?} with {spectrum:?}"));
        assert!((1..=10).contains(&result.null_type.code()), "{m:?}");
    }
}

#[test]
fn cleaned_tensor_is_traceless() {
    let engine = FoteEngine::default();
    let mut rng = SplitMix(11);
    for _ in 0..500 {
        let sample = random_sample(&mut rng);
        if let Ok(estimate) = engine.analyze(&sample) {
            let g = &estimate.tensor.g;
            let magnitude = g.iter().flatten().map(|x| x.abs()).fold(0.0, f64::max);
            assert!(trace(g).abs() <= 1e-12 * magnitude.max(1.0));
        }
    }
}

#[test]
fn pipeline_is_idempotent() {
    let engine = FoteEngine::default();
    let mut rng = SplitMix(13);
    for _ in 0..100 {
        let sample = random_sample(&mut rng);
        assert_eq!(
            engine.row(&sample).canonical_words(),
            engine.row(&sample).canonical_words()
        );
    }
}

#[test]
fn divergence_free_linear_fields_are_classified_and_located() {
    let engine = FoteEngine::default();
    let positions: [Vec3; 4] = [
        [0.0, 0.0, 0.0],
        [25.0, 3.0, -2.0],
        [4.0, 22.0, 1.0],
        [6.0, 5.0, 20.0],
    ];
    let null_at = [8.0, 7.0, 4.0];
    let cases: [(Mat3, NullType); 4] = [
        (
            [[-0.3, 0.0, 0.0], [0.0, -0.3, 0.0], [0.0, 0.0, 0.6]],
            NullType::A,
        ),
        (
            [[0.3, 0.0, 0.0], [0.0, 0.3, 0.0], [0.0, 0.0, -0.6]],
            NullType::B,
        ),
        (
            [[-0.3, -0.6, 0.0], [0.6, -0.3, 0.0], [0.0, 0.0, 0.6]],
            NullType::As,
        ),
        (
            [[0.05, -0.8, 0.0], [0.8, 0.05, 0.0], [0.0, 0.0, -0.1]],
            NullType::BsToO,
        ),
    ];

    for (jac, want) in cases {
        let fields = positions.map(|r| mat_vec(&jac, &sub(&r, &null_at)));
        let sample = Sample::new(0.0, fields, positions);
        let row = engine.row(&sample);
        assert_eq!(row.null_type, want, "jacobian {jac:?}");

        let bary = sample.tetrahedron().barycenter();
        let located = add(&bary, &row.null_position);
        for (got, expected) in located.iter().zip(null_at.iter()) {
            assert!((got - expected).abs() < 1e-8, "{located:?} vs {null_at:?}");
        }
    }
}
