extern crate proptest;
extern crate rand;
extern crate vectorbench;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use vectorbench::random;
use vectorbench::{axpy, axpy_simd, axpy_simd_fma, gemm_buffered, gemm_naive, gemm_tiled};

/// Vectors `(data, out)` of equal length, a multiple of `lanes`
fn lane_vectors(lanes: usize, max_chunks: usize) -> impl Strategy<Value=(Vec<f64>, Vec<f64>)> {
    (0..=max_chunks).prop_flat_map(move |chunks| {
        let len = chunks * lanes;
        (prop::collection::vec(-1e3f64..1e3, len), prop::collection::vec(-1e3f64..1e3, len))
    })
}

/// A square matrix pair of dimension `n`
fn square_pair(max_n: usize) -> impl Strategy<Value=(usize, Vec<f32>, Vec<f32>)> {
    (0..=max_n).prop_flat_map(|n| {
        (Just(n),
         prop::collection::vec(-1f32..1., n * n),
         prop::collection::vec(-1f32..1., n * n))
    })
}

fn close(x: f64, y: f64, tol: f64) -> bool {
    (x - y).abs() <= tol * (x.abs() + y.abs()).max(1.)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn axpy_variants_agree(s in -10f64..10., (data, out) in lane_vectors(4, 40)) {
        let mut expected = out.clone();
        axpy(s, &data, &mut expected).unwrap();

        let mut simd = out.clone();
        axpy_simd(s, &data, &mut simd).unwrap();
        let mut fma = out.clone();
        axpy_simd_fma(s, &data, &mut fma).unwrap();

        for i in 0..expected.len() {
            let scale = out[i].abs() + (s * data[i]).abs();
            prop_assert!((simd[i] - expected[i]).abs() <= 2. * f64::EPSILON * scale,
                         "simd {} vs {} at {}", simd[i], expected[i], i);
            prop_assert!((fma[i] - expected[i]).abs() <= 2. * f64::EPSILON * scale,
                         "fma {} vs {} at {}", fma[i], expected[i], i);
        }
    }

    #[test]
    fn axpy_rejects_unequal_lengths(a in 0..64usize, b in 0..64usize) {
        prop_assume!(a != b);
        let data = vec![1f32; a];
        let mut out = vec![0f32; b];
        prop_assert!(axpy(1., &data, &mut out).is_err());
        prop_assert!(axpy_simd(1., &data, &mut out).is_err());
        prop_assert!(axpy_simd_fma(1., &data, &mut out).is_err());
        prop_assert!(out.iter().all(|&x| x == 0.));
    }

    #[test]
    fn buffered_matches_naive((n, left, right) in square_pair(24)) {
        let mut expected = vec![0.; n * n];
        gemm_naive(&left, &right, &mut expected, n).unwrap();
        let mut result = vec![0.; n * n];
        gemm_buffered(&left, &right, &mut result, n).unwrap();

        // rounding is bounded by the sum of the absolute products
        let abs = |m: &[f32]| m.iter().map(|x| x.abs()).collect::<Vec<_>>();
        let mut scale = vec![0.; n * n];
        gemm_naive(&abs(&left), &abs(&right), &mut scale, n).unwrap();
        let tol = f32::EPSILON * (n as f32 + 1.) * 2.;
        for ((x, y), s) in result.iter().zip(&expected).zip(&scale) {
            prop_assert!((x - y).abs() <= tol * s, "{} vs {} (n={})", x, y, n);
        }
    }

    #[test]
    fn zero_left_gives_exact_zero((n, _left, right) in square_pair(16)) {
        let zero = vec![0f32; n * n];
        let mut result = vec![1f32; n * n];
        gemm_buffered(&zero, &right, &mut result, n).unwrap();
        prop_assert_eq!(&result, &zero);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn tiled_matches_naive(seed in any::<u64>(), chunks in 0..4usize) {
        let n = 32 * chunks;
        let mut rng = StdRng::seed_from_u64(seed);
        let left: Vec<f64> = random::matrix(&mut rng, n).unwrap();
        let right: Vec<f64> = random::matrix(&mut rng, n).unwrap();
        let mut expected = vec![0.; n * n];
        gemm_naive(&left, &right, &mut expected, n).unwrap();
        let mut result = vec![0.; n * n];
        gemm_tiled(&left, &right, &mut result, n).unwrap();
        let tol = f64::EPSILON * (n as f64 + 1.) * 4.;
        for (x, y) in result.iter().zip(&expected) {
            prop_assert!(close(*x, *y, tol), "{} vs {} (n={})", x, y, n);
        }
    }

    #[test]
    fn tiled_rejects_other_sizes(n in 1..200usize) {
        prop_assume!(n % 64 != 0);
        let m = vec![1f32; n * n];
        let mut result = vec![0f32; n * n];
        prop_assert!(gemm_tiled(&m, &m, &mut result, n).is_err());
        prop_assert!(result.iter().all(|&x| x == 0.));
    }
}
