extern crate itertools;
extern crate rand;
extern crate vectorbench;

use itertools::iproduct;
use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vectorbench::random;
use vectorbench::{axpy, axpy_simd, axpy_simd_fma, Error, Isa, Kernels, Real};

#[test]
fn test_saxpy() {
    test_axpy::<f32>();
}

#[test]
fn test_daxpy() {
    test_axpy::<f64>();
}

#[test]
fn test_saxpy_special_values() {
    test_special_values::<f32>();
}

#[test]
fn test_daxpy_special_values() {
    test_special_values::<f64>();
}

fn kernels<F: Real>() -> impl Iterator<Item=Kernels<F>> {
    Isa::available().filter_map(Kernels::<F>::for_isa)
}

/// Sizes accepted by the lane kernels for `F`
fn lane_sizes<F: Real>() -> impl Iterator<Item=usize> + Clone {
    (0..9).map(|i| i * F::LANES).chain(vec![128, 1000 * F::LANES])
}

fn assert_close<F: Real>(x: &[F], y: &[F]) {
    let tol = F::EPSILON.to_f64() * 4.;
    for (i, (a, b)) in x.iter().zip(y).enumerate() {
        let (a, b) = (a.to_f64(), b.to_f64());
        if !((a - b).abs() <= tol * b.abs().max(1.)) {
            panic!("mismatch at index={}, x: {:?}, y: {:?}", i, a, b);
        }
    }
}

fn test_axpy<F>() where F: Real, Standard: Distribution<F> {
    let mut rng = StdRng::seed_from_u64(17);
    for (k, len) in iproduct!(kernels::<F>(), lane_sizes::<F>()) {
        let s = F::from_f64(0.75);
        let data: Vec<F> = random::vector(&mut rng, len);
        let init: Vec<F> = random::vector(&mut rng, len);

        let mut expected = init.clone();
        axpy(s, &data, &mut expected).unwrap();

        let mut out = init.clone();
        k.axpy_simd(s, &data, &mut out).unwrap();
        assert_close(&out, &expected);

        let mut out = init.clone();
        k.axpy_simd_fma(s, &data, &mut out).unwrap();
        assert_close(&out, &expected);
        let fused: Vec<F> = data.iter().zip(&init).map(|(&d, &c)| s.mul_add(d, c)).collect();
        assert_close(&out, &fused);
    }
}

fn test_special_values<F>() where F: Real, Standard: Distribution<F> {
    let mut rng = StdRng::seed_from_u64(5);
    let len = 1024;
    let data: Vec<F> = random::vector(&mut rng, len);
    let init: Vec<F> = random::vector(&mut rng, len);

    // s = 0 leaves out unchanged
    let mut out = init.clone();
    axpy(F::zero(), &data, &mut out).unwrap();
    assert_eq!(out, init);
    axpy_simd(F::zero(), &data, &mut out).unwrap();
    assert_eq!(out, init);
    axpy_simd_fma(F::zero(), &data, &mut out).unwrap();
    assert_eq!(out, init);

    // NaN everywhere in the input is NaN everywhere in the output
    let nan: Vec<F> = random::vector_with_nan(&mut rng, len, 1.0);
    for k in kernels::<F>() {
        let mut out = init.clone();
        k.axpy_simd(F::one(), &nan, &mut out).unwrap();
        assert!(out.iter().all(|x| x.is_nan()), "{:?}", k);
        let mut out = init.clone();
        k.axpy_simd_fma(F::one(), &nan, &mut out).unwrap();
        assert!(out.iter().all(|x| x.is_nan()), "{:?}", k);
    }
    let mut out = init.clone();
    axpy(F::one(), &nan, &mut out).unwrap();
    assert!(out.iter().all(|x| x.is_nan()));
}

#[test]
fn shape_violations() {
    for k in kernels::<f32>() {
        let mut out = vec![0f32; 16];
        assert_eq!(k.axpy_simd(1., &[1.; 8], &mut out),
                   Err(Error::LengthMismatch { what: "data", expected: 16, actual: 8 }));
        for &len in &[1, 7, 9, 15, 1023] {
            let data = vec![1f32; len];
            let mut out = vec![0f32; len];
            assert_eq!(k.axpy_simd_fma(1., &data, &mut out),
                       Err(Error::NotMultiple { what: "vector length", len, multiple: 8 }));
            assert!(out.iter().all(|&x| x == 0.));
        }
    }
    assert!(axpy(1f64, &[1.; 3], &mut [0.; 4]).is_err());
    assert!(axpy_simd(1f64, &[1.; 6], &mut [0.; 6]).is_err());
}
