// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Random input buffers for the kernels.
//!
//! Values come from the caller's random source. Where NaN values are
//! injected, their placement comes from a generator with a fixed seed, so
//! the same `size` and probability always put NaN at the same indices.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use vectorbench::random;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let v: Vec<f32> = random::vector(&mut rng, 1024);
//! assert!(v.iter().all(|&x| 0. <= x && x < 1.));
//! let m: Vec<f64> = random::matrix_with_nan(&mut rng, 16, 0.1).unwrap();
//! assert_eq!(m.len(), 256);
//! ```

use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::aligned_alloc::AlignedBuf;
use crate::error::{Error, Result};
use crate::kernel::Element;

/// Seed of the generator that places NaN values
const NAN_PLACEMENT_SEED: u64 = 0;

fn matrix_len(n: usize) -> Result<usize> {
    n.checked_mul(n).ok_or(Error::Overflow { n })
}

fn inject_nan<T: Element>(values: &mut [T], probability: f64) {
    let mut placement = StdRng::seed_from_u64(NAN_PLACEMENT_SEED);
    for x in values {
        if placement.gen::<f64>() < probability {
            *x = T::nan();
        }
    }
}

/// `size` values from the `Standard` distribution: uniform in `[0, 1)` for
/// floats, the full range for integers.
pub fn vector<T, R>(rng: &mut R, size: usize) -> Vec<T>
    where R: Rng + ?Sized,
          Standard: Distribution<T>,
{
    (0..size).map(|_| rng.gen()).collect()
}

/// A row major `n × n` matrix of values from the `Standard` distribution.
pub fn matrix<T, R>(rng: &mut R, n: usize) -> Result<Vec<T>>
    where R: Rng + ?Sized,
          Standard: Distribution<T>,
{
    Ok(vector(rng, matrix_len(n)?))
}

/// Like [`vector`], with each element replaced by NaN with probability
/// `probability`.
///
/// `probability >= 1.0` makes every element NaN and `probability <= 0.0`
/// none.
pub fn vector_with_nan<T, R>(rng: &mut R, size: usize, probability: f64) -> Vec<T>
    where T: Element,
          R: Rng + ?Sized,
          Standard: Distribution<T>,
{
    let mut v = vector(rng, size);
    inject_nan(&mut v, probability);
    v
}

/// Like [`matrix`], with each element replaced by NaN with probability
/// `probability`.
pub fn matrix_with_nan<T, R>(rng: &mut R, n: usize, probability: f64) -> Result<Vec<T>>
    where T: Element,
          R: Rng + ?Sized,
          Standard: Distribution<T>,
{
    Ok(vector_with_nan(rng, matrix_len(n)?, probability))
}

/// `size` integers uniform in `[0, max)`, sorted ascending.
pub fn sorted_vector<R>(rng: &mut R, size: usize, max: u32) -> Result<Vec<u32>>
    where R: Rng + ?Sized,
{
    if max == 0 {
        return Err(Error::EmptyRange);
    }
    let mut v: Vec<u32> = (0..size).map(|_| rng.gen_range(0..max)).collect();
    v.sort_unstable();
    Ok(v)
}

/// An aligned buffer of `size` values uniform in `[0, 1)`, each replaced by
/// NaN with probability `probability`.
///
/// Values and NaN placement both come from the fixed seed generator, so the
/// contents are the same on every call. The alignment is best effort, see
/// [`AlignedBuf`].
pub fn aligned_vector_with_nan<T: Element>(size: usize, probability: f64, align: usize)
    -> Result<AlignedBuf<T>>
{
    let mut buf = AlignedBuf::zeroed(size, align)?;
    let mut rng = StdRng::seed_from_u64(NAN_PLACEMENT_SEED);
    for x in buf.iter_mut() {
        let value = rng.gen::<f64>();
        *x = if value < probability { T::nan() } else { T::from_f64(value) };
    }
    Ok(buf)
}
