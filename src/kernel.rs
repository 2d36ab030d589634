// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::fmt::Debug;
use core::ops::{Add, Mul};

use crate::archparam::{Tile, TileTable, DEFAULT_TILES};
use crate::axpy::check_axpy;
use crate::error::Result;
use crate::gemm::check_tiled;
use crate::isa::Isa;

mod sealed {
    use super::Kernels;
    use crate::isa::Isa;

    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}

    /// Kernel tables compiled into this build for an element type
    pub trait CompiledKernels : Sized {
        /// The portable kernels, available everywhere
        const FALLBACK: Kernels<Self>;

        /// Kernels compiled for `isa`, if this build has them. Does not check
        /// that the CPU supports `isa`.
        fn compiled_kernels(isa: Isa) -> Option<Kernels<Self>>;
    }
}

pub(crate) use self::sealed::CompiledKernels;

/// Scalar element type of vectors and matrices.
pub trait Element : sealed::Sealed + Copy + Debug + PartialEq + Send + Sync + 'static
    + Add<Output=Self> + Mul<Output=Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn nan() -> Self;
    fn is_nan(self) -> bool;
    /// `self * a + b` with a single rounding
    fn mul_add(self, a: Self, b: Self) -> Self;
    /// Lossy conversion, used for tolerances and test data
    fn from_f64(x: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Element for f32 {
    #[inline(always)]
    fn zero() -> Self { 0. }
    #[inline(always)]
    fn one() -> Self { 1. }
    #[inline(always)]
    fn nan() -> Self { f32::NAN }
    #[inline(always)]
    fn is_nan(self) -> bool { self.is_nan() }
    #[inline(always)]
    fn mul_add(self, a: Self, b: Self) -> Self { f32::mul_add(self, a, b) }
    #[inline(always)]
    fn from_f64(x: f64) -> Self { x as f32 }
    #[inline(always)]
    fn to_f64(self) -> f64 { self as f64 }
}

impl Element for f64 {
    #[inline(always)]
    fn zero() -> Self { 0. }
    #[inline(always)]
    fn one() -> Self { 1. }
    #[inline(always)]
    fn nan() -> Self { f64::NAN }
    #[inline(always)]
    fn is_nan(self) -> bool { self.is_nan() }
    #[inline(always)]
    fn mul_add(self, a: Self, b: Self) -> Self { f64::mul_add(self, a, b) }
    #[inline(always)]
    fn from_f64(x: f64) -> Self { x }
    #[inline(always)]
    fn to_f64(self) -> f64 { self }
}

/// Element types with explicit SIMD kernels.
///
/// Kernel tables are only handed out through [`Kernels::detect`] and
/// [`Kernels::for_isa`], which check the running CPU:
///
/// ```compile_fail
/// use vectorbench::{Isa, Real};
///
/// let _ = <f32 as Real>::compiled_kernels(Isa::AvxFma);
/// ```
pub trait Real : Element + sealed::CompiledKernels {
    /// Scalars per lane vector (256 bits on every target)
    const LANES: usize;
    /// Machine epsilon
    const EPSILON: Self;
}

/// A group of `LANES` scalars operated on together.
///
/// All pointer arguments are unaligned and must be valid for `LANES`
/// elements. The methods are `unsafe` because arch implementations are only
/// sound when the CPU has the instruction set they are compiled for.
pub(crate) trait LaneVector : Copy {
    type Elem: Element;
    const LANES: usize;

    unsafe fn load(ptr: *const Self::Elem) -> Self;
    unsafe fn store(self, ptr: *mut Self::Elem);
    unsafe fn splat(x: Self::Elem) -> Self;
    unsafe fn add(self, rhs: Self) -> Self;
    unsafe fn mul(self, rhs: Self) -> Self;
    /// `self * b + c`, fused
    unsafe fn mul_add(self, b: Self, c: Self) -> Self;
}

/// `out[i] += s * data[i]` for `i < len`; `len` is a multiple of the lane width
pub(crate) type AxpyFn<T> = unsafe fn(len: usize, s: T, data: *const T, out: *mut T);

/// `c += a b` for `n × n` row major matrices with the given tile
pub(crate) type GemmFn<T> = unsafe fn(n: usize, tile: Tile, a: *const T, b: *const T, c: *mut T);

/// The explicit SIMD kernels for one element type, bound to one
/// instruction set.
///
/// ```
/// use vectorbench::{Isa, Kernels};
///
/// let fallback = Kernels::<f64>::for_isa(Isa::Fallback).unwrap();
/// let data = vec![1.0; 16];
/// let mut out = vec![0.5; 16];
/// fallback.axpy_simd_fma(2.0, &data, &mut out).unwrap();
/// assert!(out.iter().all(|&x| x == 2.5));
/// ```
pub struct Kernels<T> {
    pub(crate) isa: Isa,
    pub(crate) axpy_mul_add: AxpyFn<T>,
    pub(crate) axpy_fma: AxpyFn<T>,
    pub(crate) gemm_tiled: GemmFn<T>,
}

impl<T> Clone for Kernels<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for Kernels<T> { }

impl<T> Debug for Kernels<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Kernels").field("isa", &self.isa).finish()
    }
}

impl<T: Real> Kernels<T> {
    /// Kernels for the best instruction set of the running CPU
    pub fn detect() -> Self {
        T::compiled_kernels(Isa::detect()).unwrap_or(T::FALLBACK)
    }

    /// Kernels for `isa`, or `None` if it is not compiled in or the CPU
    /// does not support it.
    pub fn for_isa(isa: Isa) -> Option<Self> {
        if isa.is_available() {
            T::compiled_kernels(isa)
        } else {
            None
        }
    }

    pub fn isa(&self) -> Isa { self.isa }

    /// `out[i] = out[i] + s * data[i]`, one lane multiply then one lane add.
    ///
    /// The length must be equal for both slices and a multiple of
    /// `T::LANES`.
    pub fn axpy_simd(&self, s: T, data: &[T], out: &mut [T]) -> Result<()> {
        check_axpy(data.len(), out.len(), T::LANES)?;
        unsafe {
            (self.axpy_mul_add)(data.len(), s, data.as_ptr(), out.as_mut_ptr());
        }
        Ok(())
    }

    /// `out[i] = fma(s, data[i], out[i])` per lane.
    ///
    /// The length must be equal for both slices and a multiple of
    /// `T::LANES`.
    pub fn axpy_simd_fma(&self, s: T, data: &[T], out: &mut [T]) -> Result<()> {
        check_axpy(data.len(), out.len(), T::LANES)?;
        unsafe {
            (self.axpy_fma)(data.len(), s, data.as_ptr(), out.as_mut_ptr());
        }
        Ok(())
    }

    /// Tiled gemm with the default tile table, see [`crate::gemm_tiled`].
    pub fn gemm_tiled(&self, left: &[T], right: &[T], result: &mut [T], n: usize)
        -> Result<()>
    {
        self.gemm_tiled_with(&DEFAULT_TILES, left, right, result, n)
    }

    /// Tiled gemm with a caller provided tile table, see
    /// [`crate::gemm_tiled_with`].
    pub fn gemm_tiled_with(&self, tiles: &TileTable,
                           left: &[T], right: &[T], result: &mut [T], n: usize)
        -> Result<()>
    {
        let tile = check_tiled::<T>(tiles, left, right, result, n)?;
        dprint!("gemm_tiled {:?} n={} tile={}x{}", self.isa, n, tile.width, tile.height);
        unsafe {
            (self.gemm_tiled)(n, tile, left.as_ptr(), right.as_ptr(), result.as_mut_ptr());
        }
        Ok(())
    }
}
