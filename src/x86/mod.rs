// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! 256-bit AVX lane vectors with FMA.

#[cfg(target_arch="x86")]
use std::arch::x86::*;
#[cfg(target_arch="x86_64")]
use std::arch::x86_64::*;

use crate::isa::Isa;
use crate::kernel::LaneVector;

#[derive(Copy, Clone)]
pub(crate) struct F32x8(__m256);

#[derive(Copy, Clone)]
pub(crate) struct F64x4(__m256d);

impl LaneVector for F32x8 {
    type Elem = f32;
    const LANES: usize = 8;

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self { F32x8(_mm256_loadu_ps(ptr)) }
    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) { _mm256_storeu_ps(ptr, self.0) }
    #[inline(always)]
    unsafe fn splat(x: f32) -> Self { F32x8(_mm256_set1_ps(x)) }
    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self { F32x8(_mm256_add_ps(self.0, rhs.0)) }
    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self { F32x8(_mm256_mul_ps(self.0, rhs.0)) }
    #[inline(always)]
    unsafe fn mul_add(self, b: Self, c: Self) -> Self {
        F32x8(_mm256_fmadd_ps(self.0, b.0, c.0))
    }
}

impl LaneVector for F64x4 {
    type Elem = f64;
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self { F64x4(_mm256_loadu_pd(ptr)) }
    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) { _mm256_storeu_pd(ptr, self.0) }
    #[inline(always)]
    unsafe fn splat(x: f64) -> Self { F64x4(_mm256_set1_pd(x)) }
    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self { F64x4(_mm256_add_pd(self.0, rhs.0)) }
    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self { F64x4(_mm256_mul_pd(self.0, rhs.0)) }
    #[inline(always)]
    unsafe fn mul_add(self, b: Self, c: Self) -> Self {
        F64x4(_mm256_fmadd_pd(self.0, b.0, c.0))
    }
}

lane_kernels!([#[target_feature(enable="avx,fma")]] Isa::AvxFma, f32x8, F32_KERNELS, F32x8, f32);
lane_kernels!([#[target_feature(enable="avx,fma")]] Isa::AvxFma, f64x4, F64_KERNELS, F64x4, f64);
