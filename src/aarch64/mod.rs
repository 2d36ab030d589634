// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! NEON lane vectors. NEON registers are 128 bits wide, so each 256-bit
//! lane vector is a pair of registers.

use std::arch::aarch64::*;

use crate::isa::Isa;
use crate::kernel::LaneVector;

#[derive(Copy, Clone)]
pub(crate) struct F32x8(float32x4_t, float32x4_t);

#[derive(Copy, Clone)]
pub(crate) struct F64x4(float64x2_t, float64x2_t);

impl LaneVector for F32x8 {
    type Elem = f32;
    const LANES: usize = 8;

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        F32x8(vld1q_f32(ptr), vld1q_f32(ptr.add(4)))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        vst1q_f32(ptr, self.0);
        vst1q_f32(ptr.add(4), self.1);
    }

    #[inline(always)]
    unsafe fn splat(x: f32) -> Self {
        let v = vdupq_n_f32(x);
        F32x8(v, v)
    }

    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self {
        F32x8(vaddq_f32(self.0, rhs.0), vaddq_f32(self.1, rhs.1))
    }

    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self {
        F32x8(vmulq_f32(self.0, rhs.0), vmulq_f32(self.1, rhs.1))
    }

    // vfmaq(c, a, b) computes c + a * b
    #[inline(always)]
    unsafe fn mul_add(self, b: Self, c: Self) -> Self {
        F32x8(vfmaq_f32(c.0, self.0, b.0), vfmaq_f32(c.1, self.1, b.1))
    }
}

impl LaneVector for F64x4 {
    type Elem = f64;
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        F64x4(vld1q_f64(ptr), vld1q_f64(ptr.add(2)))
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        vst1q_f64(ptr, self.0);
        vst1q_f64(ptr.add(2), self.1);
    }

    #[inline(always)]
    unsafe fn splat(x: f64) -> Self {
        let v = vdupq_n_f64(x);
        F64x4(v, v)
    }

    #[inline(always)]
    unsafe fn add(self, rhs: Self) -> Self {
        F64x4(vaddq_f64(self.0, rhs.0), vaddq_f64(self.1, rhs.1))
    }

    #[inline(always)]
    unsafe fn mul(self, rhs: Self) -> Self {
        F64x4(vmulq_f64(self.0, rhs.0), vmulq_f64(self.1, rhs.1))
    }

    #[inline(always)]
    unsafe fn mul_add(self, b: Self, c: Self) -> Self {
        F64x4(vfmaq_f64(c.0, self.0, b.0), vfmaq_f64(c.1, self.1, b.1))
    }
}

lane_kernels!([#[target_feature(enable="neon")]] Isa::Neon, f32x8, F32_KERNELS, F32x8, f32);
lane_kernels!([#[target_feature(enable="neon")]] Isa::Neon, f64x4, F64_KERNELS, F64x4, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;

    #[test]
    fn axpy_matches_fallback() {
        if !Isa::Neon.is_available() {
            println!("Skipping, host does not have feature: {:?}", Isa::Neon.name());
            return;
        }
        let data: Vec<f64> = (0..32).map(|i| i as f64 * 0.125).collect();
        let mut out = vec![-2.0f64; 32];
        let mut expected = out.clone();
        unsafe {
            (F64_KERNELS.axpy_fma)(32, 0.75, data.as_ptr(), out.as_mut_ptr());
            (fallback::F64_KERNELS.axpy_fma)(32, 0.75, data.as_ptr(), expected.as_mut_ptr());
        }
        assert_eq!(out, expected);
    }
}
