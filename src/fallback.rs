// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Portable lane vectors: plain arrays, one scalar operation per lane.
//!
//! `mul_add` uses the scalar fused multiply-add, so results match the arch
//! kernels bit for bit where those use fused instructions too.

use core::ptr;

use crate::isa::Isa;
use crate::kernel::LaneVector;

macro_rules! portable_lanes {
    ($name:ident, $T:ty, $lanes:expr, $loop_lanes:ident) => {
        #[derive(Copy, Clone, Debug, PartialEq)]
        pub(crate) struct $name(pub(crate) [$T; $lanes]);

        impl LaneVector for $name {
            type Elem = $T;
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $T) -> Self {
                $name(ptr::read_unaligned(ptr as *const [$T; $lanes]))
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $T) {
                ptr::write_unaligned(ptr as *mut [$T; $lanes], self.0)
            }

            #[inline(always)]
            unsafe fn splat(x: $T) -> Self {
                $name([x; $lanes])
            }

            #[inline(always)]
            unsafe fn add(self, rhs: Self) -> Self {
                let mut r = self.0;
                $loop_lanes!(i, r[i] = r[i] + rhs.0[i]);
                $name(r)
            }

            #[inline(always)]
            unsafe fn mul(self, rhs: Self) -> Self {
                let mut r = self.0;
                $loop_lanes!(i, r[i] = r[i] * rhs.0[i]);
                $name(r)
            }

            #[inline(always)]
            unsafe fn mul_add(self, b: Self, c: Self) -> Self {
                let mut r = self.0;
                $loop_lanes!(i, r[i] = r[i].mul_add(b.0[i], c.0[i]));
                $name(r)
            }
        }
    }
}

portable_lanes!(F32x8, f32, 8, loop8);
portable_lanes!(F64x4, f64, 4, loop4);

lane_kernels!([#[inline(never)]] Isa::Fallback, f32x8, F32_KERNELS, F32x8, f32);
lane_kernels!([#[inline(never)]] Isa::Fallback, f64x4, F64_KERNELS, F64x4, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_store_roundtrip_unaligned() {
        // offset by one element so the load is not 32-byte aligned
        let data: Vec<f32> = (0..9).map(|x| x as f32).collect();
        let mut out = [0.; 9];
        unsafe {
            let v = F32x8::load(data.as_ptr().add(1));
            v.store(out.as_mut_ptr().add(1));
        }
        assert_eq!(&out[1..], &data[1..]);
        assert_eq!(out[0], 0.);
    }

    #[test]
    fn lane_arithmetic() {
        unsafe {
            let a = F64x4([1., 2., 3., 4.]);
            let b = F64x4::splat(2.);
            let c = F64x4([0.5; 4]);
            assert_eq!(a.add(b), F64x4([3., 4., 5., 6.]));
            assert_eq!(a.mul(b), F64x4([2., 4., 6., 8.]));
            assert_eq!(a.mul_add(b, c), F64x4([2.5, 4.5, 6.5, 8.5]));
        }
    }

    #[test]
    fn mul_add_is_fused() {
        // (1 + e) (1 - e) = 1 - e², which rounds to 1 unless fused
        let e = f32::EPSILON;
        unsafe {
            let a = F32x8::splat(1. + e);
            let b = F32x8::splat(1. - e);
            let c = F32x8::splat(-1.);
            let fused = a.mul_add(b, c);
            let split = a.mul(b).add(c);
            assert_eq!(fused.0[0], -e * e);
            assert_eq!(split.0[0], 0.);
        }
    }

    #[test]
    fn table_points_at_fallback() {
        assert_eq!(F32_KERNELS.isa, Isa::Fallback);
        assert_eq!(F64_KERNELS.isa, Isa::Fallback);
    }
}
