// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

macro_rules! compile_env_matches_or_is_empty {
    ($envvar:tt, $isa_name:tt) => {
        (match option_env!($envvar) {
            None => true,
            Some(v) => v == $isa_name
        })
    }
}

// For testing purposes, we can make sure only one specific instruction set
// is used by setting VECTORBENCH_ISA=name at build time (all others
// disabled). This does not force it to be detected, it must also be.
macro_rules! isa_enabled {
    ($isa_name:tt) => {
        compile_env_matches_or_is_empty!("VECTORBENCH_ISA", $isa_name)
    }
}

#[cfg(any(target_arch="x86", target_arch="x86_64"))]
macro_rules! is_x86_feature_detected_ {
    ($isa_name:tt => $($name:tt),+) => {
        isa_enabled!($isa_name) $(&& is_x86_feature_detected!($name))+
    }
}

#[cfg(all(target_arch="aarch64", has_aarch64_simd))]
macro_rules! is_aarch64_feature_detected_ {
    ($isa_name:tt => $($name:tt),+) => {
        isa_enabled!($isa_name) $(&& std::arch::is_aarch64_feature_detected!($name))+
    }
}

// Instantiate the generic lane algorithms for one lane vector type and
// collect them in a `Kernels` table. The attributes (`target_feature`,
// `inline`) apply to each entry point, so that the `inline(always)`
// algorithm bodies are compiled with the instruction set enabled.
macro_rules! lane_kernels {
    ([$(#[$attr:meta])*] $isa:expr, $modname:ident, $table:ident, $V:ty, $T:ty) => {
        mod $modname {
            use super::*;

            $(#[$attr])*
            pub(crate) unsafe fn axpy_mul_add(len: usize, s: $T, data: *const $T, out: *mut $T) {
                crate::axpy::axpy_mul_add_impl::<$V>(len, s, data, out)
            }

            $(#[$attr])*
            pub(crate) unsafe fn axpy_fma(len: usize, s: $T, data: *const $T, out: *mut $T) {
                crate::axpy::axpy_fma_impl::<$V>(len, s, data, out)
            }

            $(#[$attr])*
            pub(crate) unsafe fn gemm_tiled(n: usize, tile: crate::archparam::Tile,
                                            a: *const $T, b: *const $T, c: *mut $T) {
                crate::gemm::gemm_tiled_impl::<$V>(n, tile, a, b, c)
            }
        }

        pub(crate) const $table: crate::kernel::Kernels<$T> = crate::kernel::Kernels {
            isa: $isa,
            axpy_mul_add: $modname::axpy_mul_add,
            axpy_fma: $modname::axpy_fma,
            gemm_tiled: $modname::gemm_tiled,
        };
    }
}
