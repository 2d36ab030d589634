// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use once_cell::sync::Lazy;

use crate::fallback;
use crate::kernel::{CompiledKernels, Kernels, Real};

/// Instruction sets the explicit lane kernels are compiled for
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Isa {
    /// Portable Rust, relies on autovectorization
    Fallback,
    /// x86 / x86-64 with `avx` and `fma`
    AvxFma,
    /// aarch64 with `neon`
    Neon,
}

static DETECTED: Lazy<Isa> = Lazy::new(|| {
    let isa = Isa::ALL.iter().copied()
        .find(|isa| *isa != Isa::Fallback && isa.is_available())
        .unwrap_or(Isa::Fallback);
    log::debug!("using {} lane kernels", isa.name());
    isa
});

impl Isa {
    /// All instruction sets, fallback first
    pub const ALL: [Isa; 3] = [Isa::Fallback, Isa::AvxFma, Isa::Neon];

    /// The best instruction set of the running CPU.
    ///
    /// Detected once per process.
    pub fn detect() -> Isa {
        *DETECTED
    }

    /// Instruction sets that are both compiled in and supported by the
    /// running CPU
    pub fn available() -> impl Iterator<Item=Isa> {
        Isa::ALL.iter().copied().filter(|isa| isa.is_available())
    }

    /// Name as accepted by the `VECTORBENCH_ISA` build time variable
    pub fn name(self) -> &'static str {
        match self {
            Isa::Fallback => "fallback",
            Isa::AvxFma => "avx-fma",
            Isa::Neon => "neon",
        }
    }

    pub fn is_available(self) -> bool {
        match self {
            Isa::Fallback => true,
            Isa::AvxFma => avx_fma_detected(),
            Isa::Neon => neon_detected(),
        }
    }
}

#[cfg(any(target_arch="x86", target_arch="x86_64"))]
fn avx_fma_detected() -> bool {
    is_x86_feature_detected_!("avx-fma" => "avx", "fma")
}

#[cfg(not(any(target_arch="x86", target_arch="x86_64")))]
fn avx_fma_detected() -> bool { false }

#[cfg(all(target_arch="aarch64", has_aarch64_simd))]
fn neon_detected() -> bool {
    is_aarch64_feature_detected_!("neon" => "neon")
}

#[cfg(not(all(target_arch="aarch64", has_aarch64_simd)))]
fn neon_detected() -> bool { false }

impl Real for f32 {
    const LANES: usize = 8;
    const EPSILON: Self = f32::EPSILON;
}

impl CompiledKernels for f32 {
    const FALLBACK: Kernels<Self> = fallback::F32_KERNELS;

    fn compiled_kernels(isa: Isa) -> Option<Kernels<Self>> {
        match isa {
            Isa::Fallback => Some(fallback::F32_KERNELS),
            #[cfg(any(target_arch="x86", target_arch="x86_64"))]
            Isa::AvxFma => Some(crate::x86::F32_KERNELS),
            #[cfg(all(target_arch="aarch64", has_aarch64_simd))]
            Isa::Neon => Some(crate::aarch64::F32_KERNELS),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl Real for f64 {
    const LANES: usize = 4;
    const EPSILON: Self = f64::EPSILON;
}

impl CompiledKernels for f64 {
    const FALLBACK: Kernels<Self> = fallback::F64_KERNELS;

    fn compiled_kernels(isa: Isa) -> Option<Kernels<Self>> {
        match isa {
            Isa::Fallback => Some(fallback::F64_KERNELS),
            #[cfg(any(target_arch="x86", target_arch="x86_64"))]
            Isa::AvxFma => Some(crate::x86::F64_KERNELS),
            #[cfg(all(target_arch="aarch64", has_aarch64_simd))]
            Isa::Neon => Some(crate::aarch64::F64_KERNELS),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}
