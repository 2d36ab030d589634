// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//!
//! Dense numeric kernels for throughput measurement: axpy and square
//! matrix-matrix multiplication (“gemm”) in `f32` and `f64`.
//!
//! Every kernel comes in several strategies that compute the same result up
//! to floating point rounding, so that their speed can be compared:
//!
//! - **axpy** `out[i] += s * data[i]`: [`axpy`] (scalar loop), [`axpy_simd`]
//!   (lane multiply, then lane add) and [`axpy_simd_fma`] (fused
//!   multiply-add per lane).
//! - **gemm** `result = left × right`: [`gemm_tiled`] (blocked, eight lane
//!   accumulators per output row chunk), [`gemm_buffered`] (row buffers and
//!   a scalar fused multiply-add sweep, left to autovectorization) and
//!   [`gemm_naive`], the i-j-k reference.
//!
//! ## Matrix Representation
//!
//! Matrices are square and row major: an `n × n` matrix is a slice of
//! `n * n` elements and element *i, j* is at offset `i * n + j`. All kernels
//! write into a caller supplied output slice and never allocate it.
//!
//! ## Lanes
//!
//! A lane vector is a group of [`Real::LANES`] scalars processed by one
//! operation: 8 `f32` or 4 `f64`, i.e. 256 bits on every target. The
//! explicit SIMD kernels require their dimension to be a multiple of the
//! lane width (and [`gemm_tiled`] of eight lane widths); other shapes are
//! rejected with an [`Error`] before anything is written.
//!
//! ## Portability and Performance
//!
//! - The fallback lanes are written in portable Rust and available on all
//!   targets. These depend on autovectorization to perform well.
//!
//! - *x86* and *x86-64* `avx` + `fma`, and *aarch64* `neon` are detected at
//!   runtime; see [`Isa`] and [`Kernels`] to pick one explicitly.
//!
//! ## Input Data
//!
//! The [`random`] module produces uniformly random vectors and matrices,
//! optionally with NaN values injected at a given probability. Generators
//! take an explicit random source.
//!
//! ## Other Notes
//!
//! The kernels are single threaded and thread safe, as long as each call
//! gets its own output buffer. With the `threading` feature,
//! [`for_each_parallel`] runs independent kernel instances side by side.

#[macro_use] mod debugmacros;
#[macro_use] mod loopmacros;
#[macro_use] mod archmacros;

mod error;
mod kernel;
mod isa;
mod archparam;
mod constparse;
mod util;
mod aligned_alloc;
mod threading;

mod fallback;
#[cfg(any(target_arch="x86", target_arch="x86_64"))]
mod x86;
#[cfg(all(target_arch="aarch64", has_aarch64_simd))]
mod aarch64;

mod axpy;
mod gemm;
pub mod random;

pub use crate::error::{Error, Result};
pub use crate::kernel::{Element, Real, Kernels};
pub use crate::isa::Isa;
pub use crate::archparam::{Tile, TileRule, TileTable};
pub use crate::aligned_alloc::AlignedBuf;
pub use crate::threading::{for_each_parallel, num_threads};

pub use crate::axpy::{axpy, axpy_simd, axpy_simd_fma};
pub use crate::gemm::{gemm_buffered, gemm_naive, gemm_tiled, gemm_tiled_with, ACCUMULATORS};
