// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// Errors reported by kernels and generators.
///
/// Every kernel validates its arguments before writing, so an `Err`
/// means the output buffer is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operand does not have the number of elements the call implies.
    #[error("{what} has {actual} elements, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A length or dimension is not a multiple of the lane or chunk width
    /// an explicit SIMD kernel works in.
    #[error("{what} {len} is not a multiple of {multiple}")]
    NotMultiple {
        what: &'static str,
        len: usize,
        multiple: usize,
    },

    /// `n * n` does not fit in `usize`.
    #[error("matrix dimension {n} overflows the element count")]
    Overflow { n: usize },

    /// A tile shape the tiled gemm cannot run with.
    #[error("invalid tile {width}x{height}: {reason}")]
    InvalidTile {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    /// A tile table with no usable rules.
    #[error("invalid tile table: {reason}")]
    InvalidTileTable { reason: &'static str },

    /// A random range with no values in it.
    #[error("cannot sample from an empty range")]
    EmptyRange,

    /// The allocator could not provide a buffer.
    #[error("failed to allocate {bytes} bytes")]
    Alloc { bytes: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
