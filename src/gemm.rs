// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rawpointer::PointerExt;

use crate::aligned_alloc::AlignedBuf;
use crate::archparam::{Tile, TileTable};
use crate::error::{Error, Result};
use crate::kernel::{Element, Kernels, LaneVector, Real};
use crate::util::range_chunk;

/// Lane accumulators per output chunk in the tiled gemm.
///
/// A chunk covers `ACCUMULATORS * T::LANES` columns of one result row.
pub const ACCUMULATORS: usize = 8;

/// Alignment of the row buffers in `gemm_buffered`
const SCRATCH_ALIGN: usize = 64;

fn check_square<T>(left: &[T], right: &[T], result: &[T], n: usize) -> Result<usize> {
    let len = n.checked_mul(n).ok_or(Error::Overflow { n })?;
    for &(what, actual) in &[("left", left.len()), ("right", right.len()),
                             ("result", result.len())] {
        if actual != len {
            return Err(Error::LengthMismatch { what, expected: len, actual });
        }
    }
    Ok(len)
}

/// Validate operands of the tiled gemm and pick its tile
pub(crate) fn check_tiled<T: Real>(tiles: &TileTable, left: &[T], right: &[T], result: &[T],
                                   n: usize) -> Result<Tile>
{
    check_square(left, right, result, n)?;
    let chunk = ACCUMULATORS * T::LANES;
    if n % chunk != 0 {
        return Err(Error::NotMultiple { what: "matrix dimension", len: n, multiple: chunk });
    }
    let tile = tiles.tile_for(n);
    tile.check(chunk)?;
    Ok(tile)
}

/// Tiled matrix multiplication with explicit lane vectors.
///
/// result ← result + left × right
///
/// + `left`, `right`, `result`: `n × n` row major matrices
/// + `n`: a multiple of `ACCUMULATORS * T::LANES` (64 for `f32`, 32 for
///   `f64`)
///
/// `result` is accumulated into; pass zeros to compute the plain product.
/// Uses the kernels of the best detected instruction set and the default
/// tile table.
///
/// ```
/// let n = 64;
/// let mut left = vec![0f32; n * n];
/// for i in 0..n {
///     left[i * n + i] = 1.;
/// }
/// let right = vec![2f32; n * n];
/// let mut result = vec![0f32; n * n];
/// vectorbench::gemm_tiled(&left, &right, &mut result, n).unwrap();
/// assert_eq!(result, right);
/// ```
pub fn gemm_tiled<T: Real>(left: &[T], right: &[T], result: &mut [T], n: usize) -> Result<()> {
    Kernels::<T>::detect().gemm_tiled(left, right, result, n)
}

/// Like [`gemm_tiled`], with the tile shape taken from `tiles`.
pub fn gemm_tiled_with<T: Real>(tiles: &TileTable, left: &[T], right: &[T], result: &mut [T],
                                n: usize) -> Result<()>
{
    Kernels::<T>::detect().gemm_tiled_with(tiles, left, right, result, n)
}

/// Matrix multiplication through row buffers and a scalar fused
/// multiply-add sweep.
///
/// result ← left × right
///
/// For each row of `result`, every row of `right` is copied into an
/// aligned buffer and folded into a row accumulator; the inner loop is
/// left to autovectorization. Any `n` is accepted.
pub fn gemm_buffered<T: Element>(left: &[T], right: &[T], result: &mut [T], n: usize)
    -> Result<()>
{
    check_square(left, right, result, n)?;
    if n == 0 {
        return Ok(());
    }
    let mut b_buf = AlignedBuf::<T>::zeroed(n, SCRATCH_ALIGN)?;
    let mut c_buf = AlignedBuf::<T>::zeroed(n, SCRATCH_ALIGN)?;
    dprint!("gemm_buffered n={} scratch align={}", n, b_buf.align());

    for (a_row, c_row) in left.chunks_exact(n).zip(result.chunks_exact_mut(n)) {
        for (&a_ik, b_row) in a_row.iter().zip(right.chunks_exact(n)) {
            b_buf.copy_from_slice(b_row);
            for (c, &b) in c_buf.iter_mut().zip(b_buf.iter()) {
                *c = a_ik.mul_add(b, *c);
            }
        }
        c_row.copy_from_slice(&c_buf);
        for c in c_buf.iter_mut() {
            *c = T::zero();
        }
    }
    Ok(())
}

/// Reference matrix multiplication, the plain i-j-k loop.
///
/// result ← left × right
pub fn gemm_naive<T: Element>(left: &[T], right: &[T], result: &mut [T], n: usize)
    -> Result<()>
{
    check_square(left, right, result, n)?;
    for i in 0..n {
        for j in 0..n {
            let mut sum = T::zero();
            for k in 0..n {
                sum = sum + left[i * n + k] * right[k * n + j];
            }
            result[i * n + j] = sum;
        }
    }
    Ok(())
}

/// c ← c + a b, blocked on columns of c and rows of b.
///
/// For each column block × row block and each row `i` of c, the block's
/// columns are swept in chunks of `ACCUMULATORS` lane vectors. The
/// accumulators start from c, take `a[i][k] * b[k][chunk]` for every `k`
/// in the row block and are stored back once.
///
/// + n: a multiple of `ACCUMULATORS * V::LANES`
/// + tile.width: a multiple of `ACCUMULATORS * V::LANES`
#[inline(always)]
pub(crate) unsafe fn gemm_tiled_impl<V: LaneVector>(n: usize, tile: Tile,
                                                    a: *const V::Elem, b: *const V::Elem,
                                                    c: *mut V::Elem)
{
    let chunk = ACCUMULATORS * V::LANES;
    let rs = n as isize;
    debug_assert_eq!(n % chunk, 0);
    debug_assert_eq!(tile.width % chunk, 0);

    for (jb, block_width) in range_chunk(n, tile.width) {
        let col0 = jb * tile.width;
        for (kb, block_height) in range_chunk(n, tile.height) {
            let row0 = kb * tile.height;
            dprint!("block cols {}..{} rows {}..{}",
                    col0, col0 + block_width, row0, row0 + block_height);

            for i in 0..n {
                let a_row = a.stride_offset(rs, i).add(row0);
                let c_row = c.stride_offset(rs, i);
                let mut j = col0;
                while j < col0 + block_width {
                    let cj = c_row.add(j);
                    let mut acc = [V::splat(<V::Elem as Element>::zero()); ACCUMULATORS];
                    loop8!(x, acc[x] = V::load(cj.add(x * V::LANES)));

                    for k in 0..block_height {
                        let mult = V::splat(*a_row.add(k));
                        let bk = b.stride_offset(rs, row0 + k).add(j);
                        loop8!(x, acc[x] = acc[x].add(mult.mul(V::load(bk.add(x * V::LANES)))));
                    }

                    loop8!(x, acc[x].store(cj.add(x * V::LANES)));
                    j += chunk;
                }
            }
        }
    }
}
