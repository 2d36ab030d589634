// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rawpointer::PointerExt;

use crate::error::{Error, Result};
use crate::kernel::{Element, Kernels, LaneVector, Real};

pub(crate) fn check_axpy(data_len: usize, out_len: usize, multiple: usize) -> Result<()> {
    if data_len != out_len {
        return Err(Error::LengthMismatch { what: "data", expected: out_len, actual: data_len });
    }
    if data_len % multiple != 0 {
        return Err(Error::NotMultiple { what: "vector length", len: data_len, multiple });
    }
    Ok(())
}

/// `out[i] = out[i] + s * data[i]`, one element at a time.
///
/// Any length is accepted as long as both slices are equally long.
///
/// ```
/// let data = [1., 2., 3.];
/// let mut out = [1.; 3];
/// vectorbench::axpy(2., &data, &mut out).unwrap();
/// assert_eq!(out, [3., 5., 7.]);
/// ```
pub fn axpy<T: Element>(s: T, data: &[T], out: &mut [T]) -> Result<()> {
    check_axpy(data.len(), out.len(), 1)?;
    for (o, &d) in out.iter_mut().zip(data) {
        *o = *o + s * d;
    }
    Ok(())
}

/// `out[i] = out[i] + s * data[i]`, a lane multiply followed by a lane add.
///
/// Uses the kernels of the best detected instruction set. Both slices
/// must have the same length, a multiple of `T::LANES`.
pub fn axpy_simd<T: Real>(s: T, data: &[T], out: &mut [T]) -> Result<()> {
    Kernels::<T>::detect().axpy_simd(s, data, out)
}

/// `out[i] = fma(s, data[i], out[i])` with a fused lane multiply-add.
///
/// Uses the kernels of the best detected instruction set. Both slices
/// must have the same length, a multiple of `T::LANES`.
pub fn axpy_simd_fma<T: Real>(s: T, data: &[T], out: &mut [T]) -> Result<()> {
    Kernels::<T>::detect().axpy_simd_fma(s, data, out)
}

#[inline(always)]
pub(crate) unsafe fn axpy_mul_add_impl<V: LaneVector>(len: usize, s: V::Elem,
                                                      data: *const V::Elem, out: *mut V::Elem)
{
    debug_assert_eq!(len % V::LANES, 0);
    let vs = V::splat(s);
    let mut i = 0;
    while i < len {
        let o = out.add(i);
        let prod = V::load(data.add(i)).mul(vs);
        V::load(o).add(prod).store(o);
        i += V::LANES;
    }
}

#[inline(always)]
pub(crate) unsafe fn axpy_fma_impl<V: LaneVector>(len: usize, s: V::Elem,
                                                  data: *const V::Elem, out: *mut V::Elem)
{
    debug_assert_eq!(len % V::LANES, 0);
    let vs = V::splat(s);
    let stride = V::LANES as isize;
    for chunk in 0..len / V::LANES {
        let o = out.stride_offset(stride, chunk);
        V::load(data.stride_offset(stride, chunk)).mul_add(vs, V::load(o)).store(o);
    }
}
