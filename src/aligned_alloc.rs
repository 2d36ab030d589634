// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::{cmp, mem, slice};

use crate::error::{Error, Result};
use crate::kernel::Element;

/// A zero initialized heap buffer with a requested alignment.
///
/// Alignment is best effort: a value that is not a power of two falls back
/// to the natural alignment of `T`. Allocation failure is reported as
/// [`Error::Alloc`].
///
/// ```
/// use vectorbench::AlignedBuf;
///
/// let buf = AlignedBuf::<f32>::zeroed(100, 64).unwrap();
/// assert_eq!(buf.len(), 100);
/// assert_eq!(buf.as_ptr() as usize % 64, 0);
/// assert!(buf.iter().all(|&x| x == 0.));
/// ```
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// The buffer is uniquely owned, like a Vec<T>
unsafe impl<T: Send> Send for AlignedBuf<T> { }
unsafe impl<T: Sync> Sync for AlignedBuf<T> { }

impl<T: Element> AlignedBuf<T> {
    /// Allocate `len` zeroed elements aligned to `align` bytes.
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        let bytes = len.checked_mul(mem::size_of::<T>())
            .ok_or(Error::Alloc { bytes: usize::MAX })?;
        let align = cmp::max(align, mem::align_of::<T>());
        let layout = match Layout::from_size_align(bytes, align) {
            Ok(layout) => layout,
            Err(_) => {
                log::debug!("alignment {} is not usable, using natural alignment", align);
                Layout::array::<T>(len).map_err(|_| Error::Alloc { bytes })?
            }
        };

        if layout.size() == 0 {
            let ptr = NonNull::new(layout.align() as *mut T).ok_or(Error::Alloc { bytes })?;
            return Ok(AlignedBuf { ptr, len, layout });
        }

        // f32 and f64 are valid when all bits are zero
        let ptr = unsafe { alloc::alloc_zeroed(layout) } as *mut T;
        match NonNull::new(ptr) {
            Some(ptr) => Ok(AlignedBuf { ptr, len, layout }),
            None => Err(Error::Alloc { bytes }),
        }
    }
}

impl<T> AlignedBuf<T> {
    /// The alignment in bytes the buffer was allocated with
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            unsafe {
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
            }
        }
    }
}

impl<T> Deref for AlignedBuf<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        unsafe {
            slice::from_raw_parts(self.ptr.as_ptr(), self.len)
        }
    }
}

impl<T> DerefMut for AlignedBuf<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len)
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AlignedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("align", &self.layout.align())
            .field("data", &&self[..])
            .finish()
    }
}
