// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::cmp::min;

#[derive(Copy, Clone, Debug)]
pub(crate) struct RangeChunk { i: usize, n: usize, chunk: usize }

/// Create an iterator that splits `n` in chunks of size `chunk`;
/// the last item can be an uneven chunk.
///
/// Items are `(chunk index, chunk length)`.
pub(crate) fn range_chunk(n: usize, chunk: usize) -> RangeChunk {
    debug_assert_ne!(chunk, 0);
    RangeChunk { i: 0, n, chunk }
}

impl Iterator for RangeChunk {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.n == 0 {
            None
        } else {
            let i = self.i;
            let rem = min(self.n, self.chunk);
            self.i += 1;
            self.n -= rem;
            Some((i, rem))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.n / self.chunk + (self.n % self.chunk != 0) as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for RangeChunk { }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_chunks() {
        let v: Vec<_> = range_chunk(512, 256).collect();
        assert_eq!(v, vec![(0, 256), (1, 256)]);
    }

    #[test]
    fn uneven_last_chunk() {
        let it = range_chunk(100, 32);
        assert_eq!(it.len(), 4);
        let v: Vec<_> = it.collect();
        assert_eq!(v, vec![(0, 32), (1, 32), (2, 32), (3, 4)]);
    }

    #[test]
    fn empty_range() {
        assert_eq!(range_chunk(0, 8).len(), 0);
        assert_eq!(range_chunk(0, 8).next(), None);
    }
}
