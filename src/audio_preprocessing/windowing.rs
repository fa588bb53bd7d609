/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Segmentation of a channel into fixed-length, non-overlapping windows.

use core::iter::FusedIterator;
use core::slice::ChunksExact;

/// Returns an iterator over consecutive, non-overlapping windows of exactly
/// `window_len` samples. A trailing group of fewer than `window_len` samples
/// is dropped; see [`Windows::remainder`].
///
/// The iterator is lazy and can be restarted by cloning it before
/// consumption or by calling this function again.
///
/// # Panics
/// If `window_len` is zero.
#[must_use]
pub fn windows(channel: &[i16], window_len: usize) -> Windows<'_> {
    assert!(window_len > 0, "window length must be positive");
    Windows {
        chunks: channel.chunks_exact(window_len),
    }
}

/// Iterator returned by [`windows`].
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    chunks: ChunksExact<'a, i16>,
}

impl<'a> Windows<'a> {
    /// Returns the trailing samples that are too few to form a window. They
    /// are never emitted.
    #[must_use]
    pub fn remainder(&self) -> &'a [i16] {
        self.chunks.remainder()
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = &'a [i16];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl FusedIterator for Windows<'_> {}
