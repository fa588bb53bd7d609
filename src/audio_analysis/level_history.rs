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

//! Helpers for the bookkeeping of recent mixed levels.
//!
//! See [`LevelHistory`].

use ringbuffer::{AllocRingBuffer, RingBuffer};

/// Sliding window of the most recent mixed levels together with their
/// running average.
///
/// New levels enter at the front; once the capacity is reached, every new
/// level evicts the oldest one at the back. The average always covers all
/// levels currently in the window.
#[derive(Debug)]
pub struct LevelHistory {
    levels: AllocRingBuffer<f32>,
    /// Running sum of `levels`. Kept in `f64` so that adding and evicting
    /// `f32` levels doesn't drift noticeably.
    sum: f64,
}

impl LevelHistory {
    /// Creates a new history with the given capacity that initially holds
    /// `prefill` silent (zero) levels. `prefill` is clamped to `capacity`.
    ///
    /// # Panics
    /// If `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize, prefill: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        let mut levels = AllocRingBuffer::new(capacity);
        for _ in 0..prefill.min(capacity) {
            levels.push(0.0);
        }
        Self { levels, sum: 0.0 }
    }

    /// Adds the newest level and evicts the oldest one if the history is
    /// full.
    #[inline]
    pub fn push(&mut self, level: f32) {
        if self.levels.is_full() {
            if let Some(oldest) = self.levels.dequeue() {
                // Levels are never negative, neither is their sum.
                self.sum = libm::fmax(self.sum - f64::from(oldest), 0.0);
            }
        }
        self.levels.push(level);
        self.sum += f64::from(level);
    }

    /// Returns the average of all levels in the history, or `0.0` if it is
    /// empty.
    #[inline]
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.levels.is_empty() {
            0.0
        } else {
            self.sum / self.levels.len() as f64
        }
    }

    /// Returns the number of levels in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns whether the history holds no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the maximum number of levels in the history.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.levels.capacity()
    }
}
