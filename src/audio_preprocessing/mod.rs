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

//! Necessary types, helpers, and functions to pre-process audio input to
//! prepare it for the **analysis layer**.
//!
//! This module only operates on raw data and data streams, without interacting
//! with the outer world (I/O).

use crate::audio_preprocessing::lowpass_filter::LowpassFilter;
use alloc::vec::Vec;

pub mod conversion;
pub mod lowpass_filter;
pub mod windowing;

/// Runs the samples of one channel through the given lowpass filter and
/// returns the filtered samples as a new sequence. The input is left
/// untouched.
///
/// The filter should be freshly created (or [reset]) and not be used for any
/// other channel.
///
/// [reset]: LowpassFilter::reset
#[must_use]
pub fn lowpass_channel(samples: &[i16], filter: &mut LowpassFilter) -> Vec<f32> {
    samples
        .iter()
        // For the lowpass filter, it is perfectly fine to just cast the
        // types. We do not need to limit the i16 value to the sample value
        // range of typical f32 samples.
        .map(|&sample| filter.process(sample as f32))
        .collect()
}
