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

//! Utilities for processing audio input with a lowpass filter.

use biquad::{Biquad, Coefficients, DirectForm1, Type};

/// Second-order (biquad) IIR lowpass filter.
///
/// The coefficients follow the lowpass design of Robert Bristow-Johnson's
/// audio EQ cookbook and are derived once from a normalized cutoff frequency
/// (`cutoff_hz / sample_rate_hz`) and a quality factor. The filter runs in
/// direct form 1, i.e., it keeps two past inputs and two past outputs.
///
/// The delay line is mutated on every processed sample. Samples must be fed
/// in strict time order and each channel needs its own instance; sharing a
/// filter between channels corrupts its state.
#[derive(Debug)]
pub struct LowpassFilter {
    filter: DirectForm1<f32>,
}

impl LowpassFilter {
    /// Creates a new lowpass filter. See [`Self::configure`].
    #[must_use]
    pub fn new(normalized_cutoff: f32, quality_factor: f32) -> Self {
        let coefficients = Self::create_coefficients(normalized_cutoff, quality_factor);
        Self {
            filter: DirectForm1::<f32>::new(coefficients),
        }
    }

    /// Creates a new lowpass filter for the given cutoff frequency at the
    /// given sample rate.
    #[must_use]
    pub fn for_sample_rate(cutoff_hz: f32, sample_rate_hz: u32, quality_factor: f32) -> Self {
        Self::new(cutoff_hz / sample_rate_hz as f32, quality_factor)
    }

    /// Computes and stores the filter coefficients.
    ///
    /// `normalized_cutoff` is `cutoff_hz / sample_rate_hz`. A quality factor
    /// of `0.707` approximates a maximally flat response.
    ///
    /// A cutoff of zero or below, a cutoff at or above the Nyquist frequency
    /// (`>= 0.5`), a quality factor of zero or below, and NaN values can't be
    /// realized. In that case the filter becomes a pass-through and a
    /// warning is logged. It never panics.
    pub fn configure(&mut self, normalized_cutoff: f32, quality_factor: f32) {
        let coefficients = Self::create_coefficients(normalized_cutoff, quality_factor);
        self.filter.update_coefficients(coefficients);
    }

    /// Runs one sample through the lowpass filter and updates the internal
    /// state.
    ///
    /// Operates on raw amplitudes: for the lowpass filter, it is perfectly
    /// fine to feed `i16` sample values cast to `f32` without normalizing
    /// them first.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.filter.run(sample)
    }

    /// Clears the delay line. The coefficients are kept.
    pub fn reset(&mut self) {
        self.filter.reset_state();
    }

    fn create_coefficients(normalized_cutoff: f32, quality_factor: f32) -> Coefficients<f32> {
        // Written so that NaN is invalid, too. `biquad` itself would accept a
        // zero cutoff and cutoffs up to twice the Nyquist frequency.
        let valid_quality_factor = quality_factor > 0.0;
        let valid_cutoff = normalized_cutoff > 0.0 && normalized_cutoff < 0.5;
        let coefficients = if !valid_quality_factor {
            Err(biquad::Errors::NegativeQ)
        } else if !valid_cutoff {
            Err(biquad::Errors::OutsideNyquist)
        } else {
            // `biquad` normalizes to the Nyquist frequency, not to the
            // sample rate.
            Coefficients::<f32>::from_normalized_params(
                Type::LowPass,
                2.0 * normalized_cutoff,
                quality_factor,
            )
        };

        match coefficients {
            Ok(coefficients) => {
                log::debug!(
                    "lowpass filter: normalized cutoff={normalized_cutoff}, q={quality_factor}"
                );
                coefficients
            }
            Err(e) => {
                log::warn!(
                    "lowpass filter can't be realized (normalized cutoff={normalized_cutoff}, q={quality_factor}): {e:?}; passing samples through"
                );
                Self::passthrough_coefficients()
            }
        }
    }

    const fn passthrough_coefficients() -> Coefficients<f32> {
        Coefficients {
            a1: 0.0,
            a2: 0.0,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
        }
    }
}
