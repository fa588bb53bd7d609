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

//! Module for conversion of values.

/// Level of the channel mix at one point in time: the absolute value of the
/// average of the left and the right (filtered) sample.
#[inline]
#[must_use]
pub fn mixed_level(l: f32, r: f32) -> f32 {
    libm::fabsf((l + r) / 2.0)
}

/// Rounds `value` down to a multiple of `multiple`.
///
/// A `multiple` of zero returns `value` unchanged.
#[inline]
#[must_use]
pub const fn round_down_to_multiple(value: usize, multiple: usize) -> usize {
    if multiple == 0 {
        value
    } else {
        value - value % multiple
    }
}

/// Converts a raw `i16` sample into the `f64` domain used by the wavelet
/// analysis. The amplitude is kept as is, no normalization.
#[inline]
#[must_use]
pub fn i16_sample_to_f64(val: i16) -> f64 {
    f64::from(val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_mixed_level() {
        check!(mixed_level(0.0, 0.0) == 0.0);
        check!(mixed_level(1000.0, 3000.0) == 2000.0);
        check!(mixed_level(-1000.0, -3000.0) == 2000.0);
        // opposite phases cancel out
        check!(mixed_level(5000.0, -5000.0) == 0.0);
        check!(mixed_level(i16::MIN as f32, i16::MIN as f32) == 32768.0);
    }

    #[test]
    fn test_round_down_to_multiple() {
        check!(round_down_to_multiple(44100, 1024) == 44032);
        check!(round_down_to_multiple(48000, 1024) == 47104);
        check!(round_down_to_multiple(2048, 1024) == 2048);
        check!(round_down_to_multiple(1000, 1024) == 0);
        check!(round_down_to_multiple(1000, 0) == 1000);
    }

    #[test]
    fn test_i16_sample_to_f64() {
        check!(i16_sample_to_f64(0) == 0.0);
        check!(i16_sample_to_f64(i16::MAX) == 32767.0);
        check!(i16_sample_to_f64(i16::MIN) == -32768.0);
    }
}
