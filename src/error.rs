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

//! Module for [`TempoError`].

use thiserror::Error;

/// Everything that can go wrong while estimating the tempo.
///
/// All failures are detected up front or when the periodicity histogram is
/// resolved. Nothing is retried internally: the computation is deterministic,
/// so retrying with the same input would fail the same way.
#[derive(Debug, Error)]
pub enum TempoError {
    /// Tempo estimation needs exactly two channels.
    #[error("unsupported channel configuration: expected 2 channels, got {channels}")]
    UnsupportedChannelConfiguration {
        /// The number of channels of the signal.
        channels: usize,
    },
    /// The signal is shorter than what the strategy needs before it can
    /// start the analysis.
    #[error("insufficient samples: need at least {required} frames, got {available}")]
    InsufficientSamples {
        /// Minimum number of frames (samples per channel).
        required: usize,
        /// Available number of frames.
        available: usize,
    },
    /// No distance between beat events falls into the accepted range.
    #[error("no dominant periodicity found between beat events")]
    NoDominantPeriodicity,
    /// The requested computation exists only as a building block so far.
    #[error("not implemented: {what}")]
    NotImplemented {
        /// What is missing.
        what: &'static str,
    },
    /// The sample rate must be positive.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
    /// A [`crate::TempoConfig`] value is out of its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Only uncompressed 16-bit integer PCM is supported.
    #[cfg(feature = "wav")]
    #[error("unsupported sample format: {bits_per_sample} bit (float: {float})")]
    UnsupportedSampleFormat {
        /// Bits per sample as declared in the `fmt ` chunk.
        bits_per_sample: u16,
        /// Whether the samples are IEEE floats.
        float: bool,
    },
    /// The WAV container could not be decoded.
    #[cfg(feature = "wav")]
    #[error("failed to read WAV data")]
    Wav(#[from] hound::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::string::ToString;

    #[test]
    fn messages_name_the_offending_values() {
        check!(
            TempoError::UnsupportedChannelConfiguration { channels: 3 }.to_string()
                == "unsupported channel configuration: expected 2 channels, got 3"
        );
        check!(
            TempoError::InsufficientSamples {
                required: 220500,
                available: 10
            }
            .to_string()
                == "insufficient samples: need at least 220500 frames, got 10"
        );
    }

    #[test]
    fn is_send_and_sync() {
        fn accept<I: Send + Sync>() {}

        accept::<TempoError>();
    }
}
