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

//! Module for [`AudioSignal`].

use crate::TempoError;
use alloc::vec::Vec;
use core::time::Duration;

/// A fully buffered PCM recording: one sequence of signed 16-bit samples per
/// channel plus the sample rate.
///
/// The type accepts any channel count so that a decoder can hand over
/// whatever it found. Tempo estimation itself needs exactly two channels and
/// reports other configurations as
/// [`TempoError::UnsupportedChannelConfiguration`].
///
/// The estimation never mutates the signal. Filtering happens on owned
/// copies, so the original samples stay available to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSignal {
    sample_rate: u32,
    channels: Vec<Vec<i16>>,
}

impl AudioSignal {
    /// Creates a new signal from per-channel sample sequences.
    pub fn new(sample_rate: u32, channels: Vec<Vec<i16>>) -> Result<Self, TempoError> {
        if sample_rate == 0 {
            return Err(TempoError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Creates a new two-channel signal.
    pub fn stereo(sample_rate: u32, left: Vec<i16>, right: Vec<i16>) -> Result<Self, TempoError> {
        Self::new(sample_rate, alloc::vec![left, right])
    }

    /// Creates a new signal from interleaved samples (e.g. LRLR for stereo),
    /// as they are stored in the `data` chunk of a WAV file. Sample `i`
    /// belongs to channel `i % channel_count`.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        interleaved: &[i16],
    ) -> Result<Self, TempoError> {
        if channel_count == 0 {
            return Err(TempoError::UnsupportedChannelConfiguration { channels: 0 });
        }

        let mut channels = (0..channel_count)
            .map(|_| Vec::with_capacity(interleaved.len() / channel_count + 1))
            .collect::<Vec<_>>();
        for (i, &sample) in interleaved.iter().enumerate() {
            channels[i % channel_count].push(sample);
        }
        Self::new(sample_rate, channels)
    }

    /// Returns the sample rate (Hz).
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the samples of the given channel, if it exists.
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[i16]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Returns all channels.
    #[must_use]
    pub fn channels(&self) -> &[Vec<i16>] {
        &self.channels
    }

    /// Returns the number of frames, i.e., the length of the shortest
    /// channel. Channels of a decoded file may differ by one sample if the
    /// `data` chunk ends mid-frame.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Returns the duration of the signal.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }

    /// Returns the left and the right channel, or
    /// [`TempoError::UnsupportedChannelConfiguration`] if the signal doesn't
    /// have exactly two channels.
    pub fn stereo_channels(&self) -> Result<(&[i16], &[i16]), TempoError> {
        match self.channels.as_slice() {
            [left, right] => Ok((left, right)),
            other => Err(TempoError::UnsupportedChannelConfiguration {
                channels: other.len(),
            }),
        }
    }
}
