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

//! Onset detection with an adaptive threshold on the lowpassed channel mix.
//!
//! Both channels run through their own lowpass filter first, so that mostly
//! the low-frequency energy of kick drums and bass lines remains. The
//! detector then compares the mixed level ([`mixed_level`]) at scan
//! positions against a multiple of the average of recent levels.
//!
//! # Scan
//! The level history is filled with the first seconds of audio (the
//! lead-in). The scan starts at the lead-in, aligned down to the coarse step
//! grid. An outer cursor advances by a quarter second. For each outer
//! position, an inner cursor walks up to one second ahead:
//! - if the level at the inner cursor exceeds `average * sensitivity`, the
//!   position is recorded as [`BeatEvent`] and the cursor skips a quarter
//!   second so that the same beat doesn't trigger again,
//! - otherwise the cursor advances by the coarse step.
//!
//! After every step the level enters the history and the average is updated.
//! As the inner windows of neighbouring outer positions overlap, a beat can
//! be recorded more than once and the events are not necessarily sorted.

use crate::audio_analysis::level_history::LevelHistory;
use crate::audio_preprocessing::conversion::{mixed_level, round_down_to_multiple};
use crate::audio_preprocessing::lowpass_channel;
use crate::audio_preprocessing::lowpass_filter::LowpassFilter;
use crate::{AudioSignal, TempoConfig, TempoError};
use alloc::vec::Vec;
use core::time::Duration;

/// A sample position at which an onset was detected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BeatEvent {
    /// Index of the sample (frame) in the channel.
    pub sample_index: usize,
}

impl BeatEvent {
    /// Creates a new event.
    #[must_use]
    pub const fn new(sample_index: usize) -> Self {
        Self { sample_index }
    }

    /// Returns the time of the event relative to the beginning of the
    /// signal.
    #[must_use]
    pub fn timestamp(&self, sample_rate: u32) -> Duration {
        Duration::from_secs_f64(self.sample_index as f64 / sample_rate as f64)
    }

    /// Returns the absolute distance in samples to another event.
    #[must_use]
    pub const fn distance(&self, other: &Self) -> usize {
        self.sample_index.abs_diff(other.sample_index)
    }
}

/// Adaptive-threshold onset detector. See the [module description].
///
/// [module description]: crate::audio_analysis::onset_detector
#[derive(Debug, Clone)]
pub struct OnsetDetector {
    config: TempoConfig,
}

impl OnsetDetector {
    /// Creates a new detector.
    ///
    /// # Errors
    /// [`TempoError::InvalidConfig`] if the config doesn't pass
    /// [`TempoConfig::validate`].
    pub fn new(config: TempoConfig) -> Result<Self, TempoError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Detects the beat events of a two-channel signal.
    ///
    /// The signal is not modified; the lowpass filters run on copies.
    ///
    /// # Errors
    /// - [`TempoError::UnsupportedChannelConfiguration`] if the signal
    ///   doesn't have exactly two channels. Nothing is filtered then.
    /// - [`TempoError::InsufficientSamples`] if the signal is empty or
    ///   shorter than the lead-in.
    pub fn detect(&self, signal: &AudioSignal) -> Result<Vec<BeatEvent>, TempoError> {
        let (left, right) = signal.stereo_channels()?;
        let sample_rate = signal.sample_rate() as usize;

        let frames = left.len().min(right.len());
        let lead_in = sample_rate * self.config.lead_in_secs as usize;
        if frames == 0 || frames < lead_in {
            return Err(TempoError::InsufficientSamples {
                required: lead_in.max(1),
                available: frames,
            });
        }

        let (left, right) = self.lowpass(&left[..frames], &right[..frames], signal.sample_rate());

        if sample_rate != self.config.level_history_capacity {
            log::warn!(
                "sample rate {sample_rate} Hz differs from the level history capacity ({}); the average covers {:.2} s",
                self.config.level_history_capacity,
                self.config.level_history_capacity as f64 / sample_rate as f64
            );
        }
        let mut history = LevelHistory::new(self.config.level_history_capacity, sample_rate);
        left.iter()
            .zip(&right)
            .take(lead_in)
            .for_each(|(&l, &r)| history.push(mixed_level(l, r)));

        let events = self.scan(&left, &right, sample_rate, &mut history);
        log::debug!(
            "found {} beat events in {frames} frames ({} Hz)",
            events.len(),
            sample_rate
        );
        Ok(events)
    }

    /// Runs both channels through their own lowpass filter.
    fn lowpass(&self, left: &[i16], right: &[i16], sample_rate: u32) -> (Vec<f32>, Vec<f32>) {
        let new_filter = || {
            LowpassFilter::for_sample_rate(
                self.config.lowpass_cutoff_hz,
                sample_rate,
                self.config.lowpass_quality_factor,
            )
        };
        let left = lowpass_channel(left, &mut new_filter());
        let right = lowpass_channel(right, &mut new_filter());
        (left, right)
    }

    /// Scans the lowpassed channels after the lead-in. Both channels have
    /// the same length.
    fn scan(
        &self,
        left: &[f32],
        right: &[f32],
        sample_rate: usize,
        history: &mut LevelHistory,
    ) -> Vec<BeatEvent> {
        debug_assert_eq!(left.len(), right.len());
        let frames = left.len();
        // Cursors must always move forward.
        let quarter_second = (sample_rate / 4).max(1);
        let coarse_step = self.config.coarse_step.max(1);

        let mut events = Vec::new();
        let mut average = history.average();

        let mut outer = round_down_to_multiple(sample_rate, coarse_step)
            * self.config.lead_in_secs as usize;
        while outer < frames {
            let inner_end = (outer + sample_rate).min(frames);
            let mut cursor = outer;
            while cursor < inner_end {
                let level = mixed_level(left[cursor], right[cursor]);
                if f64::from(level) > average * self.config.sensitivity {
                    log::trace!("onset at sample {cursor}: level={level}, average={average}");
                    events.push(BeatEvent::new(cursor));
                    cursor += quarter_second;
                } else {
                    cursor += coarse_step;
                }
                history.push(level);
                average = history.average();
            }
            outer += quarter_second;
        }

        events
    }
}
