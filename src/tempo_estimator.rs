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

//! Module for [`TempoEstimator`].

use crate::audio_analysis::onset_detector::{BeatEvent, OnsetDetector};
use crate::audio_analysis::periodicity::{samples_to_bpm, DistanceHistogram};
use crate::audio_analysis::wavelet::WaveletEnvelopePipeline;
use crate::{AudioSignal, TempoConfig, TempoError};
use alloc::vec::Vec;

/// The analysis strategy of [`TempoEstimator::estimate`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Lowpass filter, onset detection against an adaptive threshold, and
    /// the most common distance between nearby onsets.
    #[default]
    AdaptiveThreshold,
    /// Multi-band wavelet envelope per window. The envelopes are computed,
    /// but no BPM is derived from them yet.
    WaveletEnvelope,
}

/// Result of a successful tempo estimation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TempoEstimate {
    bpm: f64,
    beat_period_samples: usize,
    beat_event_count: usize,
}

impl TempoEstimate {
    /// Returns the tempo in beats per minute.
    #[must_use]
    pub const fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Returns the dominant distance between beat events in samples.
    #[must_use]
    pub const fn beat_period_samples(&self) -> usize {
        self.beat_period_samples
    }

    /// Returns how many beat events the estimate is based on.
    #[must_use]
    pub const fn beat_event_count(&self) -> usize {
        self.beat_event_count
    }
}

/// Estimates the global tempo of a two-channel [`AudioSignal`].
///
/// The estimator holds no state between calls. Every call builds its own
/// filters and histories, so one estimator can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct TempoEstimator {
    config: TempoConfig,
}

impl TempoEstimator {
    /// Creates a new estimator.
    ///
    /// # Errors
    /// [`TempoError::InvalidConfig`] if the config doesn't pass
    /// [`TempoConfig::validate`].
    pub fn new(config: TempoConfig) -> Result<Self, TempoError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the config.
    #[must_use]
    pub const fn config(&self) -> &TempoConfig {
        &self.config
    }

    /// Estimates the tempo of the signal with the given strategy.
    ///
    /// # Errors
    /// - [`TempoError::UnsupportedChannelConfiguration`] if the signal
    ///   doesn't have exactly two channels.
    /// - [`TempoError::InsufficientSamples`] if the signal is too short for
    ///   the strategy.
    /// - [`TempoError::NoDominantPeriodicity`] if no beat period was found,
    ///   e.g., for silence.
    /// - [`TempoError::NotImplemented`] for
    ///   [`StrategyKind::WaveletEnvelope`], after its input was validated.
    pub fn estimate(
        &self,
        signal: &AudioSignal,
        strategy: StrategyKind,
    ) -> Result<TempoEstimate, TempoError> {
        log::debug!(
            "estimating tempo: strategy={strategy:?}, channels={}, frames={}, sample_rate={}",
            signal.channel_count(),
            signal.frame_count(),
            signal.sample_rate()
        );
        match strategy {
            StrategyKind::AdaptiveThreshold => self.estimate_adaptive_threshold(signal),
            StrategyKind::WaveletEnvelope => {
                let envelopes = self.wavelet_envelopes(signal)?;
                log::debug!("computed {} wavelet envelopes", envelopes.len());
                Err(TempoError::NotImplemented {
                    what: "BPM extraction from wavelet envelopes",
                })
            }
        }
    }

    /// Returns the beat events that [`StrategyKind::AdaptiveThreshold`]
    /// bases its estimate on.
    ///
    /// # Errors
    /// See [`OnsetDetector::detect`].
    pub fn beat_events(&self, signal: &AudioSignal) -> Result<Vec<BeatEvent>, TempoError> {
        OnsetDetector::new(self.config.clone())?.detect(signal)
    }

    /// Returns the envelopes of [`StrategyKind::WaveletEnvelope`], one per
    /// full window of the first channel.
    ///
    /// # Errors
    /// See [`WaveletEnvelopePipeline::envelopes`].
    pub fn wavelet_envelopes(&self, signal: &AudioSignal) -> Result<Vec<Vec<f64>>, TempoError> {
        WaveletEnvelopePipeline::from_config(&self.config).envelopes(signal)
    }

    fn estimate_adaptive_threshold(&self, signal: &AudioSignal) -> Result<TempoEstimate, TempoError> {
        let events = self.beat_events(signal)?;
        let histogram = DistanceHistogram::from_beat_events(&events, self.config.neighbour_radius);
        let distance = histogram
            .dominant_distance(self.config.min_beat_distance..self.config.max_beat_distance)?;

        let bpm = samples_to_bpm(distance as f64, signal.sample_rate());
        log::info!(
            "estimated {bpm:.2} BPM (beat period {distance} samples, {} beat events)",
            events.len()
        );
        Ok(TempoEstimate {
            bpm,
            beat_period_samples: distance,
            beat_event_count: events.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use assert2::check;
    use float_cmp::approx_eq;

    fn estimate_bpm(signal: &AudioSignal) -> f64 {
        TempoEstimator::default()
            .estimate(signal, StrategyKind::AdaptiveThreshold)
            .unwrap()
            .bpm()
    }

    #[test]
    fn is_send_and_sync() {
        fn accept<I: Send + Sync>() {}

        accept::<TempoEstimator>();
        accept::<TempoEstimate>();
    }

    #[test]
    fn click_track_at_120_bpm() {
        let signal = test_utils::click_track(44100, 22050, 2048, 8000, 30);
        let estimate = TempoEstimator::default()
            .estimate(&signal, StrategyKind::default())
            .unwrap();
        check!(approx_eq!(f64, estimate.bpm(), 120.0, epsilon = 1.0));
        check!(estimate.beat_period_samples() == 22050);
        check!(estimate.beat_event_count() > 0);
    }

    #[test]
    fn click_tracks_at_other_tempos() {
        // 100 BPM
        let bpm = estimate_bpm(&test_utils::click_track(44100, 26460, 2048, 8000, 30));
        check!(approx_eq!(f64, bpm, 100.0, epsilon = 3.0), "bpm = {bpm}");

        // 140 BPM
        let bpm = estimate_bpm(&test_utils::click_track(44100, 18900, 2048, 8000, 30));
        check!(approx_eq!(f64, bpm, 140.0, epsilon = 3.0), "bpm = {bpm}");
    }

    #[test]
    fn click_track_at_48_khz() {
        let bpm = estimate_bpm(&test_utils::click_track(48000, 24000, 2048, 8000, 30));
        check!(approx_eq!(f64, bpm, 120.0, epsilon = 1.0), "bpm = {bpm}");
    }

    #[test]
    fn noisy_click_track() {
        let signal = test_utils::noisy_click_track(44100, 22050, 2048, 8000, 30, 300);
        let bpm = estimate_bpm(&signal);
        check!(approx_eq!(f64, bpm, 120.0, epsilon = 1.0), "bpm = {bpm}");
    }

    #[test]
    fn silence_has_no_tempo() {
        let res = TempoEstimator::default()
            .estimate(&test_utils::silence(44100, 5), StrategyKind::AdaptiveThreshold);
        check!(matches!(res, Err(TempoError::NoDominantPeriodicity)));
    }

    #[test]
    fn rejects_non_stereo_signals() {
        let estimator = TempoEstimator::default();
        for channels in [1, 3] {
            let signal = AudioSignal::new(44100, vec![vec![0; 441000]; channels]).unwrap();
            for strategy in [StrategyKind::AdaptiveThreshold, StrategyKind::WaveletEnvelope] {
                check!(matches!(
                    estimator.estimate(&signal, strategy),
                    Err(TempoError::UnsupportedChannelConfiguration { channels: c }) if c == channels
                ));
            }
        }
    }

    #[test]
    fn wavelet_strategy_is_not_implemented() {
        let estimator = TempoEstimator::default();
        let signal = test_utils::click_track(44100, 22050, 2048, 8000, 10);
        check!(matches!(
            estimator.estimate(&signal, StrategyKind::WaveletEnvelope),
            Err(TempoError::NotImplemented { .. })
        ));
        check!(estimator.wavelet_envelopes(&signal).unwrap().len() == 3);

        let short = test_utils::silence(44100, 1);
        check!(matches!(
            estimator.estimate(&short, StrategyKind::WaveletEnvelope),
            Err(TempoError::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TempoConfig {
            window_len: 0,
            ..Default::default()
        };
        check!(matches!(
            TempoEstimator::new(config),
            Err(TempoError::InvalidConfig(_))
        ));
        check!(TempoEstimator::new(TempoConfig::default()).is_ok());

        // deeper than the window allows
        let config = TempoConfig {
            window_len: 1024,
            wavelet_levels: 70,
            ..Default::default()
        };
        check!(matches!(
            TempoEstimator::new(config),
            Err(TempoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn beat_events_are_exposed() {
        let signal = test_utils::click_track(44100, 22050, 2048, 8000, 30);
        let events = TempoEstimator::default().beat_events(&signal).unwrap();
        check!(!events.is_empty());
        check!(events.iter().all(|event| event.sample_index % 22050 < 2048));
    }
}
