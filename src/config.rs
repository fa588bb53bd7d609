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

//! Tuning parameters of the tempo estimation.
//!
//! All values are fixed configuration values rather than derived quantities.
//! The defaults are tuned for 44.1 kHz music with a steady beat.

use crate::TempoError;

/// Default cutoff frequency of the lowpass filter before onset detection.
pub const DEFAULT_LOWPASS_CUTOFF_HZ: f32 = 200.0;

/// Default quality factor of the lowpass filter. Approximates a maximally
/// flat (Butterworth) response.
pub const DEFAULT_LOWPASS_QUALITY_FACTOR: f32 = 0.707;

/// Default length of a wavelet analysis window. This is a power of two and
/// roughly 2.97 s at 44.1 kHz.
pub const DEFAULT_WINDOW_LEN: usize = 131072;

/// Parameters for [`crate::TempoEstimator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TempoConfig {
    /// Cutoff frequency (Hz) of the per-channel lowpass filter
    /// (default: 200.0).
    pub lowpass_cutoff_hz: f32,
    /// Quality factor of the lowpass filter (default: 0.707).
    pub lowpass_quality_factor: f32,
    /// Sensitivity multiplier `C`. A mixed level is an onset if it exceeds
    /// `average * C` (default: 2.0).
    pub sensitivity: f64,
    /// Step (in samples) of the inner scan cursor when no onset was found.
    /// The scan start is aligned to a multiple of this value
    /// (default: 1024).
    pub coarse_step: usize,
    /// Capacity of the sliding window of recent mixed levels
    /// (default: 44100). This does not follow the sample rate of the signal.
    pub level_history_capacity: usize,
    /// Seconds of audio used to fill the level history before the scan
    /// starts (default: 5).
    pub lead_in_secs: u32,
    /// Number of neighbouring beat events (in each direction) that are
    /// paired with an event in the distance histogram (default: 5).
    pub neighbour_radius: usize,
    /// Smallest distance (inclusive, in samples) accepted as beat period
    /// (default: 1024).
    pub min_beat_distance: usize,
    /// Largest distance (exclusive, in samples) accepted as beat period
    /// (default: 44100).
    pub max_beat_distance: usize,
    /// Window length of the wavelet strategy (default: 131072).
    pub window_len: usize,
    /// Decomposition depth of the wavelet strategy (default: 4).
    pub wavelet_levels: usize,
}

impl TempoConfig {
    /// Checks that the configuration can't stall the scan loops and that the
    /// accepted distance range is not empty.
    pub fn validate(&self) -> Result<(), TempoError> {
        if self.coarse_step == 0 {
            return Err(TempoError::InvalidConfig("coarse_step must be positive"));
        }
        if self.level_history_capacity == 0 {
            return Err(TempoError::InvalidConfig(
                "level_history_capacity must be positive",
            ));
        }
        if self.window_len == 0 {
            return Err(TempoError::InvalidConfig("window_len must be positive"));
        }
        if self.wavelet_levels == 0 {
            return Err(TempoError::InvalidConfig("wavelet_levels must be positive"));
        }
        // Each level halves the band length.
        if self.wavelet_levels > self.window_len.ilog2() as usize {
            return Err(TempoError::InvalidConfig(
                "wavelet_levels must not exceed log2(window_len)",
            ));
        }
        if self.min_beat_distance >= self.max_beat_distance {
            return Err(TempoError::InvalidConfig(
                "min_beat_distance must be smaller than max_beat_distance",
            ));
        }
        Ok(())
    }
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            lowpass_cutoff_hz: DEFAULT_LOWPASS_CUTOFF_HZ,
            lowpass_quality_factor: DEFAULT_LOWPASS_QUALITY_FACTOR,
            sensitivity: 2.0,
            coarse_step: 1024,
            level_history_capacity: 44100,
            lead_in_secs: 5,
            neighbour_radius: 5,
            min_beat_distance: 1024,
            max_beat_distance: 44100,
            window_len: DEFAULT_WINDOW_LEN,
            wavelet_levels: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn default_is_valid() {
        check!(TempoConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_stalling_or_empty_values() {
        let config = TempoConfig {
            coarse_step: 0,
            ..Default::default()
        };
        check!(matches!(config.validate(), Err(TempoError::InvalidConfig(_))));

        let config = TempoConfig {
            min_beat_distance: 44100,
            ..Default::default()
        };
        check!(matches!(config.validate(), Err(TempoError::InvalidConfig(_))));

        let config = TempoConfig {
            wavelet_levels: 0,
            ..Default::default()
        };
        check!(matches!(config.validate(), Err(TempoError::InvalidConfig(_))));

        let config = TempoConfig {
            level_history_capacity: 0,
            ..Default::default()
        };
        check!(matches!(config.validate(), Err(TempoError::InvalidConfig(_))));
    }

    #[test]
    fn wavelet_levels_are_bounded_by_window_len() {
        let config = |window_len, wavelet_levels| TempoConfig {
            window_len,
            wavelet_levels,
            ..Default::default()
        };
        check!(config(1024, 10).validate().is_ok());
        check!(matches!(
            config(1024, 11).validate(),
            Err(TempoError::InvalidConfig(_))
        ));
        check!(matches!(
            config(1024, 70).validate(),
            Err(TempoError::InvalidConfig(_))
        ));
        check!(config(131072, 17).validate().is_ok());
    }
}
