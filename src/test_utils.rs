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

//! Synthetic test signals.
//!
//! A click track here is a two-channel signal with a rectangular burst of
//! constant amplitude at every beat. The lowpass filter passes the burst
//! almost unchanged, so the onsets are well defined.

use crate::AudioSignal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::vec::Vec;

/// Returns the mono samples of a click track: a burst of `burst_len`
/// samples at `amplitude` every `period` samples, for `duration_secs`.
pub fn click_track_samples(
    sample_rate: u32,
    period: usize,
    burst_len: usize,
    amplitude: i16,
    duration_secs: u32,
) -> Vec<i16> {
    let len = sample_rate as usize * duration_secs as usize;
    (0..len)
        .map(|i| {
            if i % period < burst_len {
                amplitude
            } else {
                0
            }
        })
        .collect()
}

/// Returns a stereo click track with identical channels. See
/// [`click_track_samples`].
pub fn click_track(
    sample_rate: u32,
    period: usize,
    burst_len: usize,
    amplitude: i16,
    duration_secs: u32,
) -> AudioSignal {
    let samples = click_track_samples(sample_rate, period, burst_len, amplitude, duration_secs);
    AudioSignal::stereo(sample_rate, samples.clone(), samples).unwrap()
}

/// Like [`click_track`], but each channel carries independent uniform noise
/// in `-noise..=noise`. Seeded, so every run sees the same signal.
pub fn noisy_click_track(
    sample_rate: u32,
    period: usize,
    burst_len: usize,
    amplitude: i16,
    duration_secs: u32,
    noise: i16,
) -> AudioSignal {
    let mut rng = StdRng::seed_from_u64(0x7e3f0);
    let mut add_noise = |samples: &[i16]| {
        samples
            .iter()
            .map(|&sample| sample.saturating_add(rng.random_range(-noise..=noise)))
            .collect::<Vec<_>>()
    };

    let samples = click_track_samples(sample_rate, period, burst_len, amplitude, duration_secs);
    let left = add_noise(&samples);
    let right = add_noise(&samples);
    AudioSignal::stereo(sample_rate, left, right).unwrap()
}

/// Returns a silent stereo signal.
pub fn silence(sample_rate: u32, duration_secs: u32) -> AudioSignal {
    let len = sample_rate as usize * duration_secs as usize;
    AudioSignal::stereo(sample_rate, std::vec![0; len], std::vec![0; len]).unwrap()
}

#[test]
fn test_click_track_layout() {
    let samples = click_track_samples(44100, 22050, 4, 100, 1);
    assert_eq!(samples.len(), 44100);
    assert_eq!(&samples[0..5], &[100, 100, 100, 100, 0]);
    assert_eq!(&samples[22049..22055], &[0, 100, 100, 100, 100, 0]);
    assert_eq!(samples.iter().filter(|&&s| s != 0).count(), 8);
}
