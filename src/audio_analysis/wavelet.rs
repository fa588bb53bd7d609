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

//! Multi-band envelope from a discrete wavelet transform (DWT).
//!
//! Each window of the first channel is decomposed with the Daubechies "db4"
//! wavelet (8 taps) into one approximation band and one detail band per
//! level. The detail bands are brought to the time resolution of the
//! coarsest level by downsampling, rectified, freed from their mean, and
//! summed. The resulting envelope exposes periodic bursts of energy, e.g.,
//! from drums, across all frequency bands.
//!
//! No BPM is derived from the envelope yet. It is provided as a building
//! block for a periodicity analysis (e.g., autocorrelation).

use crate::audio_preprocessing::conversion::i16_sample_to_f64;
use crate::audio_preprocessing::windowing::windows;
use crate::{AudioSignal, TempoConfig, TempoError};
use alloc::vec::Vec;

/// Decomposition lowpass filter of the Daubechies wavelet with four
/// vanishing moments ("db4").
pub const DB4_LOW_PASS: [f64; 8] = [
    0.230_377_813_308_896_5,
    0.714_846_570_552_915_6,
    0.630_880_767_929_858_9,
    -0.027_983_769_416_859_9,
    -0.187_034_811_719_093_0,
    0.030_841_381_835_560_7,
    0.032_883_011_666_885_2,
    -0.010_597_401_785_069_0,
];

/// Decomposition highpass filter: the quadrature mirror of [`DB4_LOW_PASS`].
#[must_use]
pub fn db4_high_pass() -> [f64; 8] {
    let len = DB4_LOW_PASS.len();
    core::array::from_fn(|i| {
        let value = DB4_LOW_PASS[len - 1 - i];
        if i % 2 == 0 {
            value
        } else {
            -value
        }
    })
}

/// Kind of a [`WaveletBand`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BandKind {
    /// Remaining low frequencies after the deepest level.
    Approximation {
        /// Decomposition level (the deepest one).
        level: usize,
    },
    /// High frequencies split off at a level. Level 1 holds the highest
    /// frequencies.
    Detail {
        /// Decomposition level, starting at 1.
        level: usize,
    },
}

/// One subband of a [`WaveletDecomposition`].
#[derive(Clone, Debug, PartialEq)]
pub struct WaveletBand {
    kind: BandKind,
    coefficients: Vec<f64>,
}

impl WaveletBand {
    /// Returns the kind of the band.
    #[must_use]
    pub const fn kind(&self) -> BandKind {
        self.kind
    }

    /// Returns the coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Returns the number of coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns whether the band has no coefficients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Result of [`decompose`]. The bands are ordered like
/// `[A_L, D_L, D_(L-1), ..., D_1]` for `L` levels.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveletDecomposition {
    levels: usize,
    bands: Vec<WaveletBand>,
}

impl WaveletDecomposition {
    /// Returns the number of decomposition levels.
    #[must_use]
    pub const fn levels(&self) -> usize {
        self.levels
    }

    /// Returns all bands, approximation first.
    #[must_use]
    pub fn bands(&self) -> &[WaveletBand] {
        &self.bands
    }

    /// Returns the approximation band.
    #[must_use]
    pub fn approximation(&self) -> &WaveletBand {
        &self.bands[0]
    }

    /// Returns the detail band of the given level (`1..=levels`).
    #[must_use]
    pub fn detail(&self, level: usize) -> Option<&WaveletBand> {
        if level == 0 || level > self.levels {
            return None;
        }
        self.bands.get(1 + self.levels - level)
    }

    /// Returns the coefficient count of each band, in band order.
    #[must_use]
    pub fn lengths(&self) -> Vec<usize> {
        self.bands.iter().map(WaveletBand::len).collect()
    }
}

/// Decomposes a signal with the db4 wavelet into `levels` levels.
///
/// The signal is extended periodically at its borders, so each level halves
/// the length (rounded up). For signal lengths that are a multiple of
/// `2^levels`, the transform is orthonormal.
#[must_use]
pub fn decompose(signal: &[f64], levels: usize) -> WaveletDecomposition {
    let low_pass = DB4_LOW_PASS;
    let high_pass = db4_high_pass();

    let mut approximation = signal.to_vec();
    // level 1 first
    let mut details = Vec::with_capacity(levels);
    for _ in 0..levels {
        let (next_approximation, detail) = analysis_step(&approximation, &low_pass, &high_pass);
        details.push(detail);
        approximation = next_approximation;
    }

    let mut bands = Vec::with_capacity(levels + 1);
    bands.push(WaveletBand {
        kind: BandKind::Approximation { level: levels },
        coefficients: approximation,
    });
    for (i, coefficients) in details.into_iter().enumerate().rev() {
        bands.push(WaveletBand {
            kind: BandKind::Detail { level: i + 1 },
            coefficients,
        });
    }

    WaveletDecomposition { levels, bands }
}

/// One level of the transform: convolution with both filters and
/// downsampling by two, with periodic extension.
fn analysis_step(signal: &[f64], low_pass: &[f64], high_pass: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let len = signal.len();
    if len == 0 {
        return (Vec::new(), Vec::new());
    }

    let half = len.div_ceil(2);
    let mut approximation = Vec::with_capacity(half);
    let mut detail = Vec::with_capacity(half);
    for k in 0..half {
        let (a, d) = low_pass
            .iter()
            .zip(high_pass)
            .enumerate()
            .fold((0.0, 0.0), |(a, d), (j, (&lo, &hi))| {
                let x = signal[(2 * k + j) % len];
                (a + lo * x, d + hi * x)
            });
        approximation.push(a);
        detail.push(d);
    }
    (approximation, detail)
}

/// Keeps every `factor`-th coefficient, starting with the first. A factor
/// of zero is treated as one.
#[must_use]
pub fn downsample(band: &[f64], factor: usize) -> Vec<f64> {
    band.iter().step_by(factor.max(1)).copied().collect()
}

/// Replaces every coefficient by its absolute value.
pub fn rectify(band: &mut [f64]) {
    band.iter_mut().for_each(|x| *x = libm::fabs(*x));
}

/// Subtracts the mean of the band from every coefficient (DC removal).
pub fn remove_mean(band: &mut [f64]) {
    if band.is_empty() {
        return;
    }
    let mean = band.iter().sum::<f64>() / band.len() as f64;
    band.iter_mut().for_each(|x| *x -= mean);
}

/// Sums bands element-wise. The result is as long as the longest band;
/// shorter bands contribute zero beyond their end.
#[must_use]
pub fn sum_bands(bands: &[Vec<f64>]) -> Vec<f64> {
    let len = bands.iter().map(Vec::len).max().unwrap_or(0);
    let mut sum = alloc::vec![0.0; len];
    for band in bands {
        sum.iter_mut().zip(band).for_each(|(acc, x)| *acc += x);
    }
    sum
}

/// Factor that brings the detail band of `level` onto the time resolution
/// of the deepest level: `2^(levels - level)`. Saturates at `usize::MAX`.
#[must_use]
pub fn downsample_factor(levels: usize, level: usize) -> usize {
    u32::try_from(levels.saturating_sub(level))
        .ok()
        .and_then(|shift| 1_usize.checked_shl(shift))
        .unwrap_or(usize::MAX)
}

/// Computes the envelope of one window.
///
/// The detail band of level `l` is downsampled by `2^(levels - l)`, which
/// maps every band onto the time resolution of the deepest level (for four
/// levels: factor 8 for level 1 down to factor 1 for level 4). The
/// approximation band is not part of the envelope.
#[must_use]
pub fn window_envelope(window: &[i16], levels: usize) -> Vec<f64> {
    let signal = window.iter().copied().map(i16_sample_to_f64).collect::<Vec<_>>();
    let decomposition = decompose(&signal, levels);

    let bands = (1..=levels)
        .filter_map(|level| {
            let detail = decomposition.detail(level)?;
            let mut band = downsample(detail.coefficients(), downsample_factor(levels, level));
            rectify(&mut band);
            remove_mean(&mut band);
            Some(band)
        })
        .collect::<Vec<_>>();

    sum_bands(&bands)
}

/// Applies [`window_envelope`] to all full windows of the first channel of
/// a two-channel signal.
#[derive(Debug, Clone)]
pub struct WaveletEnvelopePipeline {
    window_len: usize,
    levels: usize,
}

impl WaveletEnvelopePipeline {
    /// Creates a new pipeline.
    ///
    /// # Panics
    /// If `window_len` is zero.
    #[must_use]
    pub fn new(window_len: usize, levels: usize) -> Self {
        assert!(window_len > 0, "window length must be positive");
        Self { window_len, levels }
    }

    /// Creates a new pipeline from the wavelet parameters of the config.
    #[must_use]
    pub fn from_config(config: &TempoConfig) -> Self {
        Self::new(config.window_len, config.wavelet_levels)
    }

    /// Returns one envelope per full window of the first channel, in time
    /// order. The second channel is not analyzed.
    ///
    /// # Errors
    /// - [`TempoError::UnsupportedChannelConfiguration`] if the signal
    ///   doesn't have exactly two channels.
    /// - [`TempoError::InsufficientSamples`] if the first channel is shorter
    ///   than one window.
    pub fn envelopes(&self, signal: &AudioSignal) -> Result<Vec<Vec<f64>>, TempoError> {
        let (channel, _) = signal.stereo_channels()?;

        let windows = windows(channel, self.window_len);
        if windows.len() == 0 {
            return Err(TempoError::InsufficientSamples {
                required: self.window_len,
                available: channel.len(),
            });
        }
        log::debug!(
            "wavelet envelope: {} windows of {} samples, dropping {} trailing samples",
            windows.len(),
            self.window_len,
            windows.remainder().len()
        );

        Ok(windows
            .map(|window| window_envelope(window, self.levels))
            .collect())
    }
}
