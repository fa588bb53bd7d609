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

//! tempo-detector estimates the tempo of a fully buffered stereo recording in
//! beats per minute (BPM). The result is meant to drive downstream generation
//! of rhythm-game step charts, so a single global tempo is all it produces.
//!
//! # TL;DR
//! Wrap your decoded PCM data in an [`AudioSignal`] and hand it to a
//! [`TempoEstimator`]. The default strategy low-pass filters both channels,
//! detects beat onsets against an adaptive threshold, and picks the most
//! common distance between nearby onsets as the beat period.
//!
//! ```rust
//! use tempo_detector::{AudioSignal, StrategyKind, TempoEstimator, TempoError};
//!
//! // Two seconds of silence: too short for the 5 s lead-in.
//! let signal = AudioSignal::stereo(44100, vec![0; 88200], vec![0; 88200]).unwrap();
//! let estimator = TempoEstimator::default();
//! let res = estimator.estimate(&signal, StrategyKind::AdaptiveThreshold);
//! assert!(matches!(res, Err(TempoError::InsufficientSamples { .. })));
//! ```
//!
//! # Strategies
//! - [`StrategyKind::AdaptiveThreshold`]: biquad low-pass (200 Hz) on each
//!   channel, onset scan with a moving-average threshold, distance histogram.
//!   This is the complete strategy.
//! - [`StrategyKind::WaveletEnvelope`]: per-window 4-level db4 wavelet
//!   decomposition producing a rectified, mean-removed, band-summed envelope.
//!   The envelopes are available via [`TempoEstimator::wavelet_envelopes`],
//!   but no BPM is derived from them yet, so the estimator reports
//!   [`TempoError::NotImplemented`].
//!
//! # Architecture
//! - [`audio_preprocessing`]: signal conditioning (low-pass filter, window
//!   segmentation, conversions). Does not interpret rhythm.
//! - [`audio_analysis`]: onset detection, periodicity histogram, wavelet
//!   envelope.
//! - [`tempo_estimator`]: ties everything together.
//!
//! Everything operates on in-memory data; reading WAV files is done by the
//! optional [`wav`] module (feature `wav`).

#![no_std]
#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from,
    clippy::multiple_crate_versions
)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

#[cfg_attr(test, macro_use)]
#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub mod audio_analysis;
pub mod audio_preprocessing;
mod audio_signal;
pub mod config;
mod error;
pub mod tempo_estimator;
#[cfg(feature = "wav")]
pub mod wav;

#[cfg(test)]
mod test_utils;

pub use audio_analysis::onset_detector::BeatEvent;
pub use audio_signal::AudioSignal;
pub use config::TempoConfig;
pub use error::TempoError;
pub use tempo_estimator::{StrategyKind, TempoEstimate, TempoEstimator};
