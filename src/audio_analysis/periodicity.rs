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

//! Periodicity histogram over the distances between nearby beat events and
//! the conversion of the dominant distance into BPM.

use crate::audio_analysis::onset_detector::BeatEvent;
use crate::TempoError;
use alloc::collections::BTreeMap;
use core::ops::Range;

/// Histogram mapping a distance between two beat events (in samples) to the
/// number of times it occurred.
///
/// Keys are ordered ascending; [`Self::dominant_distance`] relies on that
/// order for tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceHistogram {
    counts: BTreeMap<usize, usize>,
}

impl DistanceHistogram {
    /// Creates an empty histogram.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Builds the histogram of a beat event sequence. Every event is paired
    /// with each event up to `neighbour_radius` positions before and after
    /// it in the sequence (not in time). Each ordered pair counts once, so
    /// two neighbouring events contribute their distance twice.
    #[must_use]
    pub fn from_beat_events(events: &[BeatEvent], neighbour_radius: usize) -> Self {
        let mut histogram = Self::new();
        for (i, event) in events.iter().enumerate() {
            let from = i.saturating_sub(neighbour_radius);
            let to = i.saturating_add(neighbour_radius).min(events.len() - 1);
            for (j, other) in events.iter().enumerate().take(to + 1).skip(from) {
                if i != j {
                    histogram.record(event.distance(other));
                }
            }
        }
        log::debug!(
            "distance histogram: {} events, {} distinct distances",
            events.len(),
            histogram.len()
        );
        histogram
    }

    /// Increments the count of a distance.
    pub fn record(&mut self, distance: usize) {
        *self.counts.entry(distance).or_insert(0) += 1;
    }

    /// Returns how often a distance occurred.
    #[must_use]
    pub fn count(&self, distance: usize) -> usize {
        self.counts.get(&distance).copied().unwrap_or(0)
    }

    /// Iterates `(distance, count)` pairs in ascending distance order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&distance, &count)| (distance, count))
    }

    /// Returns the number of distinct distances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns whether no distance was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the most common distance within `range`.
    ///
    /// Distances are visited in ascending order and a distance only replaces
    /// the current favourite if its count is strictly higher. On a tie, the
    /// shorter distance wins.
    ///
    /// # Errors
    /// [`TempoError::NoDominantPeriodicity`] if no distance within `range`
    /// was recorded.
    pub fn dominant_distance(&self, range: Range<usize>) -> Result<usize, TempoError> {
        if range.is_empty() {
            return Err(TempoError::NoDominantPeriodicity);
        }

        let mut best: Option<(usize, usize)> = None;
        for (&distance, &count) in self.counts.range(range) {
            if count > best.map_or(0, |(_, best_count)| best_count) {
                best = Some((distance, count));
            }
        }

        let (distance, count) = best.ok_or(TempoError::NoDominantPeriodicity)?;
        log::debug!("dominant distance: {distance} samples ({count} times)");
        Ok(distance)
    }
}

/// Converts a beat period (distance in samples) into beats per minute.
#[inline]
#[must_use]
pub fn samples_to_bpm(distance: f64, sample_rate: u32) -> f64 {
    60.0 / (distance / f64::from(sample_rate))
}

/// Converts beats per minute into a beat period (distance in samples).
#[inline]
#[must_use]
pub fn bpm_to_samples(bpm: f64, sample_rate: u32) -> f64 {
    60.0 * f64::from(sample_rate) / bpm
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use float_cmp::approx_eq;
    use std::vec::Vec;

    fn events(indices: &[usize]) -> Vec<BeatEvent> {
        indices.iter().copied().map(BeatEvent::new).collect()
    }

    #[test]
    fn counts_each_ordered_pair() {
        let histogram =
            DistanceHistogram::from_beat_events(&events(&[0, 22050, 44100, 66150]), 5);
        check!(histogram.count(22050) == 6);
        check!(histogram.count(44100) == 4);
        check!(histogram.count(66150) == 2);
        check!(histogram.len() == 3);
        check!(
            histogram.iter().collect::<Vec<_>>() == [(22050, 6), (44100, 4), (66150, 2)]
        );
    }

    #[test]
    fn pairs_only_within_radius() {
        let indices = (0..8).map(|i| i * 1000).collect::<Vec<_>>();
        let histogram = DistanceHistogram::from_beat_events(&events(&indices), 5);
        check!(histogram.count(5000) == 6);
        check!(histogram.count(6000) == 0);
        check!(histogram.count(7000) == 0);

        // the first event is paired as well
        let histogram = DistanceHistogram::from_beat_events(&events(&[0, 3000]), 5);
        check!(histogram.count(3000) == 2);
    }

    #[test]
    fn duplicates_and_unsorted_events() {
        let histogram =
            DistanceHistogram::from_beat_events(&events(&[5000, 5000, 2000]), 5);
        check!(histogram.count(0) == 2);
        check!(histogram.count(3000) == 4);
    }

    #[test]
    fn empty_and_single_event() {
        check!(DistanceHistogram::from_beat_events(&[], 5).is_empty());
        check!(DistanceHistogram::from_beat_events(&events(&[42]), 5).is_empty());
    }

    #[test]
    fn deterministic() {
        let indices = (0..200).map(|i| (i * 7919) % 100_000).collect::<Vec<_>>();
        let a = DistanceHistogram::from_beat_events(&events(&indices), 5);
        let b = DistanceHistogram::from_beat_events(&events(&indices), 5);
        check!(a == b);
    }

    #[test]
    fn tie_keeps_shorter_distance() {
        let mut histogram = DistanceHistogram::new();
        for _ in 0..3 {
            histogram.record(3000);
            histogram.record(2000);
        }
        histogram.record(4000);
        check!(histogram.dominant_distance(1024..44100).unwrap() == 2000);
    }

    #[test]
    fn mode_respects_range() {
        let mut histogram = DistanceHistogram::new();
        for _ in 0..10 {
            histogram.record(500);
            histogram.record(44100);
            histogram.record(50000);
        }
        histogram.record(1024);
        histogram.record(30000);
        histogram.record(30000);
        check!(histogram.dominant_distance(1024..44100).unwrap() == 30000);
    }

    #[test]
    fn no_dominant_periodicity() {
        let histogram = DistanceHistogram::new();
        check!(matches!(
            histogram.dominant_distance(1024..44100),
            Err(TempoError::NoDominantPeriodicity)
        ));

        let mut histogram = DistanceHistogram::new();
        histogram.record(10);
        histogram.record(90000);
        check!(matches!(
            histogram.dominant_distance(1024..44100),
            Err(TempoError::NoDominantPeriodicity)
        ));
        check!(matches!(
            histogram.dominant_distance(44100..1024),
            Err(TempoError::NoDominantPeriodicity)
        ));
    }

    #[test]
    fn bpm_conversion() {
        check!(samples_to_bpm(22050.0, 44100) == 120.0);
        check!(samples_to_bpm(44100.0, 44100) == 60.0);
        check!(samples_to_bpm(24000.0, 48000) == 120.0);

        for bpm in [60.0, 87.5, 120.0, 133.3, 174.0, 200.0] {
            for sample_rate in [22050, 44100, 48000] {
                let distance = bpm_to_samples(bpm, sample_rate);
                check!(approx_eq!(
                    f64,
                    samples_to_bpm(distance, sample_rate),
                    bpm,
                    epsilon = 1e-9
                ));
            }
        }
    }
}
