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

//! Decoding of uncompressed 16-bit PCM WAV data into an [`AudioSignal`].
//!
//! Requires the `wav` feature.

use crate::{AudioSignal, TempoError};
use alloc::vec::Vec;
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;

/// Reads WAV data with signed 16-bit integer samples from a reader. All
/// channels are kept; whether the channel count fits a strategy is checked
/// during estimation.
///
/// # Errors
/// - [`TempoError::Wav`] if the data is not a valid WAV container.
/// - [`TempoError::UnsupportedSampleFormat`] for any format other than
///   16-bit integer PCM.
/// - [`TempoError::InvalidSampleRate`] if the header declares 0 Hz.
pub fn read_wav<R: Read>(reader: R) -> Result<AudioSignal, TempoError> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();
    log::debug!(
        "WAV header: {} channels, {} Hz, {} bit, {:?}",
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(TempoError::UnsupportedSampleFormat {
            bits_per_sample: spec.bits_per_sample,
            float: spec.sample_format == SampleFormat::Float,
        });
    }

    let interleaved = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;
    AudioSignal::from_interleaved(spec.sample_rate, usize::from(spec.channels), &interleaved)
}

/// Opens and reads a WAV file. See [`read_wav`].
///
/// # Errors
/// See [`read_wav`]. A file that can't be opened is reported as
/// [`TempoError::Wav`].
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<AudioSignal, TempoError> {
    let file = std::fs::File::open(path.as_ref()).map_err(hound::Error::IoError)?;
    read_wav(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn encode<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut bytes, spec).unwrap();
            for &sample in samples {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes.into_inner()
    }

    fn spec(channels: u16, bits_per_sample: u16, sample_format: SampleFormat) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample,
            sample_format,
        }
    }

    #[test]
    fn reads_stereo_pcm16() {
        let bytes = encode(spec(2, 16, SampleFormat::Int), &[1_i16, -1, 2, -2, 3, -3]);
        let signal = read_wav(Cursor::new(bytes)).unwrap();
        check!(signal.sample_rate() == 44100);
        check!(signal.channel_count() == 2);
        check!(signal.channel(0) == Some(&[1, 2, 3][..]));
        check!(signal.channel(1) == Some(&[-1, -2, -3][..]));
    }

    #[test]
    fn keeps_mono_files() {
        let bytes = encode(spec(1, 16, SampleFormat::Int), &[7_i16; 10]);
        let signal = read_wav(Cursor::new(bytes)).unwrap();
        check!(signal.channel_count() == 1);
        check!(signal.frame_count() == 10);
    }

    #[test]
    fn rejects_other_sample_formats() {
        let bytes = encode(spec(2, 32, SampleFormat::Float), &[0.5_f32; 4]);
        check!(matches!(
            read_wav(Cursor::new(bytes)),
            Err(TempoError::UnsupportedSampleFormat {
                bits_per_sample: 32,
                float: true
            })
        ));

        let bytes = encode(spec(2, 8, SampleFormat::Int), &[1_i8; 4]);
        check!(matches!(
            read_wav(Cursor::new(bytes)),
            Err(TempoError::UnsupportedSampleFormat {
                bits_per_sample: 8,
                float: false
            })
        ));
    }

    #[test]
    fn rejects_garbage_and_missing_files() {
        check!(matches!(
            read_wav(Cursor::new(b"definitely not a RIFF file".to_vec())),
            Err(TempoError::Wav(_))
        ));
        check!(matches!(
            read_wav_file("/this/path/does/not/exist.wav"),
            Err(TempoError::Wav(hound::Error::IoError(_)))
        ));
    }
}
