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

//! Estimates the tempo of a 16-bit stereo WAV file.
//!
//! Usage: `tempo-from-wav <path/to/file.wav> [--wavelet] [--verbose]`

use log::LevelFilter;
use std::path::PathBuf;
use std::process::exit;
use tempo_detector::wav::read_wav_file;
use tempo_detector::{StrategyKind, TempoEstimator};

const USAGE: &str = "usage: tempo-from-wav <path/to/file.wav> [--wavelet] [--verbose]";

#[derive(Debug)]
struct Args {
    path: PathBuf,
    strategy: StrategyKind,
    verbose: bool,
}

/// Parses the command line. Prints a message and exits on invalid input.
fn parse_args() -> Args {
    let mut path = None;
    let mut strategy = StrategyKind::AdaptiveThreshold;
    let mut verbose = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--wavelet" => strategy = StrategyKind::WaveletEnvelope,
            "--verbose" => verbose = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                exit(0);
            }
            flag if flag.starts_with("--") => {
                eprintln!("unknown flag: {flag}");
                eprintln!("{USAGE}");
                exit(1);
            }
            _ if path.is_some() => {
                eprintln!("only one file can be analyzed at a time");
                eprintln!("{USAGE}");
                exit(1);
            }
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    let Some(path) = path else {
        println!("{USAGE}");
        exit(0);
    };

    Args {
        path,
        strategy,
        verbose,
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .with_colors(true)
        .with_utc_timestamps()
        .init()
        .unwrap();
}

fn main() {
    let args = parse_args();
    init_logger(args.verbose);

    if !args.path.is_file() {
        eprintln!("file not found: {}", args.path.display());
        exit(1);
    }

    let signal = match read_wav_file(&args.path) {
        Ok(signal) => signal,
        Err(e) => {
            eprintln!("failed to read {}: {e}", args.path.display());
            exit(1);
        }
    };
    log::info!(
        "{}: {} Hz, {} channels, {} frames ({:.1} s)",
        args.path.display(),
        signal.sample_rate(),
        signal.channel_count(),
        signal.frame_count(),
        signal.duration().as_secs_f64()
    );

    let estimator = TempoEstimator::default();
    log::info!("analyzing with strategy {:?}", args.strategy);
    match estimator.estimate(&signal, args.strategy) {
        Ok(estimate) => println!("BPM: {:.2}", estimate.bpm()),
        Err(e) => {
            eprintln!("tempo estimation failed: {e}");
            exit(1);
        }
    }
}
