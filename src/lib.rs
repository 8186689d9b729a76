//! # Pitch Detect
//! *pitchdetect* estimates the fundamental frequency of a block of audio samples
//! and turns it into something a tuner can show: the nearest note, how many
//! cents it is off, and a color.
//!
//! # Pipeline
//!   * [AutocorrelationDetector][detector::autocorrelation] scans lags of a
//!     [SampleWindow] for the first strong self-similarity peak.
//!   * [music] maps the frequency to a note number, name, octave and cents offset.
//!   * [color] maps the frequency onto the visible spectrum.
//!   * [driver] ties an [AudioSource][driver::AudioSource], a detector and a
//!     [PresentationSink][driver::PresentationSink] into a detection loop.
//!
//! # Examples
//! ```
//! use pitchdetect::detector::autocorrelation::AutocorrelationDetector;
//! use pitchdetect::driver::{analyze, Analysis};
//! use pitchdetect::SampleWindow;
//!
//! fn main() {
//!     const SAMPLE_RATE: u32 = 44100;
//!     const SIZE: usize = 1024;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 220.0;
//!     let signal: Vec<f64> = (0..SIZE)
//!         .map(|x| (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin())
//!         .collect();
//!     let window = SampleWindow::new(signal, SAMPLE_RATE).unwrap();
//!
//!     let mut detector = AutocorrelationDetector::new(SIZE);
//!     let estimate = detector.detect(&window).unwrap();
//!
//!     match analyze(estimate).unwrap() {
//!         Analysis::Detected(reading) => {
//!             println!(
//!                 "Frequency: {:.1} Hz, note: {}, {}, color: {}",
//!                 reading.frequency, reading.note, reading.note.detune, reading.color
//!             );
//!             assert_eq!(reading.note.name, "A");
//!         }
//!         Analysis::NotDetected => println!("-- Hz"),
//!     }
//! }
//! ```

pub use config::DetectorConfig;
pub use detector::internals::PitchEstimate;
pub use error::{Error, Result};
pub use utils::buffer::SampleWindow;

pub mod color;
pub mod config;
pub mod detector;
pub mod driver;
pub mod error;
pub mod float;
pub mod music;
pub mod source;
pub mod utils;
