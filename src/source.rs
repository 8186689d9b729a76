//! [`AudioSource`] implementations over in-memory signals and WAV files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Range;
use std::path::Path;

use log::debug;

use crate::driver::AudioSource;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::buffer::SampleWindow;

/// Walks fixed-size windows across a signal, `hop` samples apart.
/// A trailing partial window is dropped.
#[derive(Debug, Clone)]
struct WindowCursor {
    window_size: usize,
    hop: usize,
    position: usize,
}

impl WindowCursor {
    fn new(window_size: usize, hop: usize) -> Result<Self> {
        if window_size < 2 {
            return Err(Error::invalid(
                "window_size",
                window_size,
                "a window needs at least 2 samples",
            ));
        }
        if hop == 0 {
            return Err(Error::invalid("hop", hop, "hop must be positive"));
        }
        Ok(WindowCursor {
            window_size,
            hop,
            position: 0,
        })
    }

    fn next_range(&mut self, len: usize) -> Option<Range<usize>> {
        let range = self.position..self.position + self.window_size;
        if range.end > len {
            return None;
        }
        self.position += self.hop;
        Some(range)
    }
}

/// Windows over a borrowed signal.
pub struct SliceSource<'a, T> {
    signal: &'a [T],
    sample_rate: u32,
    cursor: WindowCursor,
}

impl<'a, T: Float> SliceSource<'a, T> {
    pub fn new(signal: &'a [T], sample_rate: u32, window_size: usize, hop: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::invalid(
                "sample_rate",
                sample_rate,
                "sample rate must be positive",
            ));
        }
        Ok(SliceSource {
            signal,
            sample_rate,
            cursor: WindowCursor::new(window_size, hop)?,
        })
    }
}

impl<'a, T: Float> AudioSource for SliceSource<'a, T> {
    type Sample = T;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_window(&mut self) -> Result<Option<SampleWindow<T>>> {
        match self.cursor.next_range(self.signal.len()) {
            Some(range) => Ok(Some(SampleWindow::from_slice(
                &self.signal[range],
                self.sample_rate,
            )?)),
            None => Ok(None),
        }
    }
}

/// Windows over a decoded WAV file, mixed down to mono and scaled to [-1, 1].
#[derive(Debug)]
pub struct WavSource<T> {
    samples: Vec<T>,
    sample_rate: u32,
    cursor: WindowCursor,
}

impl<T: Float> WavSource<T> {
    pub fn open<P: AsRef<Path>>(path: P, window_size: usize, hop: usize) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening {}", path.display());
        let file = BufReader::new(File::open(path)?);
        Self::from_reader(file, window_size, hop)
    }

    pub fn from_reader<R: Read>(reader: R, window_size: usize, hop: usize) -> Result<Self> {
        let cursor = WindowCursor::new(window_size, hop)?;
        let mut reader = hound::WavReader::new(reader)?;
        let spec = reader.spec();
        debug!(
            "wav: {} Hz, {} channel(s), {} bits {:?}",
            spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
        );

        let interleaved: Vec<f64> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 2f64.powi(i32::from(spec.bits_per_sample) - 1);
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| f64::from(v) / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let channels = usize::from(spec.channels.max(1));
        let samples = interleaved
            .chunks_exact(channels)
            .map(|frame| T::from_f64(frame.iter().sum::<f64>() / channels as f64).unwrap())
            .collect();

        Ok(WavSource {
            samples,
            sample_rate: spec.sample_rate,
            cursor,
        })
    }

    /// Mono samples of the whole file.
    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Start time in seconds of the window the next call to
    /// [`next_window`](AudioSource::next_window) returns.
    pub fn position_secs(&self) -> f64 {
        self.cursor.position as f64 / self.sample_rate as f64
    }
}

impl<T: Float> AudioSource for WavSource<T> {
    type Sample = T;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_window(&mut self) -> Result<Option<SampleWindow<T>>> {
        match self.cursor.next_range(self.samples.len()) {
            Some(range) => Ok(Some(SampleWindow::from_slice(
                &self.samples[range],
                self.sample_rate,
            )?)),
            None => Ok(None),
        }
    }
}
