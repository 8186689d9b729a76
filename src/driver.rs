//! Glue between an audio source, the detector and whatever presents results.
//!
//! A [`DetectionLoop`] runs one cycle per [`tick`](DetectionLoop::tick): pull a
//! window, estimate its pitch, map the pitch to a note and a color, hand the
//! [`Analysis`] to the sink. Scheduling is left to the caller; [`run`](DetectionLoop::run)
//! simply ticks until the source dries up or the sink asks to stop.

use std::ops::ControlFlow;

use log::debug;
use serde::Serialize;

use crate::color::{frequency_to_color, ColorRgb};
use crate::detector::internals::PitchEstimate;
use crate::detector::PitchDetector;
use crate::error::Result;
use crate::float::Float;
use crate::music::NoteInfo;
use crate::utils::buffer::SampleWindow;

/// Supplies successive windows of samples.
pub trait AudioSource {
    type Sample: Float;

    fn sample_rate(&self) -> u32;

    /// Next window, or `None` once the source is exhausted.
    fn next_window(&mut self) -> Result<Option<SampleWindow<Self::Sample>>>;
}

/// Receives one [`Analysis`] per detection cycle.
pub trait PresentationSink {
    /// Return `ControlFlow::Break(())` to stop the loop.
    fn on_result(&mut self, analysis: &Analysis) -> ControlFlow<()>;
}

impl<F> PresentationSink for F
where
    F: FnMut(&Analysis) -> ControlFlow<()>,
{
    fn on_result(&mut self, analysis: &Analysis) -> ControlFlow<()> {
        self(analysis)
    }
}

/// A detected pitch together with everything derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub frequency: f64,
    pub note: NoteInfo,
    pub color: ColorRgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis {
    Detected(Reading),
    NotDetected,
}

impl Analysis {
    pub fn reading(&self) -> Option<&Reading> {
        match self {
            Analysis::Detected(reading) => Some(reading),
            Analysis::NotDetected => None,
        }
    }
}

/// Map a pitch estimate to note and color.
pub fn analyze<T: Float>(estimate: PitchEstimate<T>) -> Result<Analysis> {
    let frequency = match estimate.frequency().and_then(|f| f.to_f64()) {
        Some(frequency) => frequency,
        None => return Ok(Analysis::NotDetected),
    };
    let note = NoteInfo::from_frequency(frequency)?;
    let color = frequency_to_color(frequency, note.semitone)?;
    Ok(Analysis::Detected(Reading {
        frequency,
        note,
        color,
    }))
}

pub struct DetectionLoop<S, D, P> {
    source: S,
    detector: D,
    sink: P,
    cycles: usize,
}

impl<S, D, P> DetectionLoop<S, D, P> {
    pub fn new(source: S, detector: D, sink: P) -> Self {
        DetectionLoop {
            source,
            detector,
            sink,
            cycles: 0,
        }
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn into_parts(self) -> (S, D, P) {
        (self.source, self.detector, self.sink)
    }
}

impl<S, D, P> DetectionLoop<S, D, P>
where
    S: AudioSource,
    D: PitchDetector<S::Sample>,
    P: PresentationSink,
{
    /// Run a single cycle. Returns `None` when the source is exhausted,
    /// otherwise the analysis and the sink's verdict.
    pub fn tick(&mut self) -> Result<Option<(Analysis, ControlFlow<()>)>> {
        let window = match self.source.next_window()? {
            Some(window) => window,
            None => return Ok(None),
        };
        let estimate = self.detector.get_pitch(&window)?;
        let analysis = analyze(estimate)?;
        let flow = self.sink.on_result(&analysis);
        self.cycles += 1;
        Ok(Some((analysis, flow)))
    }

    /// Tick until the source is exhausted or the sink breaks. Returns the
    /// number of cycles run by this call.
    pub fn run(&mut self) -> Result<usize> {
        let start = self.cycles;
        while let Some((_, flow)) = self.tick()? {
            if flow.is_break() {
                debug!("sink stopped the loop after {} cycles", self.cycles);
                break;
            }
        }
        Ok(self.cycles - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::autocorrelation::AutocorrelationDetector;
    use crate::source::SliceSource;

    fn sine(freq: f64, size: usize, sample_rate: u32) -> Vec<f64> {
        let dx = 2.0 * std::f64::consts::PI * freq / sample_rate as f64;
        (0..size).map(|i| (i as f64 * dx).sin()).collect()
    }

    #[test]
    fn analyze_not_detected_has_no_reading() {
        let analysis = analyze(PitchEstimate::<f64>::NotDetected).unwrap();
        assert_eq!(analysis, Analysis::NotDetected);
        assert!(analysis.reading().is_none());
    }

    #[test]
    fn analyze_a4() {
        let analysis = analyze(PitchEstimate::Detected(440.0f64)).unwrap();
        let reading = analysis.reading().unwrap();
        assert_eq!(reading.note.semitone, 69);
        assert_eq!(reading.note.name, "A");
        assert_eq!(reading.note.cents, 0);
        assert_eq!(reading.color, ColorRgb::new(196, 0, 0));
    }

    #[test]
    fn runs_until_source_exhausted() {
        let mut signal = sine(220.0, 4096, 44100);
        signal.extend(std::iter::repeat(0.0).take(1024));
        let source = SliceSource::new(&signal, 44100, 1024, 1024).unwrap();

        let mut seen = Vec::new();
        let sink = |analysis: &Analysis| {
            seen.push(*analysis);
            ControlFlow::Continue(())
        };
        let mut detection = DetectionLoop::new(source, AutocorrelationDetector::<f64>::new(1024), sink);
        assert_eq!(detection.run().unwrap(), 5);
        drop(detection);

        assert_eq!(seen.len(), 5);
        for analysis in &seen[..4] {
            let reading = analysis.reading().unwrap();
            assert_eq!(reading.note.semitone, 57);
            assert_eq!(reading.note.name, "A");
        }
        assert_eq!(seen[4], Analysis::NotDetected);
    }

    #[test]
    fn sink_can_stop_the_loop() {
        let signal = sine(330.0, 8192, 44100);
        let source = SliceSource::new(&signal, 44100, 1024, 512).unwrap();
        let sink = |_: &Analysis| ControlFlow::Break(());
        let mut detection = DetectionLoop::new(source, AutocorrelationDetector::<f64>::new(1024), sink);
        assert_eq!(detection.run().unwrap(), 1);
        assert_eq!(detection.cycles(), 1);
    }

    #[test]
    fn detector_size_mismatch_surfaces() {
        let signal = sine(330.0, 4096, 44100);
        let source = SliceSource::new(&signal, 44100, 512, 512).unwrap();
        let sink = |_: &Analysis| ControlFlow::Continue(());
        let mut detection = DetectionLoop::new(source, AutocorrelationDetector::<f64>::new(1024), sink);
        assert!(detection.run().is_err());
    }
}
