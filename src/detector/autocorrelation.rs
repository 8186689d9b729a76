//! Time-domain pitch detection from summed absolute differences.
//!
//! For a window of _N_ samples and _M = N/2_, every lag _t < M_ is scored by
//! $$ c(t) = 1 - \frac{1}{M}\sum_{i=0}^{M-1} |s_i - s_{i+t}|. $$
//! The score falls away from 1 as the lag grows, then climbs back as the lag
//! approaches one period. The scan stops at the first lag after the climb
//! has peaked above the correlation threshold, and the peak lag is nudged by
//! the slope between its neighbours for sub-sample precision.
//!
//! Windows whose RMS amplitude is under the gate are not scanned at all.
//!
//! ```
//! use pitchdetect::detector::autocorrelation::AutocorrelationDetector;
//! use pitchdetect::{PitchEstimate, SampleWindow};
//!
//! const SAMPLE_RATE: u32 = 44100;
//! const SIZE: usize = 1024;
//!
//! let signal: Vec<f64> = (0..SIZE)
//!     .map(|i| (2.0 * std::f64::consts::PI * 330.0 * i as f64 / SAMPLE_RATE as f64).sin())
//!     .collect();
//! let window = SampleWindow::new(signal, SAMPLE_RATE).unwrap();
//!
//! let mut detector = AutocorrelationDetector::new(SIZE);
//! match detector.detect(&window).unwrap() {
//!     PitchEstimate::Detected(frequency) => assert!((frequency - 330.0).abs() < 3.3),
//!     PitchEstimate::NotDetected => panic!("expected a pitch"),
//! }
//! ```

use log::trace;

use crate::config::DetectorConfig;
use crate::detector::internals::difference_correlation;
use crate::detector::internals::DetectorInternals;
use crate::detector::internals::PitchEstimate;
use crate::detector::PitchDetector;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::buffer::SampleWindow;
use crate::utils::peak::{refine_offset, LagScan, ScanStep};

pub struct AutocorrelationDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    config: DetectorConfig,
}

impl<T> AutocorrelationDetector<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        Self::with_config(size, DetectorConfig::default())
    }

    pub fn with_config(size: usize, config: DetectorConfig) -> Self {
        AutocorrelationDetector {
            internals: DetectorInternals::new(size),
            config,
        }
    }

    /// Window length this detector accepts.
    pub fn size(&self) -> usize {
        self.internals.size
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Similarity scores of the lags examined by the last call to
    /// [`detect`](Self::detect). Entries past the stopping lag are stale.
    pub fn correlations(&self) -> &[T] {
        &self.internals.correlations
    }

    pub fn detect(&mut self, window: &SampleWindow<T>) -> Result<PitchEstimate<T>> {
        if window.len() != self.internals.size {
            return Err(Error::SizeMismatch {
                expected: self.internals.size,
                got: window.len(),
            });
        }

        let rms = window.rms();
        if rms < T::from_f64(self.config.rms_threshold).unwrap() {
            trace!("rms {} under gate, not scanning", rms);
            return Ok(PitchEstimate::NotDetected);
        }

        let sample_rate = T::from_u32(window.sample_rate()).unwrap();

        let estimate = match self.scan(window.samples()) {
            ScanStep::PeakPassed { best_offset } => {
                let factor = T::from_f64(self.config.interpolation_factor).unwrap();
                match refine_offset(&self.internals.correlations, best_offset, factor) {
                    Some(period) => {
                        trace!("peak at lag {}, refined to {}", best_offset, period);
                        PitchEstimate::from_frequency(sample_rate / period)
                    }
                    None => PitchEstimate::NotDetected,
                }
            }
            ScanStep::Exhausted {
                best: Some((best_offset, best_correlation)),
            } if best_correlation > T::from_f64(self.config.min_correlation).unwrap() => {
                trace!(
                    "scan exhausted, best lag {} (correlation {})",
                    best_offset,
                    best_correlation
                );
                PitchEstimate::from_frequency(sample_rate / T::from_usize(best_offset).unwrap())
            }
            ScanStep::Exhausted { .. } | ScanStep::Continue => {
                trace!("no correlation peak found");
                PitchEstimate::NotDetected
            }
        };
        Ok(estimate)
    }

    /// Score lags in increasing order until the peak is passed or the lags run out.
    fn scan(&mut self, signal: &[T]) -> ScanStep<T> {
        let max_lag = self.internals.max_lag();
        let correlations = &mut self.internals.correlations;
        let mut scan = LagScan::new(T::from_f64(self.config.good_enough_correlation).unwrap());

        for offset in 0..max_lag {
            let correlation = difference_correlation(signal, max_lag, offset);
            correlations[offset] = correlation;
            if let step @ ScanStep::PeakPassed { .. } = scan.step(offset, correlation) {
                return step;
            }
        }
        scan.finish()
    }
}

impl<T> PitchDetector<T> for AutocorrelationDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, window: &SampleWindow<T>) -> Result<PitchEstimate<T>> {
        self.detect(window)
    }
}
