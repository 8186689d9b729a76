use crate::float::Float;
use crate::utils::buffer::new_real_buffer;

/// Result of a single detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchEstimate<T> {
    /// Fundamental frequency in Hz. Always finite and strictly positive.
    Detected(T),
    NotDetected,
}

impl<T: Float> PitchEstimate<T> {
    /// Wrap `frequency`, demoting non-finite or non-positive values to `NotDetected`.
    pub fn from_frequency(frequency: T) -> Self {
        if frequency.is_finite() && frequency > T::zero() {
            PitchEstimate::Detected(frequency)
        } else {
            PitchEstimate::NotDetected
        }
    }

    pub fn frequency(&self) -> Option<T> {
        match *self {
            PitchEstimate::Detected(frequency) => Some(frequency),
            PitchEstimate::NotDetected => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, PitchEstimate::Detected(_))
    }
}

/// Buffers needed for pitch computation. Allocating once per detector
/// rather than once per window keeps the audio callback allocation-free.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    pub correlations: Vec<T>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Self {
        DetectorInternals {
            size,
            correlations: new_real_buffer(size / 2),
        }
    }

    /// Number of lags examined (and of terms in each lag's sum).
    pub fn max_lag(&self) -> usize {
        self.size / 2
    }
}

/// Similarity of `signal` with itself shifted by `offset` samples, computed
/// from summed absolute differences over the first `window_size` samples:
///
/// > c(t) = 1 - (1/w) * sum_{i=0}^{w-1} |x_i - x_{i+t}|
///
/// A perfect match scores 1. Requires `offset + window_size <= signal.len()`.
pub fn difference_correlation<T>(signal: &[T], window_size: usize, offset: usize) -> T
where
    T: Float,
{
    assert!(
        offset + window_size <= signal.len(),
        "lag {} with window {} runs past a signal of {} samples",
        offset,
        window_size,
        signal.len()
    );

    let raw: T = signal[..window_size]
        .iter()
        .zip(&signal[offset..offset + window_size])
        .map(|(&a, &b)| (a - b).abs())
        .sum();
    T::one() - raw / T::from_usize(window_size).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_correlation_test() {
        let signal: Vec<f64> = vec![0., 1., 0., -1., 0., 1.];
        let window_size = 3;

        assert_eq!(difference_correlation(&signal, window_size, 0), 1.0);
        // |0-1| + |1-0| + |0+1| = 3
        assert_eq!(difference_correlation(&signal, window_size, 1), 0.0);
        // |0-0| + |1+1| + |0-0| = 2
        assert!((difference_correlation(&signal, window_size, 2) - (1.0 - 2.0 / 3.0)).abs() < 1e-12);
        // |0-0| + |1-1| + ... shifted by a full period
        assert!((difference_correlation(&signal, 2, 4) - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn difference_correlation_out_of_range() {
        let signal: Vec<f64> = vec![0., 1., 0., -1.];
        difference_correlation(&signal, 3, 2);
    }

    #[test]
    fn estimate_rejects_invalid_frequency() {
        assert_eq!(PitchEstimate::from_frequency(0.0f64), PitchEstimate::NotDetected);
        assert_eq!(PitchEstimate::from_frequency(-3.0f64), PitchEstimate::NotDetected);
        assert_eq!(PitchEstimate::from_frequency(f64::INFINITY), PitchEstimate::NotDetected);
        assert_eq!(PitchEstimate::from_frequency(f64::NAN), PitchEstimate::NotDetected);
        assert_eq!(PitchEstimate::from_frequency(440.0f64).frequency(), Some(440.0));
    }

    #[test]
    fn internals_size_correlation_buffer() {
        let internals = DetectorInternals::<f32>::new(1025);
        assert_eq!(internals.max_lag(), 512);
        assert_eq!(internals.correlations.len(), 512);
    }
}
