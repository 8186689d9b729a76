use crate::error::{Error, Result};
use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T: Float>(arr: &[T]) -> T {
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Root-mean-square amplitude of `arr`. Zero for an empty slice.
pub fn root_mean_square<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    (square_sum(arr) / T::from_usize(arr.len()).unwrap()).sqrt()
}

/// A block of normalized samples captured at `sample_rate`.
///
/// Windows are checked on construction: they hold at least two samples and
/// the sample rate is positive.
///
/// ```rust
/// use pitchdetect::SampleWindow;
///
/// let window = SampleWindow::new(vec![0.0f32, 0.5, -0.5, 0.0], 48000).unwrap();
/// assert_eq!(window.len(), 4);
/// assert!(SampleWindow::new(vec![0.0f32], 48000).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow<T> {
    samples: Vec<T>,
    sample_rate: u32,
}

impl<T: Float> SampleWindow<T> {
    pub const MIN_LEN: usize = 2;

    pub fn new(samples: Vec<T>, sample_rate: u32) -> Result<Self> {
        if samples.len() < Self::MIN_LEN {
            return Err(Error::invalid(
                "samples",
                samples.len(),
                "a window needs at least 2 samples",
            ));
        }
        if sample_rate == 0 {
            return Err(Error::invalid(
                "sample_rate",
                sample_rate,
                "sample rate must be positive",
            ));
        }
        Ok(SampleWindow {
            samples,
            sample_rate,
        })
    }

    /// Copy `samples` into a new window.
    pub fn from_slice(samples: &[T], sample_rate: u32) -> Result<Self> {
        Self::new(samples.to_vec(), sample_rate)
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: construction rejects short windows.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn rms(&self) -> T {
        root_mean_square(&self.samples)
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_constant_signal() {
        let signal = vec![0.5f64; 16];
        assert!((root_mean_square(&signal) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rms_of_empty_slice_is_zero() {
        let signal: Vec<f32> = vec![];
        assert_eq!(root_mean_square(&signal), 0.0);
    }

    #[test]
    fn square_sum_test() {
        assert_eq!(square_sum(&[1.0f64, -2.0, 3.0]), 14.0);
    }

    #[test]
    fn window_rejects_zero_sample_rate() {
        let err = SampleWindow::new(vec![0.0f64; 8], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput {
                name: "sample_rate",
                ..
            }
        ));
    }

    #[test]
    fn window_rejects_single_sample() {
        assert!(SampleWindow::new(vec![0.1f64], 44100).is_err());
        assert!(SampleWindow::<f64>::new(vec![], 44100).is_err());
        assert!(SampleWindow::new(vec![0.1f64, 0.2], 44100).is_ok());
    }
}
