use crate::detector::internals::PitchEstimate;
use crate::error::Result;
use crate::float::Float;
use crate::utils::buffer::SampleWindow;

pub mod autocorrelation;
pub mod internals;

pub trait PitchDetector<T>
where
    T: Float,
{
    /// Estimate the fundamental frequency of `window`.
    ///
    /// Quiet or aperiodic windows give `Ok(PitchEstimate::NotDetected)`; an
    /// `Err` means the window itself was unusable.
    fn get_pitch(&mut self, window: &SampleWindow<T>) -> Result<PitchEstimate<T>>;
}
