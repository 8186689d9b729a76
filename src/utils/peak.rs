use crate::float::Float;

/// Outcome of feeding one lag to a [`LagScan`], or of finishing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanStep<T> {
    /// Keep scanning.
    Continue,
    /// The similarity peak was just passed. Later lags only repeat the period.
    PeakPassed { best_offset: usize },
    /// Every lag was examined without passing a peak. Carries the best
    /// `(offset, correlation)` seen, if any lag ever qualified.
    Exhausted { best: Option<(usize, T)> },
}

/// Tracks the rising edge of the lag/similarity curve and reports when its
/// first good peak has been passed.
///
/// A lag qualifies when its score is above `threshold` and higher than the
/// previous lag's score. Once a lag has qualified, the first lag that does not
/// ends the scan.
#[derive(Debug, Clone)]
pub struct LagScan<T> {
    threshold: T,
    last_correlation: T,
    best: Option<(usize, T)>,
}

impl<T: Float> LagScan<T> {
    pub fn new(threshold: T) -> Self {
        LagScan {
            threshold,
            // Lag 0 always scores exactly 1, so it can never be rising.
            last_correlation: T::one(),
            best: None,
        }
    }

    pub fn step(&mut self, offset: usize, correlation: T) -> ScanStep<T> {
        if correlation > self.threshold && correlation > self.last_correlation {
            let improves = match self.best {
                Some((_, best_correlation)) => correlation > best_correlation,
                None => true,
            };
            if improves {
                self.best = Some((offset, correlation));
            }
        } else if let Some((best_offset, _)) = self.best {
            return ScanStep::PeakPassed { best_offset };
        }
        self.last_correlation = correlation;
        ScanStep::Continue
    }

    pub fn finish(self) -> ScanStep<T> {
        ScanStep::Exhausted { best: self.best }
    }

    pub fn best(&self) -> Option<(usize, T)> {
        self.best
    }
}

/// Sub-sample estimate of the period around `best_offset`:
///
/// > offset + factor * (c[offset+1] - c[offset-1]) / c[offset]
///
/// Returns `None` when a neighbour is missing.
pub fn refine_offset<T: Float>(correlations: &[T], best_offset: usize, factor: T) -> Option<T> {
    let left = *correlations.get(best_offset.checked_sub(1)?)?;
    let center = *correlations.get(best_offset)?;
    let right = *correlations.get(best_offset + 1)?;

    let shift = (right - left) / center;
    Some(T::from_usize(best_offset)? + factor * shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scores: &[f64]) -> ScanStep<f64> {
        let mut scan = LagScan::new(0.9);
        for (offset, &c) in scores.iter().enumerate() {
            match scan.step(offset, c) {
                ScanStep::Continue => {}
                step => return step,
            }
        }
        scan.finish()
    }

    #[test]
    fn stops_after_peak() {
        let step = run(&[1.0, 0.8, 0.85, 0.95, 0.97, 0.93, 0.99]);
        assert_eq!(step, ScanStep::PeakPassed { best_offset: 4 });
    }

    #[test]
    fn lag_zero_never_qualifies() {
        let mut scan = LagScan::new(0.9);
        assert_eq!(scan.step(0, 1.0), ScanStep::Continue);
        assert_eq!(scan.best(), None);
        assert_eq!(scan.step(1, 0.99), ScanStep::Continue);
        assert_eq!(scan.best(), None);
    }

    #[test]
    fn never_good_enough() {
        let step = run(&[1.0, 0.5, 0.2, 0.4, 0.6, 0.89, 0.7]);
        assert_eq!(step, ScanStep::Exhausted { best: None });
    }

    #[test]
    fn still_rising_at_last_lag() {
        let step = run(&[1.0, 0.5, 0.8, 0.91, 0.95]);
        assert_eq!(
            step,
            ScanStep::Exhausted {
                best: Some((4, 0.95))
            }
        );
    }

    #[test]
    fn refine_uses_neighbours() {
        let scores = [1.0, 0.8, 0.85, 0.95, 0.97, 0.93];
        let refined = refine_offset(&scores, 4, 8.0).unwrap();
        let expected: f64 = 4.0 + 8.0 * (0.93 - 0.95) / 0.97;
        assert!((refined - expected).abs() < 1e-12);
    }

    #[test]
    fn refine_needs_both_neighbours() {
        let scores = [1.0, 0.8, 0.95];
        assert_eq!(refine_offset(&scores, 0, 8.0), None);
        assert_eq!(refine_offset(&scores, 2, 8.0), None);
        assert!(refine_offset(&scores, 1, 8.0).is_some());
    }
}
