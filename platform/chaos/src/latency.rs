use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::{ChaosError, ChaosResult};

/// Half-open range `[min, max)` the simulated network delay is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LatencyRange {
    min: Duration,
    max: Duration,
}

impl LatencyRange {
    pub const DEFAULT_MIN: Duration = Duration::from_millis(100);
    pub const DEFAULT_MAX: Duration = Duration::from_millis(2_000);

    pub fn new(min: Duration, max: Duration) -> ChaosResult<Self> {
        if min > max {
            return Err(ChaosError::InvalidLatencyRange {
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
            });
        }
        Ok(Self { min, max })
    }

    pub const fn zero() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub const fn min(&self) -> Duration {
        self.min
    }

    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Uniform draw in `[min, max)`; a degenerate range always yields `min`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let span = self.max.saturating_sub(self.min).as_nanos() as u64;
        if span == 0 {
            return self.min;
        }
        self.min + Duration::from_nanos(rng.gen_range(0..span))
    }
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn default_samples_stay_in_range() {
        let range = LatencyRange::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let delay = range.sample(&mut rng);
            assert!(delay >= Duration::from_millis(100), "{delay:?}");
            assert!(delay < Duration::from_secs(2), "{delay:?}");
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let fixed = Duration::from_millis(40);
        let range = LatencyRange::new(fixed, fixed).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(range.sample(&mut rng), fixed);
        assert_eq!(LatencyRange::zero().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = LatencyRange::new(Duration::from_secs(2), Duration::from_secs(1)).unwrap_err();
        assert_eq!(
            err,
            ChaosError::InvalidLatencyRange {
                min_ms: 2_000,
                max_ms: 1_000
            }
        );
    }
}
