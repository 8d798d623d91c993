//! Demographic label estimation.

use footfall_models::{AgeGroup, Gender};
use rand::prelude::IndexedRandom;

use crate::detector::RawDetection;

/// Assigns demographic labels to a detected person.
///
/// The default implementation is a stand-in policy; a real model can be
/// substituted here without touching the aggregation core.
pub trait DemographicEstimator: Send {
    /// Labels for one detection.
    fn estimate(&mut self, detection: &RawDetection) -> (AgeGroup, Gender);

    /// Estimator name for logging.
    fn name(&self) -> &'static str;
}

/// Uniform random draw over the age and gender buckets, independent of any
/// image content.
#[derive(Debug, Default)]
pub struct RandomEstimator;

impl RandomEstimator {
    pub fn new() -> Self {
        Self
    }
}

impl DemographicEstimator for RandomEstimator {
    fn estimate(&mut self, _detection: &RawDetection) -> (AgeGroup, Gender) {
        let mut rng = rand::rng();
        let age_group = *AgeGroup::ALL.choose(&mut rng).unwrap();
        let gender = *Gender::ALL.choose(&mut rng).unwrap();
        (age_group, gender)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Cycles through a fixed label sequence, for deterministic tests.
    pub struct FixedEstimator {
        labels: Vec<(AgeGroup, Gender)>,
        next: usize,
    }

    impl FixedEstimator {
        pub fn new(labels: Vec<(AgeGroup, Gender)>) -> Self {
            Self { labels, next: 0 }
        }
    }

    impl DemographicEstimator for FixedEstimator {
        fn estimate(&mut self, _detection: &RawDetection) -> (AgeGroup, Gender) {
            let label = self.labels[self.next % self.labels.len()];
            self.next += 1;
            label
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection() -> RawDetection {
        RawDetection {
            x1: 0,
            y1: 0,
            x2: 10,
            y2: 10,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_random_estimator_yields_valid_buckets() {
        let mut estimator = RandomEstimator::new();
        let det = detection();
        for _ in 0..100 {
            let (age_group, gender) = estimator.estimate(&det);
            assert!(AgeGroup::ALL.contains(&age_group));
            assert!(Gender::ALL.contains(&gender));
        }
    }

    #[test]
    fn test_fixed_estimator_cycles() {
        let mut estimator = testing::FixedEstimator::new(vec![
            (AgeGroup::Child, Gender::Male),
            (AgeGroup::Senior, Gender::Female),
        ]);
        let det = detection();
        assert_eq!(estimator.estimate(&det), (AgeGroup::Child, Gender::Male));
        assert_eq!(estimator.estimate(&det), (AgeGroup::Senior, Gender::Female));
        assert_eq!(estimator.estimate(&det), (AgeGroup::Child, Gender::Male));
    }
}
