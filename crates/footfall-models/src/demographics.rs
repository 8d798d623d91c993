//! Aggregated demographic counts and percentages for one frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::person::{AgeGroup, Gender, PersonRecord};

/// Count and percentage for one age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AgeBucket {
    pub group: String,
    pub count: u64,
    pub percent: u64,
}

/// Count and percentage for one gender bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenderBucket {
    #[serde(rename = "type")]
    pub label: String,
    pub count: u64,
    pub percent: u64,
}

/// Per-frame demographic rollup, derived deterministically from the frame's
/// person records.
///
/// Percentages are `round(count * 100 / max(1, total))`. The `max(1, ..)`
/// guard means an empty frame yields 0% in every bucket rather than a
/// division error; keep that policy when changing this code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DemographicSummary {
    pub age: Vec<AgeBucket>,
    pub gender: Vec<GenderBucket>,
}

impl DemographicSummary {
    /// Build the rollup from a frame's person records.
    pub fn from_people(people: &[PersonRecord]) -> Self {
        let total = people.len() as u64;

        let age = AgeGroup::ALL
            .iter()
            .map(|group| {
                let count = people.iter().filter(|p| p.age_group == *group).count() as u64;
                AgeBucket {
                    group: group.label().to_string(),
                    count,
                    percent: percent_of(count, total),
                }
            })
            .collect();

        let gender = Gender::ALL
            .iter()
            .map(|g| {
                let count = people.iter().filter(|p| p.gender == *g).count() as u64;
                GenderBucket {
                    label: g.label().to_string(),
                    count,
                    percent: percent_of(count, total),
                }
            })
            .collect();

        Self { age, gender }
    }

    /// Rollup for a frame with no detections: all buckets zero.
    pub fn empty() -> Self {
        Self::from_people(&[])
    }
}

/// Rounded bucket percentage with the divide-by-zero guard.
fn percent_of(count: u64, total: u64) -> u64 {
    ((count * 100) as f64 / total.max(1) as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(age_group: AgeGroup, gender: Gender) -> PersonRecord {
        PersonRecord {
            id: "0_0".to_string(),
            age_group,
            gender,
            position: (10, 10),
        }
    }

    #[test]
    fn test_empty_summary_is_all_zero() {
        let summary = DemographicSummary::empty();
        assert_eq!(summary.age.len(), 4);
        assert_eq!(summary.gender.len(), 2);
        for bucket in &summary.age {
            assert_eq!(bucket.count, 0);
            assert_eq!(bucket.percent, 0);
        }
        for bucket in &summary.gender {
            assert_eq!(bucket.count, 0);
            assert_eq!(bucket.percent, 0);
        }
    }

    #[test]
    fn test_percent_policy() {
        let people = vec![
            person(AgeGroup::YoungAdult, Gender::Male),
            person(AgeGroup::YoungAdult, Gender::Female),
            person(AgeGroup::Senior, Gender::Male),
        ];
        let summary = DemographicSummary::from_people(&people);

        let young = summary.age.iter().find(|b| b.group == "18-34").unwrap();
        assert_eq!(young.count, 2);
        assert_eq!(young.percent, 67); // round(2 * 100 / 3)

        let senior = summary.age.iter().find(|b| b.group == "55+").unwrap();
        assert_eq!(senior.count, 1);
        assert_eq!(senior.percent, 33);

        let male = summary.gender.iter().find(|b| b.label == "Male").unwrap();
        assert_eq!(male.count, 2);
        assert_eq!(male.percent, 67);
    }

    #[test]
    fn test_percent_sums_within_rounding_error() {
        let people = vec![
            person(AgeGroup::Child, Gender::Male),
            person(AgeGroup::YoungAdult, Gender::Female),
            person(AgeGroup::MiddleAged, Gender::Male),
            person(AgeGroup::Senior, Gender::Female),
            person(AgeGroup::Senior, Gender::Male),
            person(AgeGroup::YoungAdult, Gender::Male),
            person(AgeGroup::Child, Gender::Female),
        ];
        let summary = DemographicSummary::from_people(&people);

        // Rounding may shift the sum by at most one per bucket.
        let age_sum: u64 = summary.age.iter().map(|b| b.percent).sum();
        assert!(age_sum.abs_diff(100) <= summary.age.len() as u64);

        let gender_sum: u64 = summary.gender.iter().map(|b| b.percent).sum();
        assert!(gender_sum.abs_diff(100) <= summary.gender.len() as u64);

        // Each bucket individually matches the policy.
        for bucket in &summary.age {
            let expected = ((bucket.count * 100) as f64 / 7.0).round() as u64;
            assert_eq!(bucket.percent, expected);
        }
    }

    #[test]
    fn test_single_person_is_100_percent() {
        let people = vec![person(AgeGroup::MiddleAged, Gender::Female)];
        let summary = DemographicSummary::from_people(&people);

        let middle = summary.age.iter().find(|b| b.group == "35-54").unwrap();
        assert_eq!(middle.percent, 100);
        let female = summary.gender.iter().find(|b| b.label == "Female").unwrap();
        assert_eq!(female.percent, 100);
    }

    #[test]
    fn test_serialized_bucket_shape() {
        let summary = DemographicSummary::from_people(&[person(AgeGroup::Child, Gender::Male)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["age"][0]["group"], "0-17");
        assert_eq!(json["gender"][0]["type"], "Male");
        assert!(json["gender"][0].get("label").is_none());
    }
}
