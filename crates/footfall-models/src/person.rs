//! Per-person demographic records.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Age bucket for a detected person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AgeGroup {
    #[serde(rename = "0-17")]
    Child,
    #[serde(rename = "18-34")]
    YoungAdult,
    #[serde(rename = "35-54")]
    MiddleAged,
    #[serde(rename = "55+")]
    Senior,
}

impl AgeGroup {
    /// All buckets in display order.
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Child,
        AgeGroup::YoungAdult,
        AgeGroup::MiddleAged,
        AgeGroup::Senior,
    ];

    /// Bucket label as it appears on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Child => "0-17",
            AgeGroup::YoungAdult => "18-34",
            AgeGroup::MiddleAged => "35-54",
            AgeGroup::Senior => "55+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gender bucket for a detected person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// All buckets in display order.
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Bucket label as it appears on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One person within a frame summary: detection identity plus the
/// demographic labels assigned by the estimator.
///
/// Owned by the containing [`crate::FrameSummary`]; immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonRecord {
    /// Track id of the underlying detection.
    pub id: String,
    pub age_group: AgeGroup,
    pub gender: Gender,
    /// Box center `(x, y)` in pixel space.
    pub position: (i64, i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_labels() {
        assert_eq!(AgeGroup::Child.label(), "0-17");
        assert_eq!(AgeGroup::Senior.label(), "55+");
        assert_eq!(AgeGroup::ALL.len(), 4);
    }

    #[test]
    fn test_age_group_serde_roundtrip() {
        for group in AgeGroup::ALL {
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.label()));
            let back: AgeGroup = serde_json::from_str(&json).unwrap();
            assert_eq!(back, group);
        }
    }

    #[test]
    fn test_gender_serde() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"Male\"");
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"Female\"");
    }
}
