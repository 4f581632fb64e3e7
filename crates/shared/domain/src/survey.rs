//! Survey vocabulary: respondent gender and the audience-grouped catalogs of
//! proposed application features.

use crate::constants::{GUARDIAN_FEATURES, NATIVE_FEATURES, THERAPIST_FEATURES};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Respondent gender, as offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// One of the fixed feature-choice catalogs, grouped by audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FeatureCatalog {
    Therapist,
    Guardian,
    Native,
}

impl FeatureCatalog {
    /// The full set of selectable values for this catalog.
    #[must_use]
    pub const fn values(self) -> &'static [&'static str] {
        match self {
            Self::Therapist => THERAPIST_FEATURES,
            Self::Guardian => GUARDIAN_FEATURES,
            Self::Native => NATIVE_FEATURES,
        }
    }

    /// Whether `choice` is a member of this catalog.
    #[must_use]
    pub fn contains(self, choice: &str) -> bool {
        self.values().contains(&choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_round_trips_through_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
        assert_eq!(Gender::from_str("other").unwrap(), Gender::Other);
        assert!(Gender::from_str("unknown").is_err());
    }

    #[test]
    fn catalogs_know_their_members() {
        assert!(FeatureCatalog::Therapist.contains("Symptom Monitoring"));
        assert!(FeatureCatalog::Guardian.contains("Progress Charts"));
        assert!(!FeatureCatalog::Native.contains("Symptom Monitoring"));
    }

    #[test]
    fn catalogs_are_disjoint() {
        for value in FeatureCatalog::Therapist.values() {
            assert!(!FeatureCatalog::Guardian.contains(value));
            assert!(!FeatureCatalog::Native.contains(value));
        }
    }
}
