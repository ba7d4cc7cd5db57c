//! Career objectives a profile review can be aimed at.
//!
//! The four known tags have fixed descriptions that are interpolated into the
//! analysis prompt and the fallback report. Any other tag is carried through
//! verbatim; there is no validation beyond the lookup.

use serde::{Deserialize, Serialize};

/// Objective used when the caller does not pick one.
pub const DEFAULT_OBJECTIVE: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectiveTag {
    FirstJob,
    CareerUpgrade,
    International,
    SsiImprovement,
    Other(String),
}

/// One entry of the catalog served to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectiveInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const OBJECTIVE_CATALOG: &[ObjectiveInfo] = &[
    ObjectiveInfo {
        id: "first_job",
        name: "First Job",
        description: "Optimize your profile to land your first job as a developer",
    },
    ObjectiveInfo {
        id: "career_upgrade",
        name: "Career Upgrade",
        description: "Improve your profile to reach a senior or management position",
    },
    ObjectiveInfo {
        id: "international",
        name: "International Market",
        description: "Adapt your profile for opportunities in the global market",
    },
    ObjectiveInfo {
        id: "ssi_improvement",
        name: "Improve SSI",
        description: "Raise your Social Selling Index and visibility on LinkedIn",
    },
];

impl ObjectiveTag {
    /// Parses a raw tag. Blank input becomes [`DEFAULT_OBJECTIVE`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "first_job" => Self::FirstJob,
            "career_upgrade" => Self::CareerUpgrade,
            "international" => Self::International,
            "ssi_improvement" => Self::SsiImprovement,
            "" => Self::Other(DEFAULT_OBJECTIVE.to_owned()),
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FirstJob => "first_job",
            Self::CareerUpgrade => "career_upgrade",
            Self::International => "international",
            Self::SsiImprovement => "ssi_improvement",
            Self::Other(tag) => tag,
        }
    }

    /// Human-readable description used in prompt construction.
    ///
    /// Unknown tags pass through as-is.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::FirstJob => "First job as a developer",
            Self::CareerUpgrade => "Career upgrade to a senior or management position",
            Self::International => "Opportunities in the international market",
            Self::SsiImprovement => "Improve the Social Selling Index (SSI) and visibility",
            Self::Other(tag) => tag,
        }
    }
}

impl Default for ObjectiveTag {
    fn default() -> Self {
        Self::Other(DEFAULT_OBJECTIVE.to_owned())
    }
}

impl std::fmt::Display for ObjectiveTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ObjectiveTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectiveTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_round_trip_through_as_str() {
        for info in OBJECTIVE_CATALOG {
            let tag = ObjectiveTag::parse(info.id);
            assert!(!matches!(tag, ObjectiveTag::Other(_)), "{} parsed as Other", info.id);
            assert_eq!(tag.as_str(), info.id);
        }
    }

    #[test]
    fn unknown_tag_passes_through_verbatim() {
        let tag = ObjectiveTag::parse("become_cto");
        assert_eq!(tag, ObjectiveTag::Other("become_cto".to_owned()));
        assert_eq!(tag.description(), "become_cto");
    }

    #[test]
    fn blank_tag_defaults_to_general() {
        assert_eq!(ObjectiveTag::parse("  ").as_str(), DEFAULT_OBJECTIVE);
        assert_eq!(ObjectiveTag::default().as_str(), DEFAULT_OBJECTIVE);
    }

    #[test]
    fn known_tag_maps_to_description() {
        assert_eq!(
            ObjectiveTag::parse("first_job").description(),
            "First job as a developer"
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&ObjectiveTag::International).expect("serialize");
        assert_eq!(json, "\"international\"");
        let back: ObjectiveTag = serde_json::from_str("\"ssi_improvement\"").expect("deserialize");
        assert_eq!(back, ObjectiveTag::SsiImprovement);
    }
}
