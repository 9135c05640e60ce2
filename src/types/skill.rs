//! Skill level enumeration.

use serde::{Deserialize, Serialize};

/// User skill level controlling prompt verbosity and token budgets.
///
/// Closed set. Unknown input strings normalize to [`SkillLevel::Beginner`] at
/// deserialization rather than being rejected, so provider logic only ever
/// sees one of the three variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Intermediate,
    Advanced,
    #[default]
    #[serde(other)]
    Beginner,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_deserialize() {
        for (input, expected) in [
            ("\"beginner\"", SkillLevel::Beginner),
            ("\"intermediate\"", SkillLevel::Intermediate),
            ("\"advanced\"", SkillLevel::Advanced),
        ] {
            let level: SkillLevel = serde_json::from_str(input).unwrap();
            assert_eq!(level, expected);
        }
    }

    #[test]
    fn unknown_levels_normalize_to_beginner() {
        let level: SkillLevel = serde_json::from_str("\"expert\"").unwrap();
        assert_eq!(level, SkillLevel::Beginner);

        let level: SkillLevel = serde_json::from_str("\"\"").unwrap();
        assert_eq!(level, SkillLevel::Beginner);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SkillLevel::Advanced).unwrap(),
            "\"advanced\""
        );
        assert_eq!(SkillLevel::Intermediate.to_string(), "intermediate");
    }
}
