use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for parsing an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

/// Declares a string-backed content identifier.
///
/// Content ids come from the bundled catalog (`"lesson_1"`, `"sc1_2"`, ...), so they
/// are kept as opaque strings. Parsing trims whitespace and rejects empty input.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id! {
    /// Identifier of a lesson.
    LessonId
}

string_id! {
    /// Identifier of a lesson section.
    SectionId
}

string_id! {
    /// Identifier of a single lesson step.
    StepId
}

string_id! {
    /// Identifier of a scenario.
    ScenarioId
}

string_id! {
    /// Identifier of a step inside a scenario.
    ScenarioStepId
}

string_id! {
    /// Identifier of an answer option. Unique only within its step or question.
    OptionId
}

string_id! {
    /// Identifier of a knowledge-test question.
    QuestionId
}

string_id! {
    /// Identifier of an equipment checklist item.
    EquipmentId
}

/// Unique identifier for a completed knowledge test.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestResultId(Uuid);

impl TestResultId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for TestResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestResultId({})", self.0)
    }
}

impl fmt::Display for TestResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TestResultId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(TestResultId)
            .map_err(|_| ParseIdError {
                kind: "TestResultId",
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display() {
        let id = LessonId::new("lesson_1");
        assert_eq!(id.to_string(), "lesson_1");
        assert_eq!(format!("{id:?}"), "LessonId(lesson_1)");
    }

    #[test]
    fn scenario_id_from_str_trims() {
        let id: ScenarioId = "  scenario_3 ".parse().unwrap();
        assert_eq!(id, ScenarioId::new("scenario_3"));
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = "   ".parse::<QuestionId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse QuestionId from string");
    }

    #[test]
    fn string_ids_serialize_transparently() {
        let json = serde_json::to_string(&EquipmentId::new("eq_whistle")).unwrap();
        assert_eq!(json, "\"eq_whistle\"");
        let back: EquipmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "eq_whistle");
    }

    #[test]
    fn test_result_id_from_str() {
        let id = TestResultId::generate();
        let parsed: TestResultId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<TestResultId>().is_err());
    }
}
