use serde::{Deserialize, Serialize};

use crate::model::choice::{ChoiceOption, MultipleChoice};
use crate::model::ids::{OptionId, ScenarioId, ScenarioStepId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// One decision point of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub id: ScenarioStepId,
    pub situation: String,
    pub options: Vec<ChoiceOption>,
    pub correct_option_id: OptionId,
    pub explanation: String,
}

impl MultipleChoice for ScenarioStep {
    fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    fn correct_option_id(&self) -> &OptionId {
        &self.correct_option_id
    }

    fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// A linear sequence of decisions simulating an emergency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    id: ScenarioId,
    title: String,
    description: String,
    icon: String,
    difficulty: Difficulty,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    #[must_use]
    pub fn new(
        id: ScenarioId,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        difficulty: Difficulty,
        steps: Vec<ScenarioStep>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            difficulty,
            steps,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ScenarioId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_deserializes_lowercase() {
        let d: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
        assert_eq!(d.label(), "Medium");
    }

    #[test]
    fn step_scores_by_exact_option_id() {
        let step = ScenarioStep {
            id: ScenarioStepId::new("sc_1"),
            situation: "You hear cracking.".into(),
            options: vec![ChoiceOption::new("a", "Run"), ChoiceOption::new("b", "Lie flat")],
            correct_option_id: OptionId::new("b"),
            explanation: "Spread your weight.".into(),
        };

        assert!(step.is_correct(&OptionId::new("b")));
        assert!(!step.is_correct(&OptionId::new("a")));
        assert!(!step.is_correct(&OptionId::new("B")));
        assert!(step.has_option(&OptionId::new("a")));
        assert!(!step.has_option(&OptionId::new("z")));
        assert_eq!(step.correct_option().unwrap().text, "Lie flat");
    }
}
