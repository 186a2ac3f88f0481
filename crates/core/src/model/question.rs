use serde::{Deserialize, Serialize};

use crate::model::choice::{ChoiceOption, MultipleChoice};
use crate::model::ids::{OptionId, QuestionId};

/// A knowledge-test question from the flat question pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<ChoiceOption>,
    correct_option_id: OptionId,
    explanation: String,
    category: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<ChoiceOption>,
        correct_option_id: OptionId,
        explanation: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            options,
            correct_option_id,
            explanation: explanation.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Free-form topic tag such as `"first-aid"`.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl MultipleChoice for Question {
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
