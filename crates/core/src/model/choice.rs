use serde::{Deserialize, Serialize};

use crate::model::ids::OptionId;

/// One selectable answer of a scenario step or test question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: OptionId,
    pub text: String,
}

impl ChoiceOption {
    #[must_use]
    pub fn new(id: impl Into<OptionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A single-answer multiple-choice item.
///
/// Shared by scenario steps and knowledge-test questions: both are answered by
/// picking exactly one option, and an answer is right only when its id equals
/// the correct option id. There is no partial credit.
pub trait MultipleChoice {
    fn options(&self) -> &[ChoiceOption];

    fn correct_option_id(&self) -> &OptionId;

    fn explanation(&self) -> &str;

    /// Returns true if `option` is one of this item's options.
    fn has_option(&self, option: &OptionId) -> bool {
        self.options().iter().any(|o| &o.id == option)
    }

    /// Exact comparison against the correct option id.
    fn is_correct(&self, option: &OptionId) -> bool {
        self.correct_option_id() == option
    }

    #[must_use]
    fn correct_option(&self) -> Option<&ChoiceOption> {
        let correct = self.correct_option_id();
        self.options().iter().find(|o| &o.id == correct)
    }
}
