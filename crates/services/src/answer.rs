use serde::Serialize;

use rescue_core::model::{MultipleChoice, OptionId};

/// Outcome of answering one multiple-choice item, for immediate feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub selected: OptionId,
    pub correct_option_id: OptionId,
    pub is_correct: bool,
    pub explanation: String,
}

impl AnswerFeedback {
    /// Score `selected` against `item`. Callers check option membership first.
    pub(crate) fn grade(item: &impl MultipleChoice, selected: OptionId) -> Self {
        Self {
            is_correct: item.is_correct(&selected),
            correct_option_id: item.correct_option_id().clone(),
            explanation: item.explanation().to_owned(),
            selected,
        }
    }
}

/// Aggregated view of a walkthrough's progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalkthroughProgress {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl WalkthroughProgress {
    pub(crate) fn new(total: usize, answers: &[AnswerFeedback]) -> Self {
        let answered = answers.len();
        Self {
            total,
            answered,
            correct: answers.iter().filter(|a| a.is_correct).count(),
            remaining: total.saturating_sub(answered),
            is_complete: answered >= total,
        }
    }
}
