use chrono::{DateTime, Utc};

use rescue_core::model::{MultipleChoice, OptionId, Scenario, ScenarioStep};

use crate::answer::{AnswerFeedback, WalkthroughProgress};
use crate::error::ScenarioError;

/// One attempt at a scenario.
///
/// Steps are answered strictly in order, one option each. A wrong answer does
/// not stop the run but forfeits completion credit for it.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    scenario: Scenario,
    answers: Vec<AnswerFeedback>,
    started_at: DateTime<Utc>,
}

impl ScenarioRun {
    #[must_use]
    pub fn new(scenario: Scenario, started_at: DateTime<Utc>) -> Self {
        Self {
            scenario,
            answers: Vec::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.scenario.steps().len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&ScenarioStep> {
        self.scenario.steps().get(self.answers.len())
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerFeedback] {
        &self.answers
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.total_steps()
    }

    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// True once every step has been answered correctly.
    #[must_use]
    pub fn all_correct(&self) -> bool {
        self.is_complete() && self.correct_answers() == self.total_steps()
    }

    #[must_use]
    pub fn progress(&self) -> WalkthroughProgress {
        WalkthroughProgress::new(self.total_steps(), &self.answers)
    }

    /// Answer the current step and advance.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Completed` if every step is answered.
    /// Returns `ScenarioError::UnknownOption` if `option` is not one of the
    /// current step's options; the step stays current.
    pub fn submit_answer(&mut self, option: &OptionId) -> Result<&AnswerFeedback, ScenarioError> {
        let Some(step) = self.current_step() else {
            return Err(ScenarioError::Completed);
        };
        if !step.has_option(option) {
            return Err(ScenarioError::UnknownOption {
                step: step.id.clone(),
                option: option.clone(),
            });
        }
        let feedback = AnswerFeedback::grade(step, option.clone());
        self.answers.push(feedback);
        Ok(&self.answers[self.answers.len() - 1])
    }
}
