use chrono::{DateTime, Utc};
use std::fmt;

use rescue_core::model::{MultipleChoice, OptionId, Question, QuestionId, TestResult, TestResultId};

use crate::answer::{AnswerFeedback, WalkthroughProgress};
use crate::error::AssessmentError;

/// Captures the answer given to one question of a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub feedback: AnswerFeedback,
}

/// In-memory knowledge test.
///
/// Holds a fixed, ordered sample of questions and steps through them one at a
/// time. Each question accepts exactly one answer and answers cannot be changed.
pub struct TestSession {
    questions: Vec<Question>,
    answers: Vec<AnswerFeedback>,
    started_at: DateTime<Utc>,
}

impl TestSession {
    /// Create a test over `questions` in the given order.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::EmptyPool` if no questions are provided.
    pub fn new(
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, AssessmentError> {
        if questions.is_empty() {
            return Err(AssessmentError::EmptyPool);
        }
        Ok(Self {
            questions,
            answers: Vec::new(),
            started_at,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question awaiting an answer.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.answers.len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    #[must_use]
    pub fn progress(&self) -> WalkthroughProgress {
        WalkthroughProgress::new(self.questions.len(), &self.answers)
    }

    /// Answers given so far, paired with their questions.
    pub fn answered(&self) -> impl Iterator<Item = AnsweredQuestion> + '_ {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(question, feedback)| AnsweredQuestion {
                question_id: question.id().clone(),
                feedback: feedback.clone(),
            })
    }

    /// Answer the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Completed` if every question is answered.
    /// Returns `AssessmentError::UnknownOption` if `option` is not one of the
    /// current question's options; the question stays current.
    pub fn submit_answer(&mut self, option: &OptionId) -> Result<&AnswerFeedback, AssessmentError> {
        let Some(question) = self.current_question() else {
            return Err(AssessmentError::Completed);
        };
        if !question.has_option(option) {
            return Err(AssessmentError::UnknownOption {
                question: question.id().clone(),
                option: option.clone(),
            });
        }
        let feedback = AnswerFeedback::grade(question, option.clone());
        self.answers.push(feedback);
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Turn a finished test into a `TestResult` taken at `taken_at`.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Incomplete` if questions remain unanswered.
    pub fn into_result(
        self,
        id: TestResultId,
        taken_at: DateTime<Utc>,
    ) -> Result<TestResult, AssessmentError> {
        if !self.is_complete() {
            return Err(AssessmentError::Incomplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }
        let score = u32::try_from(self.score()).unwrap_or(u32::MAX);
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        Ok(TestResult::new(id, taken_at, score, total)?)
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("total_questions", &self.questions.len())
            .field("answered", &self.answers.len())
            .field("score", &self.score())
            .field("started_at", &self.started_at)
            .finish()
    }
}
