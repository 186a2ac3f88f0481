use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, SectionId, StepId};

/// A single screen of lesson text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonStep {
    pub id: StepId,
    pub title: String,
    pub body: String,
    /// Marks key safety facts that should be emphasised.
    pub important: bool,
}

/// A titled group of steps within a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub id: SectionId,
    pub title: String,
    pub steps: Vec<LessonStep>,
}

/// Static instructional content: sections of ordered steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    subtitle: String,
    icon: String,
    sections: Vec<LessonSection>,
}

impl Lesson {
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon: impl Into<String>,
        sections: Vec<LessonSection>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: subtitle.into(),
            icon: icon.into(),
            sections,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn sections(&self) -> &[LessonSection] {
        &self.sections
    }

    /// Sum of the step counts of all sections.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.sections.iter().map(|s| s.steps.len()).sum()
    }

    /// Steps in reading order, across section boundaries.
    pub fn steps(&self) -> impl Iterator<Item = &LessonStep> {
        self.sections.iter().flat_map(|s| s.steps.iter())
    }

    /// Step at a flattened (reading-order) index.
    #[must_use]
    pub fn step_at(&self, index: usize) -> Option<&LessonStep> {
        self.steps().nth(index)
    }

    #[must_use]
    pub fn important_step_count(&self) -> usize {
        self.steps().filter(|s| s.important).count()
    }
}
