//! Read-only training content bundled with the application.
//!
//! The built-in content lives in `content/*.json` and is embedded at compile time.
//! [`Catalog::builtin`] parses and validates it once; afterwards the catalog is
//! immutable and only hands out shared references.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{
    EmergencyStep, EquipmentCategory, EquipmentId, EquipmentItem, HypothermiaStage, Lesson,
    LessonId, MultipleChoice, Question, QuestionId, Scenario, ScenarioId,
};

const LESSONS_JSON: &str = include_str!("../content/lessons.json");
const SCENARIOS_JSON: &str = include_str!("../content/scenarios.json");
const QUESTIONS_JSON: &str = include_str!("../content/questions.json");
const EQUIPMENT_JSON: &str = include_str!("../content/equipment.json");
const EMERGENCY_STEPS_JSON: &str = include_str!("../content/emergency_steps.json");
const HYPOTHERMIA_STAGES_JSON: &str = include_str!("../content/hypothermia_stages.json");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to parse {name} content: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("lesson {id} has no steps")]
    EmptyLesson { id: String },

    #[error("scenario {id} has no steps")]
    EmptyScenario { id: String },

    #[error("{kind} {id} has no options")]
    NoOptions { kind: &'static str, id: String },

    #[error("{kind} {id} lists option {option} more than once")]
    DuplicateOption {
        kind: &'static str,
        id: String,
        option: String,
    },

    #[error("{kind} {id} marks unknown option {option} as correct")]
    UnknownCorrectOption {
        kind: &'static str,
        id: String,
        option: String,
    },
}

//
// ─── PARTS ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated catalog content, e.g. for building small catalogs in tests.
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    pub lessons: Vec<Lesson>,
    pub scenarios: Vec<Scenario>,
    pub questions: Vec<Question>,
    pub equipment: Vec<EquipmentItem>,
    pub emergency_steps: Vec<EmergencyStep>,
    pub hypothermia_stages: Vec<HypothermiaStage>,
}

impl CatalogParts {
    /// Parse the content embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` naming the file that failed to parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self {
            lessons: parse("lessons", LESSONS_JSON)?,
            scenarios: parse("scenarios", SCENARIOS_JSON)?,
            questions: parse("questions", QUESTIONS_JSON)?,
            equipment: parse("equipment", EQUIPMENT_JSON)?,
            emergency_steps: parse("emergency steps", EMERGENCY_STEPS_JSON)?,
            hypothermia_stages: parse("hypothermia stages", HYPOTHERMIA_STAGES_JSON)?,
        })
    }
}

fn parse<T: DeserializeOwned>(name: &'static str, raw: &str) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(raw).map_err(|source| CatalogError::Parse { name, source })
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Validated, immutable training content.
#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    scenarios: Vec<Scenario>,
    questions: Vec<Question>,
    equipment: Vec<EquipmentItem>,
    emergency_steps: Vec<EmergencyStep>,
    hypothermia_stages: Vec<HypothermiaStage>,
}

impl Catalog {
    /// Load and validate the bundled content.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded JSON is malformed or inconsistent.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(CatalogParts::builtin()?)
    }

    /// Validate content and build a catalog.
    ///
    /// Ids must be unique per kind (lesson steps and scenario steps across the
    /// whole catalog), every lesson and scenario needs at least one step, and every
    /// multiple-choice item needs distinct options that include its correct one.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` found.
    pub fn new(parts: CatalogParts) -> Result<Self, CatalogError> {
        check_unique("lesson", parts.lessons.iter().map(|l| l.id().as_str()))?;
        check_unique(
            "lesson step",
            parts
                .lessons
                .iter()
                .flat_map(Lesson::steps)
                .map(|s| s.id.as_str()),
        )?;
        for lesson in &parts.lessons {
            if lesson.total_steps() == 0 {
                return Err(CatalogError::EmptyLesson {
                    id: lesson.id().to_string(),
                });
            }
        }

        check_unique(
            "scenario",
            parts.scenarios.iter().map(|s| s.id().as_str()),
        )?;
        check_unique(
            "scenario step",
            parts
                .scenarios
                .iter()
                .flat_map(|s| s.steps().iter())
                .map(|s| s.id.as_str()),
        )?;
        for scenario in &parts.scenarios {
            if scenario.steps().is_empty() {
                return Err(CatalogError::EmptyScenario {
                    id: scenario.id().to_string(),
                });
            }
            for step in scenario.steps() {
                check_choice("scenario step", step.id.as_str(), step)?;
            }
        }

        check_unique(
            "question",
            parts.questions.iter().map(|q| q.id().as_str()),
        )?;
        for question in &parts.questions {
            check_choice("question", question.id().as_str(), question)?;
        }

        check_unique("equipment", parts.equipment.iter().map(|e| e.id.as_str()))?;

        Ok(Self {
            lessons: parts.lessons,
            scenarios: parts.scenarios,
            questions: parts.questions,
            equipment: parts.equipment,
            emergency_steps: parts.emergency_steps,
            hypothermia_stages: parts.hypothermia_stages,
        })
    }

    // ─── lessons ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == id)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    // ─── scenarios ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn scenario(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id() == id)
    }

    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    // ─── questions ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn questions_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| q.category() == category)
    }

    // ─── equipment ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn equipment(&self) -> &[EquipmentItem] {
        &self.equipment
    }

    #[must_use]
    pub fn equipment_item(&self, id: &EquipmentId) -> Option<&EquipmentItem> {
        self.equipment.iter().find(|e| &e.id == id)
    }

    pub fn equipment_in_category(
        &self,
        category: EquipmentCategory,
    ) -> impl Iterator<Item = &EquipmentItem> + '_ {
        self.equipment.iter().filter(move |e| e.category == category)
    }

    // ─── reference ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn emergency_steps(&self) -> &[EmergencyStep] {
        &self.emergency_steps
    }

    #[must_use]
    pub fn hypothermia_stages(&self) -> &[HypothermiaStage] {
        &self.hypothermia_stages
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}

fn check_choice(
    kind: &'static str,
    id: &str,
    item: &impl MultipleChoice,
) -> Result<(), CatalogError> {
    if item.options().is_empty() {
        return Err(CatalogError::NoOptions {
            kind,
            id: id.to_owned(),
        });
    }
    let mut seen = HashSet::new();
    for option in item.options() {
        if !seen.insert(&option.id) {
            return Err(CatalogError::DuplicateOption {
                kind,
                id: id.to_owned(),
                option: option.id.to_string(),
            });
        }
    }
    if !item.has_option(item.correct_option_id()) {
        return Err(CatalogError::UnknownCorrectOption {
            kind,
            id: id.to_owned(),
            option: item.correct_option_id().to_string(),
        });
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
