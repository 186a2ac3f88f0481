use std::sync::Arc;

use serde::Serialize;

use rescue_core::model::ScenarioId;
use rescue_core::{Catalog, Clock};

use super::run::ScenarioRun;
use crate::error::ScenarioError;
use crate::progress_service::ProgressService;

/// Result of a finished scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    pub scenario_id: ScenarioId,
    pub correct_answers: usize,
    pub total_steps: usize,
    /// Every step was right, so the scenario counts as completed.
    pub passed: bool,
    /// The scenario was not completed before this run.
    pub newly_completed: bool,
}

/// Starts scenario runs and credits completion.
#[derive(Clone)]
pub struct ScenarioService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
}

impl ScenarioService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, progress: Arc<ProgressService>) -> Self {
        Self {
            clock,
            catalog,
            progress,
        }
    }

    /// Start a fresh run of the given scenario.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::UnknownScenario` if the catalog has no such scenario.
    pub fn start(&self, scenario_id: &ScenarioId) -> Result<ScenarioRun, ScenarioError> {
        let scenario = self
            .catalog
            .scenario(scenario_id)
            .ok_or_else(|| ScenarioError::UnknownScenario(scenario_id.clone()))?;
        log::debug!("starting scenario {scenario_id}");
        Ok(ScenarioRun::new(scenario.clone(), self.clock.now()))
    }

    /// Finish a run, marking the scenario completed only if every step was right.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Incomplete` if steps remain unanswered.
    pub async fn finish(&self, run: ScenarioRun) -> Result<ScenarioOutcome, ScenarioError> {
        if !run.is_complete() {
            return Err(ScenarioError::Incomplete {
                answered: run.current_index(),
                total: run.total_steps(),
            });
        }

        let scenario_id = run.scenario().id().clone();
        let passed = run.all_correct();
        let newly_completed = if passed {
            self.progress.mark_scenario_completed(&scenario_id).await?
        } else {
            false
        };
        log::debug!(
            "scenario {scenario_id} finished with {}/{} correct",
            run.correct_answers(),
            run.total_steps()
        );

        Ok(ScenarioOutcome {
            scenario_id,
            correct_answers: run.correct_answers(),
            total_steps: run.total_steps(),
            passed,
            newly_completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_core::model::{MultipleChoice, OptionId};
    use rescue_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    async fn service() -> ScenarioService {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let progress = Arc::new(
            ProgressService::load(Arc::clone(&catalog), Arc::new(InMemoryRepository::new())).await,
        );
        ScenarioService::new(fixed_clock(), catalog, progress)
    }

    fn answer_all_correctly(run: &mut ScenarioRun) {
        while let Some(step) = run.current_step() {
            let correct = step.correct_option_id().clone();
            run.submit_answer(&correct).unwrap();
        }
    }

    #[tokio::test]
    async fn perfect_run_marks_completed() {
        let service = service().await;
        let id = ScenarioId::new("scenario_3");
        let mut run = service.start(&id).unwrap();
        answer_all_correctly(&mut run);

        let outcome = service.finish(run).await.unwrap();
        assert!(outcome.passed);
        assert!(outcome.newly_completed);
        assert!(service.progress.snapshot().is_scenario_completed(&id));
        assert_eq!(service.progress.snapshot().scenarios_passed(), 1);
    }

    #[tokio::test]
    async fn wrong_last_step_is_not_completed() {
        let service = service().await;
        let id = ScenarioId::new("scenario_1");
        let mut run = service.start(&id).unwrap();
        run.submit_answer(&OptionId::new("b")).unwrap();
        run.submit_answer(&OptionId::new("b")).unwrap();
        run.submit_answer(&OptionId::new("d")).unwrap();

        let outcome = service.finish(run).await.unwrap();
        assert_eq!(outcome.correct_answers, 2);
        assert_eq!(outcome.total_steps, 3);
        assert!(!outcome.passed);
        assert!(!service.progress.snapshot().is_scenario_completed(&id));
    }

    #[tokio::test]
    async fn retry_after_failure_can_complete() {
        let service = service().await;
        let id = ScenarioId::new("scenario_1");

        let mut failed = service.start(&id).unwrap();
        for _ in 0..3 {
            failed.submit_answer(&OptionId::new("a")).unwrap();
        }
        assert!(!service.finish(failed).await.unwrap().passed);

        let mut retry = service.start(&id).unwrap();
        answer_all_correctly(&mut retry);
        let outcome = service.finish(retry).await.unwrap();
        assert!(outcome.passed);

        let mut again = service.start(&id).unwrap();
        answer_all_correctly(&mut again);
        assert!(!service.finish(again).await.unwrap().newly_completed);
    }

    #[tokio::test]
    async fn unfinished_run_is_rejected() {
        let service = service().await;
        let run = service.start(&ScenarioId::new("scenario_2")).unwrap();
        let err = service.finish(run).await.unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Incomplete {
                answered: 0,
                total: 2
            }
        ));
    }

    #[tokio::test]
    async fn unknown_scenario_is_rejected() {
        let service = service().await;
        let err = service.start(&ScenarioId::new("scenario_404")).unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownScenario(_)));
    }
}
