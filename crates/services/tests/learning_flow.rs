use rescue_core::model::{KnowledgeLevel, LessonId, MultipleChoice, OptionId};
use rescue_core::time::fixed_now;
use services::{AppServices, Clock, TestSession};

const DB_URL: &str = "sqlite:file:memdb_learning_flow?mode=memory&cache=shared";

fn answer_test(test: &mut TestSession, correct: usize) {
    let mut index = 0;
    while let Some(question) = test.current_question() {
        let option = if index < correct {
            question.correct_option_id().clone()
        } else {
            question
                .options()
                .iter()
                .map(|o| o.id.clone())
                .find(|id| !question.is_correct(id))
                .expect("wrong option")
        };
        test.submit_answer(&option).expect("answer");
        index += 1;
    }
}

#[tokio::test]
async fn full_journey_reaches_expert_and_survives_restart() {
    let app = AppServices::new_sqlite(DB_URL, Clock::fixed(fixed_now()))
        .await
        .expect("services");
    let catalog = app.catalog();
    let progress = app.progress();

    for lesson in catalog.lessons() {
        progress
            .mark_lesson_completed(lesson.id())
            .await
            .expect("lesson");
    }
    assert_eq!(progress.knowledge_level(), KnowledgeLevel::Intermediate);

    for scenario in catalog.scenarios().iter().take(6) {
        let mut run = app.scenarios().start(scenario.id()).expect("start");
        while let Some(step) = run.current_step() {
            let correct = step.correct_option_id().clone();
            run.submit_answer(&correct).expect("answer");
        }
        let outcome = app.scenarios().finish(run).await.expect("finish");
        assert!(outcome.passed);
    }

    let assessment = app.assessment();
    for _ in 0..2 {
        let mut test = assessment.start_test().expect("test");
        answer_test(&mut test, 9);
        assert!(assessment.finish_test(test).await.expect("result").passed());
    }
    assert_eq!(progress.knowledge_level(), KnowledgeLevel::Advanced);

    let mut failing = assessment.start_test().expect("test");
    answer_test(&mut failing, 5);
    let result = assessment.finish_test(failing).await.expect("result");
    assert!(!result.passed());
    assert_eq!(progress.knowledge_level(), KnowledgeLevel::Advanced);

    let mut third = assessment.start_test().expect("test");
    answer_test(&mut third, 10);
    assessment.finish_test(third).await.expect("result");
    assert_eq!(progress.knowledge_level(), KnowledgeLevel::Expert);

    let overview = progress.overview();
    assert_eq!(overview.completed_lessons, 6);
    assert_eq!(overview.completed_scenarios, 6);
    assert_eq!(overview.tests_taken, 4);
    assert_eq!(overview.tests_passed, 3);
    assert_eq!(overview.total_score, 28);
    assert_eq!(overview.best_percentage, Some(100));
    // 12 of 14 items
    assert_eq!(overview.overall_percent(), 85);

    let restarted = AppServices::new_sqlite(DB_URL, Clock::fixed(fixed_now()))
        .await
        .expect("restart");
    assert_eq!(restarted.progress().snapshot(), progress.snapshot());
    assert_eq!(
        restarted.progress().knowledge_level(),
        KnowledgeLevel::Expert
    );
}

#[tokio::test]
async fn lesson_position_and_checklist_are_independent() {
    let app = AppServices::in_memory(Clock::fixed(fixed_now()))
        .await
        .expect("services");
    let lesson = LessonId::new("lesson_2");

    app.progress()
        .record_lesson_position(&lesson, 3)
        .await
        .expect("position");
    app.checklist()
        .toggle(&"eq_throw_rope".into())
        .await
        .expect("toggle");

    app.progress().reset_progress().await;

    assert_eq!(app.progress().snapshot().lesson_position(&lesson), None);
    assert_eq!(app.checklist().summary().checked, 1);

    app.checklist().reset().await;
    assert_eq!(app.checklist().summary().checked, 0);
}

#[tokio::test]
async fn scenario_with_invalid_option_keeps_step() {
    let app = AppServices::in_memory(Clock::system()).await.expect("services");
    let mut run = app
        .scenarios()
        .start(&"scenario_1".into())
        .expect("start");
    assert!(run.submit_answer(&OptionId::new("zz")).is_err());
    assert_eq!(run.current_index(), 0);
}
