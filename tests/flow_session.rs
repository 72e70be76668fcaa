//! Integration tests for the onboarding flow engine.
//!
//! Exercises the full path: pack selection → compiled question set →
//! step-by-step traversal with validation → completion → persisted snapshot.

use std::sync::Arc;

use serde_json::{Value, json};

use fitflow::catalog::{Catalog, PackRegistry, QuestionId, ids};
use fitflow::flow::{FlowSession, FlowState, PackChoice, StepGraph, SubmitOutcome};
use fitflow::store::{MemoryStore, ProfileStore, SnapshotWriter};
use fitflow::{FlowError, compile_question_set, estimated_time_for_pack, recommended_packs};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn answer_for(step: &QuestionId) -> Value {
    match step.as_str() {
        ids::GET_NAME => json!("Jordan"),
        ids::MAIN_OBJECTIVE => json!("muscle_gain"),
        ids::PERSONAL_INFO => json!({"age": 27}),
        ids::SPORT_SELECTION => json!(["swimming"]),
        ids::SPORT_FREQUENCY => json!(4),
        ids::STRENGTH_SETUP => json!("build_muscle"),
        ids::STRENGTH_EXPERIENCE => json!("intermediate"),
        ids::NUTRITION_OBJECTIVE => json!("count_macros"),
        ids::NUTRITION_PREFERENCES => json!(["no_restrictions"]),
        ids::SLEEP_SETUP => json!(8),
        ids::SLEEP_SCHEDULE => json!("night_owl"),
        ids::HYDRATION_SETUP => json!(10),
        ids::WELLNESS_CHECKIN => json!(true),
        _ => json!(true),
    }
}

/// Drive a started session to completion with valid answers.
fn run_to_completion(session: &mut FlowSession) {
    let mut guard = 0;
    while session.state() == FlowState::InProgress {
        let step_id = session.current_step().expect("current step").id.clone();
        session.submit(answer_for(&step_id)).expect("valid answer");
        guard += 1;
        assert!(guard <= 20, "flow did not terminate");
    }
}

#[test]
fn muscle_building_scenario() -> anyhow::Result<()> {
    init_tracing();
    let mut session = FlowSession::with_defaults();
    session.start(PackChoice::Pack("muscle_building".to_string()))?;

    // The compiled sequence has strength and nutrition questions but no
    // sleep or hydration ones.
    let sequence = session.sequence();
    assert!(sequence.iter().any(|q| *q == ids::STRENGTH_SETUP));
    assert!(sequence.iter().any(|q| *q == ids::NUTRITION_OBJECTIVE));
    assert!(!sequence.iter().any(|q| *q == ids::SLEEP_SETUP));
    assert!(!sequence.iter().any(|q| *q == ids::HYDRATION_SETUP));

    run_to_completion(&mut session);

    assert_eq!(session.state(), FlowState::Completed);
    assert_eq!(session.progress_percentage(), 1.0);
    assert!(
        session
            .data()
            .progress
            .is_completed(&QuestionId::from(ids::PRIVACY_CONSENT))
    );
    assert_eq!(session.data().name.as_deref(), Some("Jordan"));
    assert_eq!(session.data().main_objective.as_deref(), Some("muscle_gain"));
    Ok(())
}

#[test]
fn complete_transformation_asks_everything() -> anyhow::Result<()> {
    let catalog = Catalog::default();
    let registry = PackRegistry::builtin(&catalog);
    let compiled = compile_question_set(&catalog, &registry, "complete_transformation", None);
    assert_eq!(compiled, catalog.all_questions());

    let mut session = FlowSession::with_defaults();
    session.start(PackChoice::Pack("complete_transformation".to_string()))?;
    run_to_completion(&mut session);
    assert_eq!(session.state(), FlowState::Completed);
    // Every catalog question was either answered or deliberately bypassed
    // by branching; with a sport picked, nothing is skipped.
    assert_eq!(
        session.data().progress.completed_steps.len(),
        catalog.all_questions().len()
    );
    Ok(())
}

#[test]
fn recommendations_always_startable() {
    // Every recommendation, known objective or not, must start a session
    // (the custom fallback needs a module list).
    for objective in ["weight_loss", "performance", "holistic", "???"] {
        for pack_id in recommended_packs(objective) {
            let mut session = FlowSession::with_defaults();
            let choice = if pack_id == "custom" {
                PackChoice::Custom(vec![fitflow::ModuleId::Nutrition])
            } else {
                PackChoice::Pack(pack_id.clone())
            };
            session
                .start(choice)
                .unwrap_or_else(|e| panic!("{objective}/{pack_id}: {e}"));
            assert_eq!(session.state(), FlowState::InProgress);
        }
    }
}

#[test]
fn time_estimates_are_positive() {
    let catalog = Catalog::default();
    let registry = PackRegistry::builtin(&catalog);
    let config = fitflow::EngineConfig::default();
    for pack in registry.all() {
        if pack.id == "custom" {
            continue;
        }
        let minutes = estimated_time_for_pack(&catalog, &registry, &pack.id, &config);
        assert!(minutes > 0, "{} estimated at zero minutes", pack.id);
    }
    assert_eq!(
        estimated_time_for_pack(&catalog, &registry, "does-not-exist", &config),
        15
    );
}

#[test]
fn graph_validates_against_builtin_configuration() {
    let catalog = Catalog::default();
    let registry = PackRegistry::builtin(&catalog);
    let graph = StepGraph::default();
    graph
        .validate(&catalog, &registry)
        .expect("built-in graph, catalog, and packs must be consistent");
}

#[test]
fn rejected_answer_then_abort() -> anyhow::Result<()> {
    let mut session = FlowSession::with_defaults();
    session.start(PackChoice::Pack("wellness_balance".to_string()))?;
    session.submit(json!(null))?; // welcome

    let err = session.submit(json!(""));
    assert!(matches!(err, Err(FlowError::Validation(_))));
    assert_eq!(session.current_step().unwrap().id, ids::GET_NAME);

    session.abort();
    assert_eq!(session.state(), FlowState::NotStarted);
    assert!(session.data().answers.is_empty());

    // A fresh start works after abort.
    session.start(PackChoice::Pack("daily_health".to_string()))?;
    assert_eq!(session.state(), FlowState::InProgress);
    Ok(())
}

#[tokio::test]
async fn snapshots_persist_after_each_submit() -> anyhow::Result<()> {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let writer = SnapshotWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>);

    let mut session = FlowSession::with_defaults();
    session.start(PackChoice::Pack("daily_health".to_string()))?;

    let mut outcome = SubmitOutcome::Advanced(QuestionId::from(ids::WELCOME));
    while outcome != SubmitOutcome::Completed {
        let step_id = session.current_step().expect("current step").id.clone();
        outcome = session.submit(answer_for(&step_id))?;
        writer.save("user-1", session.data());
    }

    // The final snapshot lands without the engine ever waiting on it.
    let mut loaded = None;
    for _ in 0..50 {
        loaded = store.load_snapshot("user-1").await?;
        if loaded
            .as_ref()
            .is_some_and(|d| d.progress.current_step.is_none())
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    let loaded = loaded.expect("snapshot saved");
    assert_eq!(loaded.name.as_deref(), Some("Jordan"));
    assert!(!loaded.progress.completed_steps.is_empty());
    Ok(())
}
