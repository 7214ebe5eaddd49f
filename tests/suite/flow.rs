//! End-to-end walks through the stage graph driven by `App::tick`.

use reframe_engine::{
    AFFIRMATIONS, ActiveExercise, EvidenceKind, FrameId, NOT_READY_MESSAGE, PrimerExercise,
    ReliefExercise, ReliefSubStage, SequencePhase, Stage, ToastKind,
};

use crate::common::{Harness, ms, secs};

fn stage(h: &Harness) -> Stage {
    h.app.flow().state().current_stage
}

fn toast_message(h: &Harness) -> Option<String> {
    let toast = &h.app.flow().state().toast;
    toast.visible.then(|| toast.message.clone())
}

/// Choose the pattern candidate that is (or is not) the answer.
fn choose_pattern(h: &mut Harness, correct: bool) {
    let ActiveExercise::PrimerPattern(run) = h.app.exercise_mut() else {
        panic!("expected the primer pattern run");
    };
    let answer = run.puzzle().answer();
    let shape = if correct {
        answer
    } else {
        run.puzzle()
            .candidates()
            .iter()
            .copied()
            .find(|shape| *shape != answer)
            .unwrap()
    };
    run.choose(shape);
}

#[test]
fn ready_user_walks_every_stage_and_keeps_the_journal() {
    let mut h = Harness::new();

    h.app.flow_mut().set_willingness_score(85);
    h.tick(ms(8));
    assert_eq!(stage(&h), Stage::PerceptionWorkshop);
    assert!(matches!(h.app.exercise(), ActiveExercise::None));

    let flow = h.app.flow_mut();
    flow.update_interpretation("I always get this wrong");
    flow.update_evidence(EvidenceKind::Against, 0, "Last week went fine");
    flow.add_evidence_slot(EvidenceKind::For);
    flow.update_frame_completion(FrameId::new(1), "moods pass");
    flow.update_frame_rating(FrameId::new(1), 3);
    flow.update_frame_completion(FrameId::new(2), "patience");
    flow.update_frame_rating(FrameId::new(2), 5);
    let anchored = flow.commit_and_anchor_frame().unwrap().clone();
    assert_eq!(anchored.statement, "This stage is teaching me…");
    assert_eq!(anchored.completion, "patience");
    assert_eq!(u8::from(anchored.rating), 5);
    assert_eq!(toast_message(&h).as_deref(), Some("Frame anchored to journal!"));

    h.app.flow_mut().proceed_from_workshop();
    h.tick(ms(8));
    assert_eq!(stage(&h), Stage::ClarityReflection);

    h.app.flow_mut().set_clarity_text("I can slow down");
    assert!(h.app.proceed_from_clarity());
    h.tick(ms(8));
    assert_eq!(stage(&h), Stage::ImmediateReliefPractice);
    assert_eq!(h.app.flow().state().relief_sub_stage, ReliefSubStage::Menu);

    h.app.start_relief(ReliefExercise::AudioBreathe);
    assert!(matches!(h.app.exercise(), ActiveExercise::Breath(_)));
    h.app.start_breath();
    h.run_for(secs(92), ms(8));

    assert_eq!(stage(&h), Stage::ReinforcementBecoming);
    let message = h.app.flow().state().final_reinforcement_message.clone();
    assert!(AFFIRMATIONS.iter().any(|a| Some(*a) == message.as_deref()));
    assert_eq!(toast_message(&h).as_deref(), Some("Relief achieved!"));
    assert_eq!(h.app.flow().state().exit_message, None);

    h.app.flow_mut().finish_module_and_reset();
    h.tick(ms(8));
    let state = h.app.flow().state();
    assert_eq!(state.current_stage, Stage::WillingnessCalibration);
    assert_eq!(state.journal.len(), 1);
    assert_eq!(state.journal[0].completion, "patience");
    assert!(state.workshop.interpretation.is_empty());
    assert!(state.clarity.is_empty());
}

#[test]
fn low_willingness_exits_with_guidance() {
    let mut h = Harness::new();

    h.app.flow_mut().set_willingness_score(20);
    h.tick(ms(8));

    let state = h.app.flow().state();
    assert_eq!(state.current_stage, Stage::ReinforcementBecoming);
    assert_eq!(state.exit_message.as_deref(), Some(NOT_READY_MESSAGE));
    assert!(state.final_reinforcement_message.is_some());
}

#[test]
fn solving_the_pattern_primer_opens_the_workshop() {
    let mut h = Harness::new();

    h.app.flow_mut().set_willingness_score(60);
    h.tick(ms(8));
    assert_eq!(stage(&h), Stage::OpennessPrimer);

    choose_pattern(&mut h, true);
    h.run_for(ms(1400), ms(8));
    assert_eq!(stage(&h), Stage::OpennessPrimer);

    h.run_for(ms(200), ms(8));
    assert_eq!(stage(&h), Stage::PerceptionWorkshop);
    assert!(matches!(h.app.exercise(), ActiveExercise::None));
    let toast = &h.app.flow().state().toast;
    assert_eq!(toast.message, "Alignment achieved!");
    assert_eq!(toast.kind, ToastKind::Success);
}

#[test]
fn failed_pattern_falls_back_to_the_sequence() {
    let mut h = Harness::new();
    h.app.flow_mut().set_willingness_score(55);
    h.tick(ms(8));

    choose_pattern(&mut h, false);
    h.run_for(ms(1600), ms(8));

    let state = h.app.flow().state();
    assert_eq!(state.current_stage, Stage::OpennessPrimer);
    assert_eq!(state.openness_primer_exercise, PrimerExercise::SequenceTap);
    assert_eq!(h.app.flow().remaining_primer_attempts(), 1);

    h.run_for(secs(4), ms(8));
    let ActiveExercise::PrimerSequence(tap) = h.app.exercise_mut() else {
        panic!("expected the sequence tap");
    };
    assert_eq!(tap.phase(), SequencePhase::AwaitingInput);
    let sequence = tap.sequence().to_vec();
    for position in &sequence {
        tap.tap(*position);
    }
    assert_eq!(tap.phase(), SequencePhase::Succeeded);

    h.run_for(ms(1100), ms(8));
    assert_eq!(stage(&h), Stage::PerceptionWorkshop);
}

#[test]
fn second_primer_failure_exits_the_flow() {
    let mut h = Harness::new();
    h.app.flow_mut().set_willingness_score(50);
    h.tick(ms(8));

    choose_pattern(&mut h, false);
    h.run_for(ms(1600), ms(8));
    h.run_for(secs(4), ms(8));

    let ActiveExercise::PrimerSequence(tap) = h.app.exercise_mut() else {
        panic!("expected the sequence tap");
    };
    let wrong = (tap.sequence()[0] + 1) % tap.positions();
    tap.tap(wrong);
    assert_eq!(tap.phase(), SequencePhase::Failed);

    h.run_for(ms(1600), ms(8));
    let state = h.app.flow().state();
    assert_eq!(state.current_stage, Stage::ReinforcementBecoming);
    assert_eq!(state.exit_message.as_deref(), Some(NOT_READY_MESSAGE));
    assert!(matches!(h.app.exercise(), ActiveExercise::None));
}

#[test]
fn newer_toast_restarts_the_hide_timer() {
    let mut h = Harness::new();

    h.app.flow_mut().show_toast("first", ToastKind::Info, None);
    h.run_for(secs(1), ms(100));
    h.app.flow_mut().show_toast("second", ToastKind::Warning, None);
    h.run_for(ms(2500), ms(100));

    assert_eq!(toast_message(&h).as_deref(), Some("second"));

    h.run_for(ms(600), ms(100));
    assert_eq!(toast_message(&h), None);
}

#[test]
fn clarity_requires_a_reflection() {
    let mut h = Harness::new();
    h.app.flow_mut().set_willingness_score(90);
    h.app.flow_mut().proceed_from_workshop();

    assert!(!h.app.proceed_from_clarity());
    assert_eq!(stage(&h), Stage::ClarityReflection);
    assert_eq!(
        toast_message(&h).as_deref(),
        Some("Please provide your reflection or record an audio note.")
    );

    h.app.toggle_recording();
    h.app.toggle_recording();
    assert!(h.app.proceed_from_clarity());
    assert_eq!(stage(&h), Stage::ImmediateReliefPractice);
}
