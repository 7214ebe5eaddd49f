//! Exercise engines wired through the app with recording ports.

use reframe_engine::{
    ActiveExercise, BreathPhase, ReliefExercise, ReliefSubStage, SequencePhase, Stage, ToastKind,
};

use crate::common::{Harness, ToneLog, ms, secs};

fn open_relief_menu(h: &mut Harness) {
    let flow = h.app.flow_mut();
    flow.set_willingness_score(100);
    flow.proceed_from_workshop();
    flow.set_clarity_text("steady");
    flow.proceed_from_clarity();
    h.tick(ms(8));
}

fn breath_phase(h: &Harness) -> BreathPhase {
    match h.app.exercise() {
        ActiveExercise::Breath(cue) => cue.phase(),
        other => panic!("expected breath cue, got {other:?}"),
    }
}

#[test]
fn breath_cycle_speaks_each_cue_with_its_tone() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);
    h.app.start_breath();

    h.run_for(secs(12), ms(8));

    assert_eq!(
        h.speech.spoken()[..4],
        ["Breathe in", "Hold", "Breathe out", "Rest"]
    );
    assert_eq!(h.tone.played()[..4], [0, 1, 2, 3]);
    assert_eq!(breath_phase(&h), BreathPhase::Inhaling);
}

#[test]
fn full_breath_session_ends_on_the_completion_cue() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);
    h.app.start_breath();

    h.run_for(secs(91), ms(8));

    let spoken = h.speech.spoken();
    assert_eq!(spoken.len(), 31);
    assert_eq!(spoken.last().map(String::as_str), Some("Session complete. Well done."));
    assert_eq!(h.tone.played().len(), 30);
    assert_eq!(h.app.flow().state().current_stage, Stage::ImmediateReliefPractice);

    h.run_for(ms(600), ms(8));
    assert_eq!(
        h.app.flow().state().current_stage,
        Stage::ReinforcementBecoming
    );
}

#[test]
fn chime_only_plays_tones_without_speech() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);
    h.app.toggle_chime_only();
    assert!(h.app.chime_only());
    h.app.start_breath();

    h.run_for(secs(6), ms(8));

    assert!(h.speech.spoken().is_empty());
    assert_eq!(h.tone.played(), vec![0, 1, 2]);
}

#[test]
fn pausing_the_breath_keeps_the_remaining_time() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);
    h.app.start_breath();
    h.run_for(secs(10), ms(8));

    h.app.stop_breath(false);
    let ActiveExercise::Breath(cue) = h.app.exercise() else {
        panic!("expected breath cue");
    };
    assert!(!cue.is_running());
    assert_eq!(cue.remaining(), secs(80));
    assert_eq!(cue.prompt(), "Paused");
    assert_eq!(h.speech.cancels(), 1);

    h.run_for(secs(5), ms(8));
    h.app.start_breath();
    assert_eq!(breath_phase(&h), BreathPhase::Inhaling);
    let ActiveExercise::Breath(cue) = h.app.exercise() else {
        panic!("expected breath cue");
    };
    assert_eq!(cue.remaining(), secs(80));
}

#[test]
fn leaving_the_breath_returns_to_the_menu() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);
    h.app.start_breath();
    h.run_for(secs(2), ms(8));

    h.app.stop_breath(true);
    h.tick(ms(8));

    assert_eq!(h.app.flow().state().relief_sub_stage, ReliefSubStage::Menu);
    assert!(matches!(h.app.exercise(), ActiveExercise::None));
    let played = h.tone.played().len();
    h.run_for(secs(5), ms(8));
    assert_eq!(h.tone.played().len(), played);
}

#[test]
fn sequence_playback_sounds_each_step() {
    let mut h = Harness::new();
    let flow = h.app.flow_mut();
    flow.set_willingness_score(60);
    flow.fail_openness_primer_attempt();
    h.tick(ms(8));

    h.run_for(ms(3900), ms(10));

    let ActiveExercise::PrimerSequence(tap) = h.app.exercise() else {
        panic!("expected the sequence tap");
    };
    assert_eq!(tap.phase(), SequencePhase::AwaitingInput);
    assert_eq!(h.tone.played(), tap.sequence().to_vec());
}

#[test]
fn relief_puzzles_complete_after_three_matches() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::PatternPuzzle);

    for round in 0..3 {
        let ActiveExercise::ReliefPuzzles(run) = h.app.exercise_mut() else {
            panic!("expected relief puzzles in round {round}");
        };
        assert_eq!(run.index(), round);
        let answer = run.current().answer();
        run.choose(answer);
        h.run_for(ms(800), ms(8));
    }

    let state = h.app.flow().state();
    assert_eq!(state.current_stage, Stage::ReinforcementBecoming);
    assert_eq!(state.toast.message, "Relief achieved!");
    assert_eq!(state.toast.kind, ToastKind::Success);
}

#[test]
fn relief_timeout_still_completes() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::PatternPuzzle);

    h.run_for(secs(59), ms(50));
    assert_eq!(
        h.app.flow().state().current_stage,
        Stage::ImmediateReliefPractice
    );

    h.run_for(secs(1), ms(50));
    assert_eq!(
        h.app.flow().state().current_stage,
        Stage::ReinforcementBecoming
    );
}

#[test]
fn skipping_relief_puzzles_returns_to_the_menu() {
    let mut h = Harness::new();
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::PatternPuzzle);
    h.run_for(secs(3), ms(8));

    h.app.skip_relief_puzzle();
    h.tick(ms(8));

    assert_eq!(h.app.flow().state().relief_sub_stage, ReliefSubStage::Menu);
    assert!(matches!(h.app.exercise(), ActiveExercise::None));
    h.run_for(secs(70), ms(100));
    assert_eq!(
        h.app.flow().state().current_stage,
        Stage::ImmediateReliefPractice
    );
}

#[tokio::test]
async fn suspended_tone_is_unlocked_before_breathing() {
    let mut h = Harness::with_tone(ToneLog::suspended(true));
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);

    h.app.start_breath();
    assert!(h.app.is_audio_pending());
    assert_eq!(breath_phase(&h), BreathPhase::Idle);

    for _ in 0..100 {
        if !h.app.is_audio_pending() {
            break;
        }
        tokio::time::sleep(ms(1)).await;
        h.tick(ms(8));
    }

    assert!(!h.app.is_audio_pending());
    assert_eq!(breath_phase(&h), BreathPhase::Inhaling);
    assert_eq!(h.tone.played(), vec![0]);
}

#[tokio::test]
async fn tone_that_stays_suspended_warns_and_stays_idle() {
    let mut h = Harness::with_tone(ToneLog::suspended(false));
    open_relief_menu(&mut h);
    h.app.start_relief(ReliefExercise::AudioBreathe);

    h.app.start_breath();
    for _ in 0..100 {
        if !h.app.is_audio_pending() {
            break;
        }
        tokio::time::sleep(ms(1)).await;
        h.tick(ms(8));
    }

    assert_eq!(breath_phase(&h), BreathPhase::Idle);
    let toast = &h.app.flow().state().toast;
    assert_eq!(toast.kind, ToastKind::Warning);
    assert_eq!(toast.message, "Audio could not be initialized");
}

#[tokio::test]
async fn suspended_tone_parks_the_sequence_until_started() {
    let mut h = Harness::with_tone(ToneLog::suspended(true));
    let flow = h.app.flow_mut();
    flow.set_willingness_score(60);
    flow.fail_openness_primer_attempt();
    h.tick(ms(8));
    h.run_for(ms(1600), ms(8));

    let phase = |h: &Harness| match h.app.exercise() {
        ActiveExercise::PrimerSequence(tap) => tap.phase(),
        other => panic!("expected the sequence tap, got {other:?}"),
    };
    assert_eq!(phase(&h), SequencePhase::AwaitingStart);
    assert!(h.tone.played().is_empty());

    h.app.start_sequence();
    for _ in 0..100 {
        if !h.app.is_audio_pending() {
            break;
        }
        tokio::time::sleep(ms(1)).await;
        h.tick(ms(8));
    }
    assert_eq!(phase(&h), SequencePhase::Playing);

    h.run_for(secs(3), ms(8));
    assert_eq!(phase(&h), SequencePhase::AwaitingInput);
    assert_eq!(h.tone.played().len(), 4);
}
