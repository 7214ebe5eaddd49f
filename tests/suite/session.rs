//! Saved-session round trips and config-driven startup.

use std::fs;
use std::sync::Arc;

use reframe_engine::{
    ActiveExercise, App, BreathPhase, FrameId, Ports, ReframeConfig, ReliefExercise, Stage, Theme,
    ThreadRandom,
};

use crate::common::{ClipRecorder, Harness, SpeechLog, ToneLog, ms};

fn anchor_one(h: &mut Harness, completion: &str) {
    let flow = h.app.flow_mut();
    flow.set_willingness_score(80);
    flow.update_frame_completion(FrameId::new(3), completion);
    flow.update_frame_rating(FrameId::new(3), 4);
    flow.commit_and_anchor_frame().unwrap();
    h.tick(ms(8));
}

#[test]
fn journal_and_theme_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut first = Harness::with_session(path.clone());
    anchor_one(&mut first, "I keep showing up");
    first.app.flow_mut().toggle_theme();
    first.tick(ms(8));
    assert!(path.exists());

    let second = Harness::with_session(path);
    let state = second.app.flow().state();
    assert_eq!(state.theme, Theme::Light);
    assert_eq!(state.journal.len(), 1);
    assert_eq!(state.journal[0].completion, "I keep showing up");
    assert_eq!(state.current_stage, Stage::WillingnessCalibration);
    assert!(state.workshop.anchored_frame.is_none());
}

#[test]
fn saved_file_holds_only_the_journal_and_theme() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut h = Harness::with_session(path.clone());
    anchor_one(&mut h, "this passes");
    h.app.flow_mut().set_clarity_text("private thoughts");

    h.app.shutdown();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let mut keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["journal", "theme", "version"]);
    assert_eq!(raw["theme"], "dark");
    assert_eq!(raw["journal"][0]["completion"], "this passes");
    assert!(!fs::read_to_string(&path).unwrap().contains("private thoughts"));
}

#[test]
fn corrupt_session_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{ not json").unwrap();

    let h = Harness::with_session(path);

    let state = h.app.flow().state();
    assert!(state.journal.is_empty());
    assert_eq!(state.theme, Theme::Dark);
}

#[test]
fn session_from_a_newer_version_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, r#"{"version": 99, "theme": "light", "journal": []}"#).unwrap();

    let h = Harness::with_session(path);

    assert_eq!(h.app.flow().state().theme, Theme::Dark);
}

#[test]
fn reset_does_not_touch_the_saved_journal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut h = Harness::with_session(path.clone());
    anchor_one(&mut h, "one");
    h.app.flow_mut().finish_module_and_reset();
    h.tick(ms(8));
    anchor_one(&mut h, "two");

    let reopened = Harness::with_session(path);
    let completions: Vec<_> = reopened
        .app
        .flow()
        .state()
        .journal
        .iter()
        .map(|entry| entry.completion.clone())
        .collect();
    assert_eq!(completions, ["one", "two"]);
}

#[test]
fn config_file_shapes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[app]
theme = "light"
ascii_only = true

[breath]
total_secs = 8
inhale_secs = 2
hold_secs = 2
exhale_secs = 2
rest_secs = 2
chime_only = true

[toast]
duration_ms = 500
"#,
    )
    .unwrap();

    let config = ReframeConfig::load_from(&path).unwrap().unwrap();
    let tone = ToneLog::ready();
    let speech = SpeechLog::new();
    let ports = Ports {
        tone: tone.clone(),
        speech: speech.clone(),
        recorder: Arc::new(ClipRecorder::default()),
    };
    let mut app = App::with_parts(config, ports, Box::new(ThreadRandom), None);

    assert_eq!(app.flow().state().theme, Theme::Light);
    assert!(app.ui_options().ascii_only);
    assert!(app.chime_only());

    let flow = app.flow_mut();
    flow.set_willingness_score(75);
    flow.proceed_from_workshop();
    flow.set_clarity_text("ok");
    flow.proceed_from_clarity();
    app.start_relief(ReliefExercise::AudioBreathe);
    app.start_breath();

    for _ in 0..410 {
        app.tick(ms(20));
    }
    let ActiveExercise::Breath(cue) = app.exercise() else {
        panic!("expected breath cue");
    };
    assert_eq!(cue.phase(), BreathPhase::Idle);
    assert_eq!(cue.prompt(), "Session complete. Well done.");
    assert_eq!(tone.played(), vec![0, 1, 2, 3]);
    assert!(speech.spoken().is_empty());

    for _ in 0..100 {
        app.tick(ms(20));
    }
    assert_eq!(app.flow().state().current_stage, Stage::ReinforcementBecoming);
    assert!(!app.flow().state().toast.visible);
}

#[test]
fn missing_config_file_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(
        ReframeConfig::load_from(&dir.path().join("absent.toml"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn invalid_breath_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[breath]\ntotal_secs = 5\n").unwrap();

    assert!(ReframeConfig::load_from(&path).is_err());
}
