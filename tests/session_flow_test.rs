//! 会话集成测试：通过公开 API 驱动 Session / 编排器，语音用脚本化替身

use std::sync::Arc;
use std::time::Duration;

use medassist::config::{AppConfig, ShellSection};
use medassist::core::{create_assistant_with, Command, Language, Session, ShellPhase, UiState};
use medassist::memory::{Role, Turn};
use medassist::responder::tables::{EMERGENCY_TEXT, GREETING_TEXT};
use medassist::speech::{
    build_speech, RecordingSynthesizer, ScriptedRecognizer, SpeechEvent, SpeechRecognizer,
};
use tokio::sync::{mpsc, watch};

fn shell() -> ShellSection {
    ShellSection {
        think_delay_ms: 0,
        ..ShellSection::default()
    }
}

async fn wait_until<F>(rx: &mut watch::Receiver<UiState>, pred: F) -> UiState
where
    F: FnMut(&UiState) -> bool,
{
    let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred))
        .await
        .expect("state not reached in time")
        .expect("assistant loop closed");
    UiState::clone(&state)
}

async fn drain(session: &mut Session, rx: &mut mpsc::UnboundedReceiver<SpeechEvent>) {
    while let Ok(ev) = rx.try_recv() {
        session.on_speech_event(ev).await;
    }
}

#[tokio::test]
async fn test_typed_and_spoken_turns_share_history() {
    let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
    let rec = Arc::new(ScriptedRecognizer::new(ev_tx.clone()));
    let synth = Arc::new(RecordingSynthesizer::new(ev_tx));
    let (state_tx, state_rx) = watch::channel(UiState::default());
    let mut session = Session::new(&shell(), rec.clone(), synth.clone(), state_tx);

    session.start().await;
    assert_eq!(session.turns(), &[Turn::assistant(GREETING_TEXT)]);
    drain(&mut session, &mut ev_rx).await;

    let reply = session.submit("my head aches and I feel tired").await;
    assert!(reply.is_some());
    drain(&mut session, &mut ev_rx).await;

    session.toggle_listening().await;
    assert!(state_rx.borrow().listening);
    assert!(state_rx.borrow().input_locked);

    rec.hear("I have chest pain");
    drain(&mut session, &mut ev_rx).await;

    let turns = session.turns();
    assert_eq!(turns.len(), 5);
    assert_eq!(turns[3], Turn::user("I have chest pain"));
    assert_eq!(turns[4], Turn::assistant(EMERGENCY_TEXT));

    let state = state_rx.borrow().clone();
    assert_eq!(state.history.len(), 5);
    assert_eq!(state.phase, ShellPhase::Idle);
    assert!(!state.listening);
    assert!(!state.input_locked);
    assert_eq!(
        synth.spoken().last().map(String::as_str),
        Some(EMERGENCY_TEXT)
    );
}

#[tokio::test]
async fn test_stop_without_transcript_adds_no_turn() {
    let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
    let rec = Arc::new(ScriptedRecognizer::new(ev_tx.clone()));
    let synth = Arc::new(RecordingSynthesizer::new(ev_tx));
    let (state_tx, _state_rx) = watch::channel(UiState::default());
    let mut session = Session::new(&shell(), rec.clone(), synth, state_tx);
    session.start().await;

    session.toggle_listening().await;
    assert!(rec.is_listening());
    session.toggle_listening().await;
    assert!(!rec.is_listening());
    drain(&mut session, &mut ev_rx).await;

    assert_eq!(session.turns().len(), 1);
    assert_eq!(rec.start_count(), 1);
}

#[tokio::test]
async fn test_session_without_voice_reports_notice() {
    let speech = build_speech(&AppConfig::default().speech);
    let (state_tx, state_rx) = watch::channel(UiState::default());
    let mut session = Session::new(&shell(), speech.recognizer, speech.synthesizer, state_tx);
    session.start().await;

    session.toggle_listening().await;
    let state = state_rx.borrow().clone();
    assert!(!state.voice_supported);
    assert!(!state.listening);
    assert!(state.notice.is_some());
    assert_eq!(state.history.len(), 1);
}

#[tokio::test]
async fn test_assistant_loop_handles_voice_and_language_restart() {
    let (ev_tx, ev_rx) = mpsc::unbounded_channel();
    let rec = Arc::new(ScriptedRecognizer::new(ev_tx.clone()));
    let synth = Arc::new(RecordingSynthesizer::new(ev_tx));
    let mut cfg = AppConfig::default();
    cfg.shell = shell();
    let (cmd_tx, mut state_rx) = create_assistant_with(&cfg, rec.clone(), synth, ev_rx);

    wait_until(&mut state_rx, |s| s.history.len() == 1).await;
    cmd_tx.send(Command::ToggleListening).unwrap();
    wait_until(&mut state_rx, |s| s.listening).await;

    rec.hear("sore throat and runny nose");
    let state = wait_until(&mut state_rx, |s| s.history.len() == 3).await;
    assert_eq!(state.history[1].role, Role::User);
    assert_eq!(state.history[1].content, "sore throat and runny nose");
    assert!(state.history[2].content.contains("common cold"));

    cmd_tx.send(Command::SetLanguage(Language::Fr)).unwrap();
    let state = wait_until(&mut state_rx, |s| s.language == Language::Fr).await;
    assert_eq!(state.history, vec![Turn::assistant(GREETING_TEXT)]);

    cmd_tx.send(Command::Quit).unwrap();
}
