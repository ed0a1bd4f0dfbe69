//! Medassist 行式 REPL
//!
//! 不进入全屏模式，逐行读取 stdin，与 TUI 共用同一套会话转换；适合脚本与不支持原始模式的终端。
//!
//! 斜杠命令：/mic /speech /lang <en|es|fr|de|zh> /clear /quit
//!
//! 启动: cargo run --bin medassist-repl

use anyhow::Context;
use medassist::config::load_config_or_default;
use medassist::core::{Language, Session, UiState};
use medassist::memory::Role;
use medassist::observability;
use medassist::speech::build_speech;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// 打印 printed 之后新增的助手消息，返回新的已打印条数
fn print_new_turns(session: &Session, printed: usize) -> usize {
    let turns = session.turns();
    for turn in turns.iter().skip(printed) {
        if turn.role == Role::Assistant {
            println!("\n{}\n", turn.content);
        }
    }
    turns.len()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config_or_default(None);
    let speech = build_speech(&cfg.speech);
    let mut speech_rx = speech.events;
    let (state_tx, _state_rx) = watch::channel(UiState::default());
    let mut session = Session::new(&cfg.shell, speech.recognizer, speech.synthesizer, state_tx);

    println!("{} ({}) - type /quit to exit", cfg.app.name, session.language());
    session.start().await;
    let mut printed = print_new_turns(&session, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let line = line.trim();
                match line.split_once(' ').map_or((line, ""), |(c, a)| (c, a.trim())) {
                    ("/quit", _) | ("/exit", _) => break,
                    ("/clear", _) => {
                        session.start().await;
                        printed = 0;
                    }
                    ("/speech", _) => {
                        session.toggle_speech();
                        println!("speech output: {}", if session.speech_enabled() { "on" } else { "off" });
                    }
                    ("/mic", _) => {
                        session.toggle_listening().await;
                        if let Some(notice) = session.notice() {
                            println!("{}", notice);
                        }
                    }
                    ("/lang", code) => match code.parse::<Language>() {
                        Ok(lang) => {
                            session.set_language(lang).await;
                            printed = 0;
                        }
                        Err(e) => println!("{}", e),
                    },
                    _ => {
                        session.submit(line).await;
                    }
                }
            }
            Some(event) = speech_rx.recv() => {
                session.on_speech_event(event).await;
            }
        }
        printed = print_new_turns(&session, printed);
    }

    Ok(())
}
