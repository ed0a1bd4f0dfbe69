//! 助手编排器：主控循环
//!
//! 负责：根据配置创建语音协作方与 Session，建立 cmd/state 两个通道，
//! 并在后台任务中消费用户命令与语音事件，驱动会话转换并发布 UI 状态。

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::config::AppConfig;
use crate::core::{Language, Session, UiState};
use crate::speech::{build_speech, SpeechEvent, SpeechRecognizer, SpeechSynthesizer};

/// 从 UI 发往编排器的用户命令
#[derive(Debug, Clone)]
pub enum Command {
    /// 提交键入的文本
    Submit(String),
    /// 麦克风开关
    ToggleListening,
    /// 朗读开关
    ToggleSpeech,
    /// 切换界面语言（会重新开始对话）
    SetLanguage(Language),
    /// 重新开始对话
    Clear,
    /// 退出应用
    Quit,
}

/// 创建助手运行时：语音实现取自配置
pub fn create_assistant(
    cfg: &AppConfig,
) -> (mpsc::UnboundedSender<Command>, watch::Receiver<UiState>) {
    let speech = build_speech(&cfg.speech);
    create_assistant_with(cfg, speech.recognizer, speech.synthesizer, speech.events)
}

/// 创建助手运行时：返回命令发送端、状态接收端；后台任务消费命令与语音事件并更新 state。
pub fn create_assistant_with(
    cfg: &AppConfig,
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mut speech_rx: mpsc::UnboundedReceiver<SpeechEvent>,
) -> (mpsc::UnboundedSender<Command>, watch::Receiver<UiState>) {
    // 两通道：UI -> Core 命令；Core -> UI 状态快照
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(UiState::default());

    let mut session = Session::new(&cfg.shell, recognizer, synthesizer, state_tx);

    tokio::spawn(async move {
        session.start().await;
        loop {
            tokio::select! {
                Some(cmd) = cmd_rx.recv() => {
                    tracing::debug!(session = %session.id(), ?cmd, "command");
                    match cmd {
                        Command::Submit(input) => {
                            session.submit(&input).await;
                        }
                        Command::ToggleListening => session.toggle_listening().await,
                        Command::ToggleSpeech => session.toggle_speech(),
                        Command::SetLanguage(lang) => session.set_language(lang).await,
                        Command::Clear => session.start().await,
                        Command::Quit => break,
                    }
                }
                Some(event) = speech_rx.recv() => {
                    session.on_speech_event(event).await;
                }
                else => break,  // 所有通道已关闭，退出循环
            }
        }
        tracing::info!(session = %session.id(), "assistant loop exited");
    });

    (cmd_tx, state_rx)
}
