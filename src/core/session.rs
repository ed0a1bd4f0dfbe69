//! 会话：对话历史与界面开关的唯一所有者
//!
//! 所有状态变化都经由这里定义的转换（start / submit / set_language / toggle_*/ on_speech_event），
//! 每次转换后把投影后的 UiState 发布到 watch 通道。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use crate::config::ShellSection;
use crate::core::{AssistantError, Language, ShellPhase, UiState};
use crate::memory::{Conversation, Turn};
use crate::responder::Responder;
use crate::speech::{SpeechEvent, SpeechRecognizer, SpeechSynthesizer};

pub const VOICE_UNSUPPORTED_NOTICE: &str =
    "Speech recognition is not supported here. Configure [speech.input] to enable voice input.";

pub struct Session {
    id: Uuid,
    responder: Responder,
    conversation: Conversation,
    language: Language,
    speech_enabled: bool,
    phase: ShellPhase,
    notice: Option<String>,
    /// 录音期间收到的转写文本，录音结束时提交
    pending_transcript: Option<String>,
    think_delay: Duration,
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    state_tx: watch::Sender<UiState>,
}

impl Session {
    pub fn new(
        shell: &ShellSection,
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        state_tx: watch::Sender<UiState>,
    ) -> Self {
        let language = shell.language.parse().unwrap_or_else(|e| {
            tracing::warn!("{}, falling back to English", e);
            Language::En
        });
        Self {
            id: Uuid::new_v4(),
            responder: Responder::default(),
            conversation: Conversation::new(),
            language,
            speech_enabled: shell.speech_enabled,
            phase: ShellPhase::Idle,
            notice: None,
            pending_transcript: None,
            think_delay: Duration::from_millis(shell.think_delay_ms),
            recognizer,
            synthesizer,
            state_tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn turns(&self) -> &[Turn] {
        self.conversation.turns()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// 投影为 UI 状态
    pub fn snapshot(&self) -> UiState {
        let listening = self.recognizer.is_listening();
        UiState {
            phase: self.phase,
            history: self.conversation.turns().to_vec(),
            language: self.language,
            speech_enabled: self.speech_enabled,
            listening,
            speaking: self.synthesizer.is_speaking(),
            voice_supported: self.recognizer.is_supported(),
            notice: self.notice.clone(),
            input_locked: self.phase == ShellPhase::Thinking || listening,
        }
    }

    fn publish(&self) {
        let _ = self.state_tx.send(self.snapshot());
    }

    /// 开始新对话：历史替换为一条问候，语音开启时延迟后朗读
    pub async fn start(&mut self) {
        let greeting = self.responder.respond("hello", &[]);
        self.conversation = Conversation::new();
        self.conversation.push(Turn::assistant(greeting.clone()));
        self.pending_transcript = None;
        tracing::info!(session = %self.id, language = self.language.code(), "conversation started");
        self.publish();

        if self.speech_enabled {
            self.think().await;
            self.speak(&greeting).await;
            self.publish();
        }
    }

    /// 切换语言：记录并重新开始对话
    pub async fn set_language(&mut self, language: Language) {
        self.language = language;
        self.start().await;
    }

    /// 提交一轮用户输入；空白输入被忽略。返回助手回复
    pub async fn submit(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.conversation.push(Turn::user(text));
        self.phase = ShellPhase::Thinking;
        self.publish();

        self.think().await;

        let assessment = self.responder.assess(text, self.conversation.turns());
        tracing::info!(
            session = %self.id,
            kind = assessment.kind(),
            turns = self.conversation.turns().len(),
            "reply"
        );
        let reply = assessment.into_reply();
        self.conversation.push(Turn::assistant(reply.clone()));
        self.phase = ShellPhase::Idle;
        self.publish();

        if self.speech_enabled && !self.synthesizer.is_speaking() {
            self.speak(&reply).await;
            self.publish();
        }
        Some(reply)
    }

    pub fn toggle_speech(&mut self) {
        self.speech_enabled = !self.speech_enabled;
        tracing::debug!(enabled = self.speech_enabled, "speech output toggled");
        self.publish();
    }

    /// 麦克风开关：不支持时仅给出提示；录音前先停止朗读
    pub async fn toggle_listening(&mut self) {
        if !self.recognizer.is_supported() {
            self.notice = Some(VOICE_UNSUPPORTED_NOTICE.to_string());
            self.publish();
            return;
        }

        if self.recognizer.is_listening() {
            self.recognizer.stop().await;
        } else {
            if self.synthesizer.is_speaking() {
                self.synthesizer.stop().await;
            }
            self.pending_transcript = None;
            match self.recognizer.start().await {
                Ok(()) => self.notice = None,
                Err(e) => self.report(e),
            }
        }
        self.publish();
    }

    /// 处理语音协作方事件；录音结束且有转写时走与键入相同的提交路径
    pub async fn on_speech_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::TranscriptReady(text) => {
                tracing::debug!(chars = text.chars().count(), "transcript ready");
                self.pending_transcript = Some(text);
            }
            SpeechEvent::ListeningStopped => {
                self.publish();
                if let Some(text) = self.pending_transcript.take() {
                    self.submit(&text).await;
                }
            }
            SpeechEvent::SpeechEnded => self.publish(),
        }
    }

    async fn think(&self) {
        if !self.think_delay.is_zero() {
            tokio::time::sleep(self.think_delay).await;
        }
    }

    async fn speak(&mut self, text: &str) {
        if !self.synthesizer.is_supported() {
            return;
        }
        if let Err(e) = self.synthesizer.speak(text).await {
            self.report(e);
        }
    }

    fn report(&mut self, err: AssistantError) {
        tracing::warn!(session = %self.id, "speech: {}", err);
        self.notice = Some(err.to_string());
    }
}
