//! 内存中的语音替身（用于测试与无设备环境，无需外部程序）
//!
//! ScriptedRecognizer：start 后由调用方 hear(text) 模拟一段识别结果；
//! RecordingSynthesizer：记录所有 speak 的文本，可选择保持「朗读中」直到 finish。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::AssistantError;
use crate::speech::{SpeechEvent, SpeechRecognizer, SpeechSynthesizer};

/// 脚本化语音输入
#[derive(Debug)]
pub struct ScriptedRecognizer {
    events: mpsc::UnboundedSender<SpeechEvent>,
    listening: AtomicBool,
    starts: Mutex<usize>,
}

impl ScriptedRecognizer {
    pub fn new(events: mpsc::UnboundedSender<SpeechEvent>) -> Self {
        Self {
            events,
            listening: AtomicBool::new(false),
            starts: Mutex::new(0),
        }
    }

    /// 模拟识别到一句话并结束录音
    pub fn hear(&self, text: impl Into<String>) {
        self.listening.store(false, Ordering::SeqCst);
        let _ = self.events.send(SpeechEvent::TranscriptReady(text.into()));
        let _ = self.events.send(SpeechEvent::ListeningStopped);
    }

    /// start 被调用的次数
    pub fn start_count(&self) -> usize {
        self.starts.lock().map(|n| *n).unwrap_or(0)
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    async fn start(&self) -> Result<(), AssistantError> {
        if let Ok(mut n) = self.starts.lock() {
            *n += 1;
        }
        self.listening.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        let _ = self.events.send(SpeechEvent::ListeningStopped);
    }
}

/// 记录朗读内容的语音输出
#[derive(Debug)]
pub struct RecordingSynthesizer {
    events: mpsc::UnboundedSender<SpeechEvent>,
    spoken: Mutex<Vec<String>>,
    speaking: AtomicBool,
    /// true 时 speak 后保持朗读中，直到 finish / stop
    hold: bool,
}

impl RecordingSynthesizer {
    /// speak 立即完成
    pub fn new(events: mpsc::UnboundedSender<SpeechEvent>) -> Self {
        Self {
            events,
            spoken: Mutex::new(Vec::new()),
            speaking: AtomicBool::new(false),
            hold: false,
        }
    }

    /// speak 后保持朗读中
    pub fn holding(events: mpsc::UnboundedSender<SpeechEvent>) -> Self {
        Self {
            hold: true,
            ..Self::new(events)
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// 模拟朗读自然结束
    pub fn finish(&self) {
        self.speaking.store(false, Ordering::SeqCst);
        let _ = self.events.send(SpeechEvent::SpeechEnded);
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    async fn speak(&self, text: &str) -> Result<(), AssistantError> {
        if let Ok(mut v) = self.spoken.lock() {
            v.push(text.to_string());
        }
        if self.hold {
            self.speaking.store(true, Ordering::SeqCst);
        } else {
            let _ = self.events.send(SpeechEvent::SpeechEnded);
        }
        Ok(())
    }

    async fn stop(&self) {
        if self.speaking.swap(false, Ordering::SeqCst) {
            let _ = self.events.send(SpeechEvent::SpeechEnded);
        }
    }
}
