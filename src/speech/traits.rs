//! 语音协作方抽象
//!
//! 语音输入（录音 → 文本）与语音输出（文本 → 朗读）各自可独立启停，并对外报告忙碌状态；
//! 异步结果（转写完成、录音结束、朗读结束）通过 SpeechEvent 通道推送给会话。

use async_trait::async_trait;

use crate::core::AssistantError;

/// 语音协作方推送给会话的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// 一段录音已转写为文本（录音可能尚未结束）
    TranscriptReady(String),
    /// 录音结束（正常完成、超时或被 stop）
    ListeningStopped,
    /// 朗读结束（正常完成或被 stop）
    SpeechEnded,
}

/// 语音输入：start 开始录音，stop 结束；转写结果经事件通道送达
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool;

    fn is_listening(&self) -> bool;

    async fn start(&self) -> Result<(), AssistantError>;

    /// 结束录音；已识别的文本先以 TranscriptReady 送达，随后发送 ListeningStopped
    async fn stop(&self);
}

/// 语音输出：speak 朗读文本，stop 中断
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_supported(&self) -> bool;

    fn is_speaking(&self) -> bool;

    async fn speak(&self, text: &str) -> Result<(), AssistantError>;

    async fn stop(&self);
}

/// 平台不支持语音输入时使用
#[derive(Debug, Default)]
pub struct UnsupportedRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn is_listening(&self) -> bool {
        false
    }

    async fn start(&self) -> Result<(), AssistantError> {
        Err(AssistantError::SpeechUnsupported("input"))
    }

    async fn stop(&self) {}
}

/// 平台不支持语音输出时使用：不发声
#[derive(Debug, Default)]
pub struct NullSynthesizer;

#[async_trait]
impl SpeechSynthesizer for NullSynthesizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn is_speaking(&self) -> bool {
        false
    }

    async fn speak(&self, _text: &str) -> Result<(), AssistantError> {
        Err(AssistantError::SpeechUnsupported("output"))
    }

    async fn stop(&self) {}
}
