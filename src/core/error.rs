//! 助手错误类型
//!
//! 应答器本身是全函数、没有错误；这里只覆盖语音协作方。语音错误对用户是非致命提示，文字输入始终可用。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Speech {0} is not supported on this platform")]
    SpeechUnsupported(&'static str),

    #[error("Speech failed: {0}")]
    SpeechFailed(String),
}
