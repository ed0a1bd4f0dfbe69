//! 核心层：错误类型、状态投影、会话转换、主控循环

pub mod error;
pub mod orchestrator;
pub mod session;
pub mod state;

pub use error::AssistantError;
pub use orchestrator::{create_assistant, create_assistant_with, Command};
pub use session::Session;
pub use state::{Language, ShellPhase, UiState};
