//! Medassist - 终端语音健康助手
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 会话状态与转换、UI 状态投影、主控循环
//! - **memory**: 对话历史（仅内存）
//! - **observability**: tracing 初始化
//! - **responder**: 症状关键词匹配与诊断建议（纯函数）
//! - **speech**: 语音输入 / 输出协作方
//! - **ui**: Ratatui TUI 界面

pub mod config;
pub mod core;
pub mod memory;
pub mod observability;
pub mod responder;
pub mod speech;
pub mod ui;

pub use responder::respond;
