//! 对话记忆：会话期内的 Turn 序列（仅驻留内存，不持久化）

pub mod conversation;

pub use conversation::{Conversation, Role, Turn};
