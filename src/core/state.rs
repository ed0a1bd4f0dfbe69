//! 状态定义：UiState 投影与界面语言
//!
//! UI 只持有轻量的 UiState（阶段、历史、语音标志、提示）；完整会话状态由 Session 维护并投影到 UiState。

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::memory::Turn;

/// UI 看到的「投影」状态，轻量且易于渲染
#[derive(Clone, Debug, Serialize)]
pub struct UiState {
    pub phase: ShellPhase,
    pub history: Vec<Turn>,
    pub language: Language,
    pub speech_enabled: bool,
    pub listening: bool,
    pub speaking: bool,
    pub voice_supported: bool,
    /// 非致命提示（如语音不可用）
    pub notice: Option<String>,
    pub input_locked: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            phase: ShellPhase::Idle,
            history: Vec::new(),
            language: Language::default(),
            speech_enabled: true,
            listening: false,
            speaking: false,
            voice_supported: false,
            notice: None,
            input_locked: false,
        }
    }
}

/// 会话阶段（UI 投影用）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ShellPhase {
    Idle,
    Thinking,
}

/// 界面语言：只影响显示，不参与症状匹配
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Zh,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Zh,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Zh => "zh",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::Zh => "中文",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| format!("Unknown language: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("FR".parse::<Language>(), Ok(Language::Fr));
        assert_eq!(" zh ".parse::<Language>(), Ok(Language::Zh));
        assert!("xx".parse::<Language>().is_err());
        assert_eq!(Language::De.index(), 3);
    }
}
