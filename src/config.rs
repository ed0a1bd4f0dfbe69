//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `MEDASSIST__*` 覆盖（双下划线表示嵌套，如 `MEDASSIST__SHELL__THINK_DELAY_MS=0`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub shell: ShellSection,
    #[serde(default)]
    pub speech: SpeechSection,
}

/// [app] 段：应用名、日志文件
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// TUI 模式下日志写入的文件
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_file: default_log_file(),
        }
    }
}

fn default_app_name() -> String {
    "AI Health Assistant".to_string()
}

/// TUI 占用终端，日志默认写到当前目录下的 medassist.log
pub fn default_log_file() -> PathBuf {
    PathBuf::from("medassist.log")
}

/// [shell] 段：模拟思考延迟、语音播报开关、界面语言
#[derive(Debug, Clone, Deserialize)]
pub struct ShellSection {
    /// 回复前的延迟（毫秒），0 表示不延迟
    #[serde(default = "default_think_delay_ms")]
    pub think_delay_ms: u64,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    /// 界面语言（仅显示，不影响症状匹配）
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            think_delay_ms: default_think_delay_ms(),
            speech_enabled: default_speech_enabled(),
            language: default_language(),
        }
    }
}

fn default_think_delay_ms() -> u64 {
    500
}

fn default_speech_enabled() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

/// [speech] 段：语音输入 / 输出外部程序
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SpeechSection {
    #[serde(default)]
    pub output: SpeechOutputSection,
    #[serde(default)]
    pub input: SpeechInputSection,
}

/// [speech.output]：朗读程序（文本作为最后一个参数追加），未设置则不支持语音输出
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SpeechOutputSection {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

/// [speech.input]：录音转写程序（stdout 即转写结果），未设置则不支持语音输入
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechInputSection {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// 单次录音转写超时（秒）
    #[serde(default = "default_input_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechInputSection {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: default_input_timeout_secs(),
        }
    }
}

fn default_input_timeout_secs() -> u64 {
    30
}

/// 从 config 目录加载配置，环境变量 MEDASSIST__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 MEDASSIST__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("MEDASSIST")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 加载失败时回退默认配置并告警
pub fn load_config_or_default(config_path: Option<PathBuf>) -> AppConfig {
    load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.shell.think_delay_ms, 500);
        assert!(cfg.shell.speech_enabled);
        assert_eq!(cfg.shell.language, "en");
        assert!(cfg.speech.output.command.is_none());
        assert_eq!(cfg.speech.input.timeout_secs, 30);
        assert_eq!(cfg.app.log_file, PathBuf::from("medassist.log"));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[shell]
think_delay_ms = 0
language = "fr"

[speech.output]
command = "espeak"
args = ["-s", "150"]
"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.shell.think_delay_ms, 0);
        assert_eq!(cfg.shell.language, "fr");
        assert!(cfg.shell.speech_enabled);
        assert_eq!(cfg.speech.output.command.as_deref(), Some("espeak"));
        assert_eq!(cfg.speech.output.args, vec!["-s", "150"]);
        assert!(cfg.speech.input.command.is_none());
        assert_eq!(cfg.app.log_file, default_log_file());
    }
}
