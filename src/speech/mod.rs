//! 语音协作方：输入（录音转写）与输出（朗读），外部程序实现 / 不支持 / 测试替身

pub mod command;
pub mod mock;
pub mod traits;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::SpeechSection;

pub use command::{CommandRecognizer, CommandSynthesizer};
pub use mock::{RecordingSynthesizer, ScriptedRecognizer};
pub use traits::{
    NullSynthesizer, SpeechEvent, SpeechRecognizer, SpeechSynthesizer, UnsupportedRecognizer,
};

/// 语音协作方组合：输入、输出与事件接收端
pub struct SpeechStack {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub events: mpsc::UnboundedReceiver<SpeechEvent>,
}

/// 根据配置选择语音实现：配置了程序则用外部程序，否则视为平台不支持
pub fn build_speech(cfg: &SpeechSection) -> SpeechStack {
    let (tx, rx) = mpsc::unbounded_channel();

    let recognizer: Arc<dyn SpeechRecognizer> = match &cfg.input.command {
        Some(program) if !program.trim().is_empty() => {
            tracing::info!("Speech input via {}", program);
            Arc::new(CommandRecognizer::new(
                program.clone(),
                cfg.input.args.clone(),
                cfg.input.timeout_secs,
                tx.clone(),
            ))
        }
        _ => {
            tracing::info!("No speech input command configured, voice input unsupported");
            Arc::new(UnsupportedRecognizer)
        }
    };

    let synthesizer: Arc<dyn SpeechSynthesizer> = match &cfg.output.command {
        Some(program) if !program.trim().is_empty() => {
            tracing::info!("Speech output via {}", program);
            Arc::new(CommandSynthesizer::new(
                program.clone(),
                cfg.output.args.clone(),
                tx,
            ))
        }
        _ => {
            tracing::info!("No speech output command configured, replies are not spoken");
            Arc::new(NullSynthesizer)
        }
    };

    SpeechStack {
        recognizer,
        synthesizer,
        events: rx,
    }
}
