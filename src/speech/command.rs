//! 基于外部程序的语音输入 / 输出
//!
//! 朗读：`<program> <args..> <text>`，子进程存活期间视为正在朗读；stop 时杀掉子进程。
//! 录音：`<program> <args..>`，stdout 即转写文本，带超时；stop 时杀掉子进程，已输出的文本仍作为转写结果。
//! 子进程均 kill_on_drop，后台任务结束后发送对应 SpeechEvent。

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::AssistantError;
use crate::speech::{SpeechEvent, SpeechRecognizer, SpeechSynthesizer};

/// 当前运行中的子任务：代号 + 取消令牌；代号用于避免旧任务结束时覆盖新任务的状态
#[derive(Default)]
struct ActiveJob {
    generation: AtomicU64,
    busy: AtomicBool,
    cancel: Mutex<Option<CancellationToken>>,
}

impl ActiveJob {
    /// 取消旧任务并登记新任务，返回 (代号, 令牌)
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        if let Ok(mut slot) = self.cancel.lock() {
            if let Some(old) = slot.replace(token.clone()) {
                old.cancel();
            }
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.busy.store(true, Ordering::SeqCst);
        (generation, token)
    }

    /// 任务结束；仅当仍是最新任务时清除忙碌标记
    fn finish(&self, generation: u64) -> bool {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.busy.store(false, Ordering::SeqCst);
            return true;
        }
        false
    }

    /// 取消当前任务；代号前移，被取消的任务 finish 时返回 false
    fn cancel(&self) {
        if let Ok(mut slot) = self.cancel.lock() {
            if let Some(token) = slot.take() {
                token.cancel();
            }
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.busy.store(false, Ordering::SeqCst);
    }

    /// 只通知当前任务收尾；代号不变，任务结束时照常上报
    fn request_stop(&self) {
        if let Ok(slot) = self.cancel.lock() {
            if let Some(token) = slot.as_ref() {
                token.cancel();
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

/// 调用外部朗读程序（如 espeak / say）
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    events: mpsc::UnboundedSender<SpeechEvent>,
    job: Arc<ActiveJob>,
}

impl CommandSynthesizer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        events: mpsc::UnboundedSender<SpeechEvent>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            events,
            job: Arc::new(ActiveJob::default()),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_speaking(&self) -> bool {
        self.job.is_busy()
    }

    async fn speak(&self, text: &str) -> Result<(), AssistantError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AssistantError::SpeechFailed(format!("{}: {}", self.program, e)))?;

        let (generation, token) = self.job.begin();
        let job = Arc::clone(&self.job);
        let events = self.events.clone();
        tracing::info!(program = %self.program, chars = text.chars().count(), "speaking");

        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    if let Err(e) = status {
                        tracing::warn!("speech output process failed: {}", e);
                    }
                }
                _ = token.cancelled() => {
                    let _ = child.kill().await;
                }
            }
            job.finish(generation);
            let _ = events.send(SpeechEvent::SpeechEnded);
        });
        Ok(())
    }

    async fn stop(&self) {
        self.job.cancel();
    }
}

/// stop 后等待录音程序输出剩余文本的最长时间
const STOP_GRACE: Duration = Duration::from_millis(500);

/// 调用外部录音转写程序，stdout 作为转写结果
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    events: mpsc::UnboundedSender<SpeechEvent>,
    job: Arc<ActiveJob>,
}

impl CommandRecognizer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        timeout_secs: u64,
        events: mpsc::UnboundedSender<SpeechEvent>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(timeout_secs),
            events,
            job: Arc::new(ActiveJob::default()),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_listening(&self) -> bool {
        self.job.is_busy()
    }

    async fn start(&self) -> Result<(), AssistantError> {
        if self.is_listening() {
            return Ok(());
        }
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AssistantError::SpeechFailed(format!("{}: {}", self.program, e)))?;
        let Some(mut stdout) = child.stdout.take() else {
            return Err(AssistantError::SpeechFailed(format!(
                "{}: stdout not captured",
                self.program
            )));
        };

        let (generation, token) = self.job.begin();
        let job = Arc::clone(&self.job);
        let events = self.events.clone();
        let timeout = self.timeout;
        tracing::info!(program = %self.program, "listening");

        tokio::spawn(async move {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let mut stopping = false;
            let mut timed_out = false;
            let deadline = tokio::time::sleep(timeout);
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    n = stdout.read(&mut chunk) => match n {
                        Ok(0) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        Err(e) => {
                            tracing::warn!("speech input read failed: {}", e);
                            break;
                        }
                    },
                    _ = token.cancelled(), if !stopping => {
                        // 用户停止：结束录音，保留已输出的文本
                        stopping = true;
                        let _ = child.start_kill();
                        deadline.as_mut().reset(tokio::time::Instant::now() + STOP_GRACE);
                    }
                    _ = &mut deadline => {
                        if !stopping {
                            tracing::warn!("speech input timed out after {}s", timeout.as_secs());
                            timed_out = true;
                            let _ = child.start_kill();
                        }
                        break;
                    }
                }
            }

            let keep = if stopping {
                true
            } else if timed_out {
                false
            } else {
                match child.wait().await {
                    Ok(status) if status.success() => true,
                    Ok(status) => {
                        tracing::warn!("speech input exited with {:?}", status);
                        false
                    }
                    Err(e) => {
                        tracing::warn!("speech input process failed: {}", e);
                        false
                    }
                }
            };

            if !job.finish(generation) {
                return;
            }
            let transcript = String::from_utf8_lossy(&buf).trim().to_string();
            if keep && !transcript.is_empty() {
                let _ = events.send(SpeechEvent::TranscriptReady(transcript));
            }
            let _ = events.send(SpeechEvent::ListeningStopped);
        });
        Ok(())
    }

    async fn stop(&self) {
        // 收尾由后台任务完成，ListeningStopped 由它发出
        self.job.request_stop();
    }
}
