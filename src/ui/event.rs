//! 事件处理
//!
//! 轮询 crossterm 键盘事件，将 Ctrl+R/Ctrl+S/Ctrl+L/Ctrl+Q/Esc 转为 Command（麦克风/朗读/重开/退出），
//! 其余按键交给 run_app 拼 input_buffer，Enter 时 send_submit。

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::core::Command;

/// 应用事件：来自快捷键的 Command 或原始 KeyEvent
#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    Key(KeyEvent),
}

/// 事件处理器：持有 cmd_tx，poll 时读键盘并返回 AppEvent，send 发送命令
pub struct EventHandler {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl EventHandler {
    pub fn new(cmd_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { cmd_tx }
    }

    pub fn poll(&self) -> anyhow::Result<Option<AppEvent>> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(self.handle_key(key)));
                }
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent) -> AppEvent {
        match shortcut(&key) {
            Some(Command::Quit) => AppEvent::Command(Command::Quit),
            Some(cmd) => {
                self.send(cmd.clone());
                AppEvent::Command(cmd)
            }
            None => AppEvent::Key(key),
        }
    }

    pub fn send(&self, cmd: Command) {
        let _ = self.cmd_tx.send(cmd);
    }

    pub fn send_submit(&self, input: String) {
        self.send(Command::Submit(input));
    }
}

/// 快捷键映射
fn shortcut(key: &KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('r') if ctrl => Some(Command::ToggleListening),
        KeyCode::Char('s') if ctrl => Some(Command::ToggleSpeech),
        KeyCode::Char('l') if ctrl => Some(Command::Clear),
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
