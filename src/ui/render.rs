//! 界面渲染
//!
//! 根据 UiState 与 input_buffer 绘制：顶部为标题与控件栏（语言 / 朗读 / 麦克风 / 发送），
//! 主体为对话历史（按角色着色、按宽度换行），底部为输入框、语音提示与快捷键提示。

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::core::{Language, ShellPhase, UiState};
use crate::memory::Role;

/// 输入区焦点
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputFocus {
    #[default]
    Input,
    Language,
    Speaker,
    Mic,
    Send,
}

impl InputFocus {
    pub fn next(self) -> Self {
        match self {
            InputFocus::Input => InputFocus::Language,
            InputFocus::Language => InputFocus::Speaker,
            InputFocus::Speaker => InputFocus::Mic,
            InputFocus::Mic => InputFocus::Send,
            InputFocus::Send => InputFocus::Input,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            InputFocus::Input => InputFocus::Send,
            InputFocus::Language => InputFocus::Input,
            InputFocus::Speaker => InputFocus::Language,
            InputFocus::Mic => InputFocus::Speaker,
            InputFocus::Send => InputFocus::Mic,
        }
    }
}

/// 输入区本地状态（焦点）
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub focus: InputFocus,
}

/// 标题栏状态文字：录音 > 朗读 > 思考 > 空闲
pub fn status_label(state: &UiState) -> &'static str {
    if state.listening {
        "Listening…"
    } else if state.speaking {
        "Speaking…"
    } else if state.phase == ShellPhase::Thinking {
        "Thinking…"
    } else {
        "Ready"
    }
}

/// 将内容按宽度换行，支持 UTF-8（按字符数，避免在 UTF-8 中间截断）
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    for para in s.split('\n') {
        let mut line = String::new();
        for ch in para.chars() {
            if line.chars().count() >= width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
        lines.push(line);
    }
    lines
}

fn control<'a>(label: String, focused: bool, active: bool) -> Span<'a> {
    let mut style = if active {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    Span::styled(format!(" {} ", label), style)
}

/// 绘制一帧；将 (总行数, 可视高度) 写入 out 供外部 clamp 滚动
pub fn draw(
    f: &mut Frame,
    title: &str,
    state: &UiState,
    input_buffer: &str,
    conversation_scroll: usize,
    out: &mut (usize, usize),
    input_state: &InputState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(f.area());

    // 顶部：标题 + 控件栏
    let focus = input_state.focus;
    let speaker = if state.speech_enabled { "🔊 On" } else { "🔇 Off" };
    let mic = if state.listening { "🎤 Stop" } else { "🎤 Mic" };
    let controls = Line::from(vec![
        control(
            format!("◀ {} ▶", state.language.label()),
            focus == InputFocus::Language,
            true,
        ),
        Span::raw(" "),
        control(speaker.to_string(), focus == InputFocus::Speaker, state.speech_enabled),
        Span::raw(" "),
        control(
            mic.to_string(),
            focus == InputFocus::Mic,
            state.voice_supported,
        ),
        Span::raw(" "),
        control("Send ➤".to_string(), focus == InputFocus::Send, !state.input_locked),
    ]);
    let header = Paragraph::new(controls).block(
        Block::default()
            .title(format!(" {} │ Voice-enabled diagnosis support ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, chunks[0]);

    // 主体：对话历史
    let conv_area = chunks[1];
    let content_width = conv_area.width.saturating_sub(2).saturating_sub(1) as usize; // 边框 + 滚动条
    let block = Block::default()
        .title(format!(" {} ", status_label(state)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut text_lines: Vec<Line> = Vec::new();
    for (idx, m) in state.history.iter().enumerate() {
        if idx > 0 {
            text_lines.push(Line::from(Span::raw("")));
        }
        let (prefix, color) = match m.role {
            Role::User => ("You ", Color::Cyan),
            Role::Assistant => ("Doc ", Color::Green),
        };
        let wrapped = wrap_text(&m.content, content_width.saturating_sub(4).max(20));
        for (i, line) in wrapped.into_iter().enumerate() {
            let pref = if i == 0 { prefix } else { "    " };
            text_lines.push(Line::from(vec![
                Span::styled(pref, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(line),
            ]));
        }
    }

    let content_height = conv_area.height.saturating_sub(2) as usize; // 边框
    let total_lines = text_lines.len();
    let max_scroll = total_lines.saturating_sub(content_height);
    let scroll_offset = conversation_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(text_lines))
        .block(block)
        .scroll((scroll_offset as u16, 0));
    f.render_widget(paragraph, conv_area);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .position(scroll_offset)
            .viewport_content_length(content_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("█")
            .track_symbol(Some("░"));
        f.render_stateful_widget(scrollbar, conv_area, &mut scrollbar_state);
    }

    // 底部：输入框
    let input_prompt = if state.listening {
        " Listening… ".to_string()
    } else if state.input_locked {
        " Waiting for reply… ".to_string()
    } else {
        " Type your symptoms or press the mic ".to_string()
    };

    let (hint, hint_color) = match (&state.notice, state.voice_supported) {
        (Some(notice), _) => (format!(" {} ", notice), Color::Red),
        (None, false) => (
            " Voice input not available │ Enter send │ Tab focus │ Ctrl+S speaker │ Ctrl+L restart │ Esc quit ".to_string(),
            Color::DarkGray,
        ),
        (None, true) => (
            " Enter send │ Tab focus │ Ctrl+R mic │ Ctrl+S speaker │ Ctrl+L restart │ Esc quit ".to_string(),
            Color::DarkGray,
        ),
    };

    let border_color = if state.notice.is_some() {
        Color::Red
    } else if focus == InputFocus::Input {
        Color::Blue
    } else {
        Color::DarkGray
    };

    let input_block = Block::default()
        .title(input_prompt)
        .title_bottom(Line::from(Span::styled(hint, Style::default().fg(hint_color))))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let input = Paragraph::new(input_buffer)
        .block(input_block)
        .wrap(Wrap { trim: false })
        .style(if state.input_locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        });

    f.render_widget(input, chunks[2]);

    out.0 = total_lines;
    out.1 = content_height;
}

/// 语言下拉的上一项 / 下一项（到头不循环）
pub fn step_language(current: Language, forward: bool) -> Language {
    let idx = current.index();
    let next = if forward {
        (idx + 1).min(Language::ALL.len() - 1)
    } else {
        idx.saturating_sub(1)
    };
    Language::ALL[next]
}
