//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - ControllerClient for the conversation core
//! - DisplayState for rendering
//!
//! The App converts terminal events to SurfaceEvents, sends them to the
//! embedded Controller, receives ControllerMessages, and renders based on
//! DisplayState. It holds no conversation logic.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use rand::seq::SliceRandom;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use unicode_width::UnicodeWidthStr;

use nextgen_core::NotifyLevel;

use crate::controller_client::ControllerClient;
use crate::display::{DisplayRole, DisplayState};
use crate::theme;

/// Input box height (lines) including its border
const INPUT_HEIGHT: u16 = 3;

/// Frame tick interval
const TICK: Duration = Duration::from_millis(33);

/// Quick goodbye lines, used when the controller doesn't configure one
const QUICK_GOODBYES: &[&str] = &[
    "Goodbye!",
    "See you next time!",
    "Take care!",
    "Thanks for chatting!",
    "Until next time!",
];

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,
    /// Client for communicating with the embedded Controller
    controller: ControllerClient,
    /// Display state derived from ControllerMessages
    display: DisplayState,
    /// User input buffer
    input_buffer: String,
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered transcript lines (for scroll bounds)
    total_lines: usize,
}

impl App {
    /// Create a new App instance
    pub fn new() -> Self {
        Self {
            running: true,
            goodbye_message: None,
            controller: ControllerClient::new(),
            display: DisplayState::new(),
            input_buffer: String::new(),
            scroll_offset: 0,
            total_lines: 0,
        }
    }

    /// Goodbye message to print after the terminal is restored
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.controller.connect().await?;

        // Render the first frame immediately so the greeting shows up
        self.process_controller_messages();
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await?;
                            }
                            Event::Resize(..) => {}
                            _ => {}
                        }
                    }
                }

                // Frame tick - let timers land even while the user is idle
                _ = tokio::time::sleep(TICK) => {}
            }

            // Drain landed replies, then mirror controller messages
            self.controller.poll_replies().await;
            self.process_controller_messages();

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Handle a keyboard event
    async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.controller.request_quit().await?,
                KeyCode::Char('l') => {
                    self.controller.request_clear().await?;
                    self.scroll_offset = 0;
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.controller.request_quit().await?,
            KeyCode::Enter => {
                // The form only submits non-blank input; the core would
                // ignore blanks anyway.
                if !self.input_buffer.trim().is_empty() {
                    let content = std::mem::take(&mut self.input_buffer);
                    self.controller.send_message(content).await?;
                    self.scroll_offset = 0;
                } else {
                    self.input_buffer.clear();
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Up => self.scroll_by(1),
            KeyCode::Down => self.scroll_by(-1),
            KeyCode::PageUp => self.scroll_by(10),
            KeyCode::PageDown => self.scroll_by(-10),
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }

        Ok(())
    }

    /// Scroll the transcript; positive = towards older messages
    fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll_offset as isize + delta;
        self.scroll_offset = next.clamp(0, self.total_lines as isize) as usize;
    }

    /// Mirror pending controller messages into display state
    fn process_controller_messages(&mut self) {
        for msg in self.controller.recv_all() {
            self.display.apply_message(msg);
        }

        if self.display.quitting && self.running {
            self.running = false;
            self.goodbye_message = self.display.quit_message.clone().or_else(|| {
                QUICK_GOODBYES
                    .choose(&mut rand::thread_rng())
                    .map(|s| (*s).to_string())
            });
        }
    }

    /// Render one frame
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),            // header
                    Constraint::Min(1),               // transcript
                    Constraint::Length(INPUT_HEIGHT), // input
                    Constraint::Length(1),            // status
                ])
                .split(frame.area());

            // Header
            let header = Paragraph::new(Line::from(Span::styled(
                "NextGenCreator",
                Style::default()
                    .fg(theme::HEADER_BLUE)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(header, chunks[0]);

            // Transcript
            let width = chunks[1].width.saturating_sub(2).max(10) as usize;
            let lines = transcript_lines(&self.display, width);
            self.total_lines = lines.len();

            let height = chunks[1].height as usize;
            self.scroll_offset = self.scroll_offset.min(lines.len().saturating_sub(height));
            let (start, end) = visible_range(lines.len(), height, self.scroll_offset);
            let transcript = Paragraph::new(lines[start..end].to_vec());
            frame.render_widget(transcript, chunks[1]);

            // Input box
            let input = Paragraph::new(self.input_buffer.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Type your message here..."),
            );
            frame.render_widget(input, chunks[2]);
            frame.set_cursor_position((
                chunks[2].x + 1 + self.input_buffer.width() as u16,
                chunks[2].y + 1,
            ));

            // Status bar
            let status_style = match self.display.notice {
                Some((NotifyLevel::Warning, _)) => Style::default().fg(theme::WARNING_YELLOW),
                Some((NotifyLevel::Error, _)) => Style::default().fg(theme::ERROR_RED),
                _ => Style::default().fg(theme::DIM_GRAY),
            };
            let status = Paragraph::new(Line::from(vec![
                Span::styled(self.display.status_line(), status_style),
                Span::styled(
                    "  Enter send · Ctrl+L clear · Esc quit",
                    Style::default().fg(theme::DIM_GRAY),
                ),
            ]));
            frame.render_widget(status, chunks[3]);
        })?;

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the styled transcript lines at the given wrap width
fn transcript_lines(display: &DisplayState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for msg in &display.messages {
        let (color, alignment) = match msg.role {
            DisplayRole::User => (theme::USER_BLUE, Alignment::Right),
            DisplayRole::Assistant => (theme::ASSISTANT_PURPLE, Alignment::Left),
            DisplayRole::System => (theme::SYSTEM_GREEN, Alignment::Left),
        };

        let prefix = msg.role.prefix();
        let wrapped = textwrap::wrap(&msg.content, width.saturating_sub(prefix.len()).max(10));
        for (i, piece) in wrapped.iter().enumerate() {
            let mut spans = Vec::new();
            if i == 0 && !prefix.is_empty() {
                spans.push(Span::styled(
                    prefix.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
            }
            spans.push(Span::styled(
                piece.to_string(),
                Style::default().fg(color),
            ));
            lines.push(Line::from(spans).alignment(alignment));
        }
        // Blank line between bubbles
        lines.push(Line::default());
    }

    if display.composing {
        lines.push(
            Line::from(Span::styled(
                "AI is typing...",
                Style::default()
                    .fg(theme::TYPING_PURPLE)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Left),
        );
    }

    lines
}

/// Window of `[start, end)` line indices visible at the given scroll offset
///
/// `offset` counts lines up from the bottom; 0 shows the latest lines.
fn visible_range(total: usize, height: usize, offset: usize) -> (usize, usize) {
    if total <= height {
        return (0, total);
    }
    let end = total.saturating_sub(offset).max(height);
    (end - height, end)
}
