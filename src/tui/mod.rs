//! Ratatui-based terminal form.
//!
//! The left panel lists the twelve controls; the right panel holds the
//! Predict button and the output region. All prediction logic goes through
//! `app::predict::on_predict`, so this module only handles keys and drawing.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};

use crate::app::predict::{on_predict, OutputRegion, Severity};
use crate::domain::CltvEncoding;
use crate::error::{AppError, EXIT_RUNTIME};
use crate::form::{ControlId, ControlKind, ControlState};
use crate::models::SharedModel;

const TITLE: &str = "Telecom Customer Churn Predictor";
const HEADER_BG: Color = Color::Rgb(2, 48, 71);
/// List index of the Predict button (one past the last control).
const PREDICT_BUTTON: usize = ControlId::COUNT;

/// Start the form.
pub fn run(model: SharedModel, cltv: CltvEncoding) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(model, cltv);
    log::info!("form started");
    let result = app.event_loop(&mut terminal);
    log::info!("form closed after {} prediction(s)", app.trigger_count);
    result
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RUNTIME,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    model: SharedModel,
    cltv: CltvEncoding,
    controls: ControlState,
    /// Highlighted row: a control index, or `PREDICT_BUTTON`.
    selected: usize,
    /// Edit buffer while a text control is being edited.
    editing: Option<String>,
    trigger_count: u64,
    output: OutputRegion,
    status: String,
}

impl App {
    fn new(model: SharedModel, cltv: CltvEncoding) -> Self {
        Self {
            model,
            cltv,
            controls: ControlState::default(),
            selected: 0,
            editing: None,
            trigger_count: 0,
            output: OutputRegion::Empty,
            status: "Fill in the form and press p to predict.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn selected_control(&self) -> Option<ControlId> {
        ControlId::ALL.get(self.selected).copied()
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected < PREDICT_BUTTON {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.cycle_selected(-1),
            KeyCode::Right => self.cycle_selected(1),
            KeyCode::Enter => match self.selected_control() {
                None => self.fire(),
                Some(id) => match id.kind() {
                    ControlKind::Choice(_) => self.cycle_selected(1),
                    ControlKind::Number | ControlKind::Text => {
                        self.editing = Some(self.controls.get(id).to_string());
                        self.status = format!("Editing {}. Enter to apply, Esc to cancel.", id.label());
                    }
                },
            },
            KeyCode::Char('p') => self.fire(),
            KeyCode::Char('r') => {
                self.controls = ControlState::default();
                self.status = "Controls reset to defaults.".to_string();
            }
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(id) = self.selected_control() else {
            self.editing = None;
            return;
        };
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };

        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                if let Some(value) = self.editing.take() {
                    self.controls.set(id, value);
                }
                self.status = format!("{} updated.", id.label());
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if id.accepts_char(c) => buffer.push(c),
            _ => {}
        }
    }

    fn cycle_selected(&mut self, step: i32) {
        if let Some(id) = self.selected_control() {
            self.controls.cycle(id, step);
        }
    }

    /// The trigger: recompute the output region from the current controls.
    fn fire(&mut self) {
        self.trigger_count += 1;
        self.output = on_predict(self.trigger_count, &self.controls, &*self.model, self.cltv);
        self.status = format!(
            "Prediction #{} at {}",
            self.trigger_count,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .style(Style::default().bg(HEADER_BG))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_controls(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_button(frame, right[0]);
        self.draw_output(frame, right[1]);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let label_width = ControlId::ALL.iter().map(|id| id.label().len()).max().unwrap_or(0) + 1;

        let items: Vec<ListItem> = ControlId::ALL
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let label = Span::raw(format!("{:<label_width$} ", format!("{}:", id.label())));
                let value = match (&self.editing, i == self.selected) {
                    (Some(buffer), true) => Span::styled(
                        format!("{buffer}▏"),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    _ if self.controls.get(id).is_empty() => {
                        Span::styled(id.placeholder(), Style::default().fg(Color::DarkGray))
                    }
                    _ => match id.kind() {
                        ControlKind::Choice(_) => {
                            Span::raw(format!("‹ {} ›", self.controls.display(id)))
                        }
                        _ => Span::raw(self.controls.display(id).to_string()),
                    },
                };
                ListItem::new(Line::from(vec![label, value]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Customer").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if self.selected < PREDICT_BUTTON {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_button(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut style = Style::default().fg(Color::Black).bg(Color::Yellow);
        if self.selected == PREDICT_BUTTON {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let p = Paragraph::new("Predict")
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_output(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Result").borders(Borders::ALL);

        let Some(message) = self.output.message() else {
            frame.render_widget(block, area);
            return;
        };

        let color = self.output.severity().map(severity_color).unwrap_or(Color::Gray);
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                message,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ];

        if let Some(outcome) = self.output.outcome() {
            if let Some(note) = &outcome.cltv_note {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    note.clone(),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines.push(Line::from(""));
            for row in crate::report::format_record(&outcome.record).lines() {
                lines.push(Line::from(Span::styled(
                    row.to_string(),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.editing.is_some() {
            "type to edit  Backspace delete  Enter apply  Esc cancel"
        } else {
            "↑/↓ select  ←/→ change  Enter edit/predict  p predict  r reset  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Danger => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Magenta,
    }
}
