use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info};

use crate::roster::Roster;

use super::forms::{ConfirmRemove, GradeField, GradeForm, RemoveForm};
use super::helpers::{centered_rect, cursor_column, line_count, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Lines moved per PageUp/PageDown.
const PAGE_STEP: u16 = 10;

/// Which report fills the main panel.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum View {
    Roster,
    Summary,
}

/// Modal state layered over the report view.
enum Mode {
    Normal,
    AddingGrade(GradeForm),
    RemovingStudent(RemoveForm),
    ConfirmRemove(ConfirmRemove),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    roster: Roster,
    view: View,
    scroll: u16,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            view: View::Roster,
            scroll: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// The roster as edited so far, for saving on exit.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Show a warning in the footer, e.g. after a partial load.
    pub fn show_warning<S: Into<String>>(&mut self, text: S) {
        self.set_status(text, StatusKind::Error);
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingGrade(form) => self.handle_add_grade(code, form),
            Mode::RemovingStudent(form) => self.handle_remove_student(code, form),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.clear_status();
                return Mode::AddingGrade(GradeForm::default());
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') => {
                if self.roster.is_empty() {
                    self.set_status("There are no students to remove.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Mode::RemovingStudent(RemoveForm::default());
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.clear_status();
                self.toggle_view();
            }
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-i32::from(PAGE_STEP)),
            KeyCode::PageDown => self.scroll_by(i32::from(PAGE_STEP)),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_grade(&mut self, code: KeyCode, mut form: GradeForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add grade cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_grade(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingGrade(form)
        } else {
            Mode::Normal
        }
    }

    fn handle_remove_student(&mut self, code: KeyCode, mut form: RemoveForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Backspace => {
                form.backspace();
                Mode::RemovingStudent(form)
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok(name) => {
                    let matches = self
                        .roster
                        .students()
                        .iter()
                        .filter(|student| student.matches_name(&name))
                        .count();
                    if matches == 0 {
                        let message = format!("Student {name} not found.");
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                        Mode::RemovingStudent(form)
                    } else {
                        self.clear_status();
                        Mode::ConfirmRemove(ConfirmRemove { name, matches })
                    }
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    Mode::RemovingStudent(form)
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Mode::RemovingStudent(form)
            }
            _ => Mode::RemovingStudent(form),
        }
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if self.roster.remove_student(&confirm.name) {
                    info!(name = %confirm.name, entries = confirm.matches, "student removed");
                    self.clamp_scroll();
                    self.set_status(
                        format!("Student {} has been removed.", confirm.name),
                        StatusKind::Info,
                    );
                } else {
                    self.set_status(
                        format!("Student {} not found.", confirm.name),
                        StatusKind::Error,
                    );
                }
                Mode::Normal
            }
            _ => Mode::ConfirmRemove(confirm),
        }
    }

    fn save_grade(&mut self, form: &GradeForm) -> Result<()> {
        let (name, grade) = form.parse_inputs()?;
        let student = self.roster.record_grade(&name, grade)?;
        debug!(name = %student.name(), grade, "grade recorded");
        let message = format!("Grade added for {}.", student.name());
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Roster => View::Summary,
            View::Summary => View::Roster,
        };
        self.scroll = 0;
    }

    fn report(&self) -> String {
        match self.view {
            View::Roster => self.roster.render_roster(),
            View::Summary => self.roster.render_summary(),
        }
    }

    fn max_scroll(&self) -> u16 {
        line_count(&self.report()).saturating_sub(1)
    }

    fn scroll_by(&mut self, offset: i32) {
        let target = (i32::from(self.scroll) + offset).max(0);
        self.scroll = u16::try_from(target).unwrap_or(u16::MAX);
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_report(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingGrade(form) => self.draw_grade_form(frame, area, form),
            Mode::RemovingStudent(form) => self.draw_remove_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_report(&self, frame: &mut Frame, area: Rect) {
        let title = match self.view {
            View::Roster => format!("Student Roster ({})", self.roster.len()),
            View::Summary => "Summary Report".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let paragraph = Paragraph::new(self.report())
            .block(block)
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::AddingGrade(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Add Grade   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::RemovingStudent(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Continue   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmRemove(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Normal => {
                let report_label = match self.view {
                    View::Roster => " Summary Report   ",
                    View::Summary => " Student List   ",
                };
                Line::from(vec![
                    Span::styled("[A]", key_style),
                    Span::raw(" Add Grade   "),
                    Span::styled("[D]", key_style),
                    Span::raw(" Remove Student   "),
                    Span::styled("[R]", key_style),
                    Span::raw(report_label),
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Scroll   "),
                    Span::styled("[Q]", key_style),
                    Span::raw(" Save & Quit"),
                ])
            }
        }
    }

    fn draw_grade_form(&self, frame: &mut Frame, area: Rect, form: &GradeForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Grade").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let name_line = form.build_line("Student Name", GradeField::Name);
        let grade_line = form.build_line("Grade (0-100)", GradeField::Grade);

        let mut lines = vec![name_line, grade_line, Line::from("")];
        lines.push(form_hint(
            form.error.as_deref(),
            "Enter to save • Tab to switch • Esc to cancel",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            GradeField::Name => ("Student Name: ".len(), 0),
            GradeField::Grade => ("Grade (0-100): ".len(), 1),
        };
        let cursor_x = cursor_column(inner, prefix + form.value_len(form.active));
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_remove_form(&self, frame: &mut Frame, area: Rect, form: &RemoveForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Remove Student").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line(),
            Line::from(""),
            form_hint(form.error.as_deref(), "Enter to continue • Esc to cancel"),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = cursor_column(inner, "Name: ".len() + form.name.chars().count());
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(format!(
            "Are you sure you want to remove {} and all their grades?",
            confirm.name
        ))];
        if confirm.matches > 1 {
            lines.push(Line::from(format!(
                "{} roster entries share this name; all of them will be removed.",
                confirm.matches
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Either the validation error in red or the usual key hint in gray.
fn form_hint(error: Option<&str>, hint: &'static str) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
    }
}
