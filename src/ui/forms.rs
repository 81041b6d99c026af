use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::store::DELIMITER;

/// Internal representation of the "add grade" form fields.
#[derive(Default, Clone)]
pub(crate) struct GradeForm {
    pub(crate) name: String,
    pub(crate) grade: String,
    pub(crate) active: GradeField,
    pub(crate) error: Option<String>,
}

/// Fields available within the grade form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum GradeField {
    #[default]
    Name,
    Grade,
}

impl GradeForm {
    /// Swap focus between the name and grade fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            GradeField::Name => GradeField::Grade,
            GradeField::Grade => GradeField::Name,
        };
    }

    /// Append a character to the active field, validating allowed input. The
    /// grade field takes digits and a leading minus so out-of-range input
    /// still reaches validation and gets a proper message.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            GradeField::Name => {
                if !ch.is_control() {
                    self.name.push(ch);
                    true
                } else {
                    false
                }
            }
            GradeField::Grade => {
                if ch.is_ascii_digit() || (ch == '-' && self.grade.is_empty()) {
                    self.grade.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            GradeField::Name => {
                self.name.pop();
            }
            GradeField::Grade => {
                self.grade.pop();
            }
        }
    }

    /// Validate the inputs and return a trimmed name plus the raw grade. The
    /// range check is left to the roster so there is one source of truth.
    pub(crate) fn parse_inputs(&self) -> Result<(String, i32)> {
        let name = parse_name(&self.name)?;
        let grade_raw = self.grade.trim();
        if grade_raw.is_empty() {
            return Err(anyhow!("Name and grade cannot be empty."));
        }
        let grade = grade_raw
            .parse::<i32>()
            .map_err(|_| anyhow!("Please enter a valid number for the grade."))?;
        Ok((name, grade))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: GradeField) -> Line<'static> {
        let value = match field {
            GradeField::Name => &self.name,
            GradeField::Grade => &self.grade,
        };
        field_line(field_name, value, self.active == field)
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: GradeField) -> usize {
        match field {
            GradeField::Name => self.name.chars().count(),
            GradeField::Grade => self.grade.chars().count(),
        }
    }
}

/// Single-field form asking which student to remove.
#[derive(Default, Clone)]
pub(crate) struct RemoveForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl RemoveForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    pub(crate) fn parse_inputs(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Please enter the name of the student to remove."));
        }
        Ok(name.to_string())
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line("Name", &self.name, true)
    }
}

/// Pending removal awaiting a yes/no answer.
#[derive(Clone)]
pub(crate) struct ConfirmRemove {
    pub(crate) name: String,
    /// How many roster entries share the name, shown so the user knows
    /// duplicates go too.
    pub(crate) matches: usize,
}

fn parse_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(anyhow!("Name and grade cannot be empty."));
    }
    if name.contains(DELIMITER) {
        return Err(anyhow!("Names cannot contain '{DELIMITER}'."));
    }
    Ok(name.to_string())
}

fn field_line(field_name: &str, value: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}
