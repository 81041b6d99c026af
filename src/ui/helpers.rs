use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Number of text lines in a rendered report, for scroll clamping.
pub(crate) fn line_count(text: &str) -> u16 {
    u16::try_from(text.lines().count()).unwrap_or(u16::MAX)
}

/// Column for a text cursor `offset` characters into `area`, kept inside the
/// area however long the typed value grows.
pub(crate) fn cursor_column(area: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1))
        .max(area.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    use crate::models::InvalidGradeError;

    #[test]
    fn test_surface_error_reports_root_cause() {
        let err = Err::<(), _>(InvalidGradeError { value: 101 })
            .context("failed to record grade")
            .unwrap_err();
        assert_eq!(
            surface_error(&err),
            "Grade must be between 0 and 100 (got 101)."
        );
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!(popup.width > 0 && popup.height > 0);
        assert!(popup.x > area.x && popup.right() < area.right());
        assert!(popup.y > area.y && popup.bottom() < area.bottom());
    }

    #[test]
    fn test_cursor_column_stays_inside_area() {
        let area = Rect::new(10, 5, 40, 3);
        assert_eq!(cursor_column(area, 6), 16);
        assert_eq!(cursor_column(area, 39), 49);
        assert_eq!(cursor_column(area, 70_000), 49);
        assert_eq!(cursor_column(Rect::new(10, 5, 0, 0), 3), 10);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("a\nb\n"), 2);
        assert_eq!(line_count(""), 0);
    }
}
