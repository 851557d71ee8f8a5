use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::callback::{CallbackField, CallbackForm, CallbackPhase};
use crate::types::FormCursor;

/// Centered popup of a fixed size, shrunk to fit small terminals
pub fn centered_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Centered popup sized as a share of the screen
pub fn centered_percent(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = (area.width as u32 * width_percent as u32 / 100) as u16;
    let height = (area.height as u32 * height_percent as u32 / 100) as u16;
    centered_fixed(area, width, height)
}

/// One labelled input, as used by both forms
pub fn input_lines<'a>(label: &'a str, value: &'a str, focused: bool, missing: bool) -> Vec<Line<'a>> {
    let marker_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let label_style = if missing {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let mut value_spans = vec![
        Span::styled(if focused { "▸ " } else { "  " }, marker_style),
        Span::styled(value, marker_style),
    ];
    if focused {
        value_spans.push(Span::styled("█", Style::default().fg(Color::White)));
    }
    vec![Line::from(Span::styled(label, label_style)), Line::from(value_spans)]
}

/// Render the call-back request form
pub fn render_callback(frame: &mut Frame, area: Rect, form: &CallbackForm, cursor: FormCursor) {
    let popup_area = centered_fixed(area, 60, 16);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Book a Free Consultation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    match form.phase() {
        CallbackPhase::Editing => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Leave your number and we'll call you back.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ];
            let missing = form.missing_fields();
            for (row, field) in CallbackField::all().iter().enumerate() {
                lines.extend(input_lines(
                    field.label(),
                    form.field(*field),
                    cursor.row == row,
                    missing.contains(field),
                ));
                lines.push(Line::from(""));
            }
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);
        }
        CallbackPhase::Submitting => {
            let waiting = Paragraph::new("Sending your request...")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            frame.render_widget(waiting, chunks[0]);
        }
        CallbackPhase::Submitted => {
            let done = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "✓ Request Sent!",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("We'll call you back shortly."),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(done, chunks[0]);
        }
    }

    if let Some(error) = form.last_error() {
        let line = Paragraph::new(format!("Could not send: {}", error))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(line, chunks[1]);
    }

    let nav_text = match form.phase() {
        CallbackPhase::Editing if form.is_valid() => "[Tab] Next field  [Enter] Send  [Esc] Cancel",
        CallbackPhase::Editing => "[Tab] Next field  [Esc] Cancel",
        CallbackPhase::Submitting => "[Esc] Close",
        CallbackPhase::Submitted => "[Enter] Close",
    };
    let nav = Paragraph::new(nav_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(nav, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::buffer_text;
    use crate::validation::ContactPolicy;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    #[test]
    fn test_centered_fixed_fits_small_area() {
        let popup = centered_fixed(Rect::new(0, 0, 40, 10), 60, 16);
        assert_eq!(popup.width, 36);
        assert_eq!(popup.height, 8);
        assert_eq!(popup.x, 2);
    }

    #[test]
    fn test_render_callback_form() {
        let mut form = CallbackForm::new(ContactPolicy::Presence, Duration::from_millis(2000));
        form.open();
        form.set_field(CallbackField::Name, "Ana");

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| render_callback(frame, frame.area(), &form, FormCursor::default()))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Book a Free Consultation"));
        assert!(text.contains("Ana"));
        assert!(text.contains("Phone Number"));
        assert!(!text.contains("[Enter] Send"));
    }
}
