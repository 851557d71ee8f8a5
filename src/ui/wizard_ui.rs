//! Registration wizard rendering

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

use crate::registration::{DraftField, WizardState, WizardStep};
use crate::types::{FormCursor, QuestionRow};
use crate::ui::dialog::{centered_percent, input_lines};

const SUCCESS_NOTE: &str = "We'll contact you within 24 hours to discuss the next steps.";

/// Render the registration wizard over the landing screen
pub fn render(frame: &mut Frame, area: Rect, state: &WizardState, cursor: FormCursor, now: Instant) {
    let popup_area = centered_percent(area, 70, 80);
    frame.render_widget(Clear, popup_area);

    let course_title = state.course().map(|c| c.title.as_str()).unwrap_or("");
    let title = format!(
        " Register for {} - Step {}/{} ",
        course_title,
        state.current_step(),
        WizardStep::total_steps()
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // progress
        Constraint::Length(1),
        Constraint::Min(1),    // step body
        Constraint::Length(1), // delivery error
        Constraint::Length(1), // navigation
    ])
    .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(state.progress().clamp(0.0, 1.0))
        .label(state.step().title());
    frame.render_widget(gauge, chunks[0]);

    match state.step() {
        WizardStep::Contact => render_contact(frame, chunks[2], state, cursor),
        WizardStep::Questions => render_questions(frame, chunks[2], state, cursor),
        WizardStep::Submitting => {
            let waiting = Paragraph::new("Sending your registration...")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            frame.render_widget(waiting, chunks[2]);
        }
        WizardStep::Submitted => render_submitted(frame, chunks[2], state, course_title, now),
    }

    if let Some(error) = state.last_error() {
        let line = Paragraph::new(format!("Registration not sent: {} (press Enter to retry)", error))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(line, chunks[3]);
    }

    render_nav(frame, chunks[4], state);
}

fn render_contact(frame: &mut Frame, area: Rect, state: &WizardState, cursor: FormCursor) {
    let missing = state.missing_contact_fields();
    let mut lines = vec![
        Line::from(Span::styled(
            "Tell us how to reach you.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    for (row, field) in DraftField::contact_fields().iter().enumerate() {
        lines.extend(input_lines(
            field.label(),
            state.draft().field(*field),
            cursor.row == row,
            missing.contains(field),
        ));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_questions(frame: &mut Frame, area: Rect, state: &WizardState, cursor: FormCursor) {
    let questions = state.questions();
    let focused = QuestionRow::from_cursor(cursor, questions.len());
    let mut lines = Vec::new();

    if questions.is_empty() {
        lines.push(Line::from(Span::styled(
            "No course questions. Add a message or submit.",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    for (i, question) in questions.iter().enumerate() {
        let is_focused = focused == QuestionRow::Question(i);
        let answer = state.draft().answer(&question.key);
        let prompt_style = if answer.is_some() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(question.prompt.as_str(), prompt_style)));

        let mut spans = vec![Span::styled(
            if is_focused { "▸ " } else { "  " },
            Style::default().fg(Color::Cyan),
        )];
        for option in &question.options {
            let selected = answer == Some(option.as_str());
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if is_focused {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", option), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    lines.extend(input_lines(
        DraftField::Message.label(),
        state.draft().field(DraftField::Message),
        focused == QuestionRow::Message,
        false,
    ));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_submitted(frame: &mut Frame, area: Rect, state: &WizardState, course_title: &str, now: Instant) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ Registration Successful!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Thank you for your interest in {}.", course_title)),
        Line::from(SUCCESS_NOTE),
    ];
    if let Some(remaining) = state.closes_in(now) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Closing in {}s", remaining.as_secs_f32().ceil() as u64),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let done = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(done, area);
}

fn render_nav(frame: &mut Frame, area: Rect, state: &WizardState) {
    let hint = Style::default().fg(Color::DarkGray);
    let ready = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);

    let line = match state.step() {
        WizardStep::Contact => {
            let mut spans = vec![Span::styled("[Tab] Next field  ", hint)];
            if state.is_step1_valid() {
                spans.push(Span::styled("[Enter] Next Step", ready));
                spans.push(Span::styled("  ", hint));
            }
            spans.push(Span::styled("[Esc] Cancel", hint));
            Line::from(spans)
        }
        WizardStep::Questions => {
            let mut spans = vec![Span::styled("[Ctrl+B] Back  [←/→] Choose  ", hint)];
            if state.is_step2_valid() {
                spans.push(Span::styled("[Enter] Submit Registration", ready));
                spans.push(Span::styled("  ", hint));
            }
            spans.push(Span::styled("[Esc] Cancel", hint));
            Line::from(spans)
        }
        WizardStep::Submitting => Line::from(Span::styled("[Esc] Close", hint)),
        WizardStep::Submitted => Line::from(Span::styled("[Enter] Close", hint)),
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CourseId};
    use crate::registration::WizardSettings;
    use crate::ui::test_support::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn open_python() -> WizardState {
        let catalog = Catalog::builtin();
        let id = CourseId::PythonBasic;
        let mut wizard = WizardState::new(WizardSettings::default());
        wizard.open(
            catalog.find(&id).cloned().unwrap(),
            catalog.schema_for(&id).to_vec(),
        );
        wizard
    }

    fn draw(state: &WizardState, cursor: FormCursor) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state, cursor, Instant::now()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_contact_step_render() {
        let wizard = open_python();
        let text = draw(&wizard, FormCursor::default());
        assert!(text.contains("Register for Python Basic - Step 1/2"));
        assert!(text.contains("Full Name"));
        assert!(!text.contains("[Enter] Next Step"));
    }

    #[test]
    fn test_next_hint_once_contact_complete() {
        let mut wizard = open_python();
        wizard.set_field(DraftField::Name, "Ana");
        wizard.set_field(DraftField::Email, "a@x.com");
        wizard.set_field(DraftField::Phone, "123");
        let text = draw(&wizard, FormCursor::default());
        assert!(text.contains("[Enter] Next Step"));
    }

    #[test]
    fn test_questions_step_render() {
        let mut wizard = open_python();
        wizard.set_field(DraftField::Name, "Ana");
        wizard.set_field(DraftField::Email, "a@x.com");
        wizard.set_field(DraftField::Phone, "123");
        assert!(wizard.next());

        let text = draw(&wizard, FormCursor::default());
        assert!(text.contains("Step 2/2"));
        let first = &wizard.questions()[0];
        assert!(text.contains(first.prompt.as_str()));
        assert!(text.contains(first.options[0].as_str()));
        assert!(text.contains("[Ctrl+B] Back"));
    }
}
