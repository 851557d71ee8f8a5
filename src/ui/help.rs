//! Key reference popup

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::dialog::centered_fixed;

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

fn key_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", key), Style::default().fg(Color::Cyan)),
        Span::raw(desc),
    ])
}

pub fn help_lines() -> Vec<Line<'static>> {
    vec![
        section("Courses"),
        key_line("↑/↓  j/k", "Select a course"),
        key_line("Enter", "Register for the selected course"),
        key_line("c", "Book a free consultation call"),
        key_line("[ ]  ←/→", "Previous / next testimonial"),
        key_line("?  F1", "Toggle this help"),
        key_line("q  Ctrl+Q", "Quit"),
        Line::from(""),
        section("Forms"),
        key_line("Tab  ↓", "Next field"),
        key_line("Shift+Tab  ↑", "Previous field"),
        key_line("←/→  Space", "Choose an answer"),
        key_line("Enter", "Next step / submit"),
        key_line("Ctrl+B", "Back to step 1"),
        key_line("Esc", "Close the form"),
    ]
}

pub fn render(frame: &mut Frame, area: Rect) {
    let lines = help_lines();
    let popup_area = centered_fixed(area, 56, lines.len() as u16 + 4);
    frame.render_widget(Clear, popup_area);

    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .title_bottom(Line::from(" Esc to close ").alignment(Alignment::Center))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(help, popup_area);
}
