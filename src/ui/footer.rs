use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::types::Overlay;

pub struct Footer {
    pub overlay: Overlay,
    /// Name of the sink enquiries go to
    pub sink: &'static str,
}

/// Current local date/time for the right side of the footer
fn format_datetime() -> String {
    Local::now().format("%d.%m.%Y %H:%M").to_string()
}

/// Key hints for the active overlay
pub fn key_hints(overlay: Overlay) -> Vec<(&'static str, &'static str)> {
    match overlay {
        Overlay::None => vec![
            ("↑↓", "Course"),
            ("Enter", "Register"),
            ("c", "Call me"),
            ("[ ]", "Reviews"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        Overlay::Wizard => vec![
            ("Tab", "Next"),
            ("←→", "Choose"),
            ("Enter", "Continue"),
            ("^B", "Back"),
            ("Esc", "Cancel"),
        ],
        Overlay::Callback => vec![("Tab", "Next"), ("Enter", "Send"), ("Esc", "Cancel")],
        Overlay::Help => vec![("Esc", "Close")],
    }
}

impl Widget for Footer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (key, desc) in key_hints(self.overlay) {
            spans.push(Span::styled(
                format!(" {} ", key),
                Style::default().bg(Color::Cyan).fg(Color::Black),
            ));
            spans.push(Span::styled(
                format!(" {} ", desc),
                Style::default().bg(Color::Blue).fg(Color::White),
            ));
            spans.push(Span::raw(" "));
        }

        // Right side: sink, datetime, version
        let right_text = format!(
            " {} │ {} │ v{} ",
            self.sink,
            format_datetime(),
            env!("CARGO_PKG_VERSION")
        );
        let right_width = (right_text.chars().count() as u16).min(area.width);

        let keys_area = Rect::new(area.x, area.y, area.width.saturating_sub(right_width), area.height);
        let right_area = Rect::new(
            area.x + area.width.saturating_sub(right_width),
            area.y,
            right_width,
            area.height,
        );

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Blue))
            .render(keys_area, buf);

        Paragraph::new(right_text)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White))
            .render(right_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::buffer_text;

    #[test]
    fn test_footer_shows_landing_keys_and_sink() {
        let area = Rect::new(0, 0, 140, 1);
        let mut buf = Buffer::empty(area);
        Footer {
            overlay: Overlay::None,
            sink: "outbox",
        }
        .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Register"));
        assert!(text.contains("outbox"));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_wizard_hints_include_back() {
        assert!(key_hints(Overlay::Wizard).contains(&("^B", "Back")));
    }
}
