use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Landing screen regions: (header, courses, detail, testimonials, footer)
pub fn compute_layout(area: Rect) -> (Rect, Rect, Rect, Rect, Rect) {
    // 1. Vertical Split: Header, Body, Footer
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Min(1),    // Body (dynamic)
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let header_area = vertical[0];
    let body_area = vertical[1];
    let footer_area = vertical[2];

    // 2. Horizontal Split of Body
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Course list
            Constraint::Percentage(60), // Detail + testimonials
        ])
        .split(body_area);

    // 3. Vertical Split of the right column
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Course detail
            Constraint::Percentage(55), // Testimonials
        ])
        .split(body_chunks[1]);

    (
        header_area,
        body_chunks[0],
        right_chunks[0],
        right_chunks[1],
        footer_area,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_screen() {
        let area = Rect::new(0, 0, 120, 40);
        let (header, courses, detail, testimonials, footer) = compute_layout(area);
        assert_eq!(header.height, 4);
        assert_eq!(footer.height, 1);
        assert_eq!(footer.y, 39);
        assert_eq!(courses.height, 35);
        assert_eq!(detail.x, testimonials.x);
        assert_eq!(detail.height + testimonials.height, 35);
    }
}
