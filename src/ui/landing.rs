//! Landing screen: banner, course list, course detail and testimonials

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::str::FromStr;

use crate::catalog::{Catalog, Course};
use crate::config::CenterConfig;
use crate::testimonials::{Carousel, SlideDirection};

/// Badge color for a course, falling back to cyan for unparsable hex
pub fn accent_color(course: &Course) -> Color {
    Color::from_str(&course.accent).unwrap_or(Color::Cyan)
}

pub fn render_header(frame: &mut Frame, area: Rect, center: &CenterConfig, status: Option<&str>) {
    let mut lines = vec![
        Line::from(Span::styled(
            center.name.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(center.tagline.as_str(), Style::default().fg(Color::Gray))),
    ];
    if let Some(status) = status {
        lines.push(Line::from(Span::styled(status, Style::default().fg(Color::Yellow))));
    }
    let banner = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(banner, area);
}

pub fn render_courses(frame: &mut Frame, area: Rect, catalog: &Catalog, selected: usize) {
    let items: Vec<ListItem> = catalog
        .courses()
        .iter()
        .map(|course| {
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(accent_color(course))),
                Span::raw(course.title.as_str()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Our Courses ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    if !catalog.is_empty() {
        state.select(Some(selected.min(catalog.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_detail(frame: &mut Frame, area: Rect, catalog: &Catalog, selected: usize) {
    let block = Block::default().title(" Course ").borders(Borders::ALL);

    let Some(course) = catalog.courses().get(selected) else {
        let empty = Paragraph::new("No courses are currently listed.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let questions = catalog.schema_for(&course.id).len();
    let lines = vec![
        Line::from(Span::styled(
            course.title.as_str(),
            Style::default()
                .fg(accent_color(course))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(course.description.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            format!("Registration: 2 steps, {} course questions", questions),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" to register", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(detail, area);
}

pub fn render_testimonials(frame: &mut Frame, area: Rect, carousel: &Carousel) {
    let title = if carousel.is_empty() {
        " What Our Students Say ".to_string()
    } else {
        format!(" What Our Students Say ({}/{}) ", carousel.index() + 1, carousel.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let Some(testimonial) = carousel.current() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let arrow = match carousel.direction() {
        SlideDirection::Forward => "›",
        SlideDirection::Backward => "‹",
    };
    let stars = testimonial.stars() as usize;
    let lines = vec![
        Line::from(vec![
            Span::styled("★".repeat(stars), Style::default().fg(Color::Yellow)),
            Span::styled("☆".repeat(5 - stars), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("“{}”", testimonial.quote),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", arrow), Style::default().fg(Color::Magenta)),
            Span::styled(testimonial.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(", {}", testimonial.course), Style::default().fg(Color::DarkGray)),
        ]),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}
