//! Student testimonials and the auto-advancing carousel

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::timer::IntervalTimer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub course: String,
    pub quote: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
}

fn default_rating() -> u8 {
    5
}

impl Testimonial {
    /// Rating clamped to 1..=5 for display
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }
}

/// Direction of the last slide change, used for the transition hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    #[default]
    Forward,
    Backward,
}

pub fn builtin_testimonials() -> Vec<Testimonial> {
    [
        (
            "Mariam K.",
            "Digital Marketing",
            "I launched my first ad campaign two weeks into the course. The mentors reviewed every draft.",
            5,
        ),
        (
            "Davit A.",
            "Web Development Full Stack",
            "Went from zero to a deployed web app. The evening schedule made it possible while working.",
            5,
        ),
        (
            "Nino G.",
            "Graphic Design",
            "Practical briefs from real clients. My portfolio finally looks professional.",
            4,
        ),
        (
            "Levan T.",
            "Python Basic",
            "Automation scripts I wrote in class now save my team hours every week.",
            5,
        ),
    ]
    .into_iter()
    .map(|(name, course, quote, rating)| Testimonial {
        name: name.to_string(),
        course: course.to_string(),
        quote: quote.to_string(),
        rating,
    })
    .collect()
}

/// Cycles through testimonials on a free-running interval. Manual
/// navigation does not reset the interval.
#[derive(Debug, Clone)]
pub struct Carousel {
    items: Vec<Testimonial>,
    index: usize,
    direction: SlideDirection,
    timer: IntervalTimer,
}

impl Carousel {
    pub fn new(items: Vec<Testimonial>, interval: Duration, now: Instant) -> Self {
        Self {
            items,
            index: 0,
            direction: SlideDirection::Forward,
            timer: IntervalTimer::new(now, interval),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    pub fn current(&self) -> Option<&Testimonial> {
        self.items.get(self.index)
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.direction = SlideDirection::Forward;
        self.index = (self.index + 1) % self.items.len();
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.direction = SlideDirection::Backward;
        self.index = (self.index + self.items.len() - 1) % self.items.len();
    }

    /// Auto-advance. Returns true when the slide changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.fire_if_due(now) || self.items.len() < 2 {
            return false;
        }
        self.next();
        true
    }
}
