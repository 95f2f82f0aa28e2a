//! Semantic color palette on top of owo-colors.

use std::fmt::Display;

use owo_colors::{OwoColorize, Style};

/// Meaning of a piece of output, mapped to one terminal style.
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Muted,
    Header,
    Code,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Success => Style::new().green().bold(),
            Tone::Error => Style::new().red().bold(),
            Tone::Warning => Style::new().yellow(),
            Tone::Muted => Style::new().dimmed(),
            Tone::Header => Style::new().bold(),
            Tone::Code => Style::new().blue(),
        }
    }
}

/// Renders `value` in `tone`, or plain when colors are off.
pub fn paint(value: impl Display, tone: Tone) -> String {
    if super::no_color() {
        value.to_string()
    } else {
        value.style(tone.style()).to_string()
    }
}

/// Shorthand methods for [`paint`].
pub trait SemanticStyle {
    fn success(&self) -> String;
    fn error(&self) -> String;
    fn warning(&self) -> String;
    fn muted(&self) -> String;
    fn header(&self) -> String;
    fn code(&self) -> String;
}

impl<T: Display> SemanticStyle for T {
    fn success(&self) -> String {
        paint(self, Tone::Success)
    }

    fn error(&self) -> String {
        paint(self, Tone::Error)
    }

    fn warning(&self) -> String {
        paint(self, Tone::Warning)
    }

    fn muted(&self) -> String {
        paint(self, Tone::Muted)
    }

    fn header(&self) -> String {
        paint(self, Tone::Header)
    }

    fn code(&self) -> String {
        paint(self, Tone::Code)
    }
}
