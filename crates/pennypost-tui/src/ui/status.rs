//! Status badges
//!
//! Maps message and recharge status tones to colours.

use pennypost_proto::StatusTone;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

/// Colour for a status tone.
pub fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Positive => Color::Green,
        StatusTone::Info => Color::Blue,
        StatusTone::Warning => Color::Yellow,
        StatusTone::Negative => Color::Red,
        StatusTone::Neutral => Color::Gray,
    }
}

/// Upper-cased badge for a status, e.g. `DELIVERED`.
pub fn badge(label: &str, tone: StatusTone) -> Span<'static> {
    Span::styled(
        format!(" {} ", label.to_uppercase()),
        Style::default().fg(Color::Black).bg(tone_color(tone)).add_modifier(Modifier::BOLD),
    )
}
