//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod auth;
mod dashboard;
mod history;
mod status;
mod toast;

use pennypost_app::{App, Screen, form::TextField};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

/// Height of a bordered single-line input.
pub(crate) const INPUT_HEIGHT: u16 = 3;

const PROMPT_WIDTH: u16 = 1; // inside left border
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const BODY_MIN_HEIGHT: u16 = 3;
    const HELP_HEIGHT: u16 = 1;

    let area = frame.area();
    let chunks =
        Layout::vertical([Constraint::Min(BODY_MIN_HEIGHT), Constraint::Length(HELP_HEIGHT)])
            .split(area);

    let [body_area, help_area] = chunks.as_ref() else {
        return;
    };

    match app.screen() {
        Screen::Login => auth::render_login(frame, app, *body_area),
        Screen::Signup => auth::render_signup(frame, app, *body_area),
        Screen::Dashboard => dashboard::render(frame, app, *body_area),
    }

    render_help(frame, app, *help_area);
    toast::render(frame, app, area);
}

/// Key hints for the current screen.
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.screen() {
        Screen::Login => "Tab: next field | Enter: login | Ctrl+S: create account | Esc: quit",
        Screen::Signup => "Tab/Shift+Tab: move | Enter: sign up | Ctrl+S: back to login | Esc: quit",
        Screen::Dashboard => {
            "Tab: move | Enter: submit | Left/Right: choose preset | Ctrl+L: logout | Esc: quit"
        },
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::raw(" "), Span::raw(hints)]))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Border style for a control, highlighted when focused.
pub(crate) fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Render a bordered single-line text input.
///
/// Masked inputs show one `*` per character. The terminal cursor is placed in
/// the focused input.
pub(crate) fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    field: &TextField,
    focused: bool,
    masked: bool,
) {
    let text = if masked {
        "*".repeat(field.value().chars().count())
    } else {
        field.value().to_string()
    };

    let block = Block::bordered().title(format!(" {label} ")).border_style(focus_style(focused));
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::White)).block(block);
    frame.render_widget(paragraph, area);

    if focused {
        let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
        let cursor_offset = u16::try_from(field.cursor()).unwrap_or(u16::MAX).min(available_width);

        let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
        let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
        let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

        frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
    }
}

/// A button label, dimmed when disabled.
pub(crate) fn button(label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("[ {label} ]"), style)
}

/// Centre a box of at most `width` x `height` inside `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
