//! Toast notifications
//!
//! Drawn last, stacked in the top-right corner over whatever screen is shown.

use pennypost_app::{App, NotificationKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;

/// Render visible notifications, newest at the bottom.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;

    for (row, toast) in (0u16..).zip(app.notifications().items()) {
        let y = area.y + row * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }

        let (title, color) = match toast.kind {
            NotificationKind::Success => (" Success ", Color::Green),
            NotificationKind::Error => (" Error ", Color::Red),
        };

        let rect = Rect { x, y, width, height: TOAST_HEIGHT };
        let block = Block::bordered().title(title).border_style(Style::default().fg(color));
        let paragraph =
            Paragraph::new(Line::from(Span::styled(toast.text.clone(), Style::default().fg(color))))
                .block(block);

        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }
}
