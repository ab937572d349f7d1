//! Message and recharge history lists

use pennypost_app::History;
use pennypost_proto::{Identity, Message, Recharge};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph, Wrap},
};

use super::status::badge;

const BORDER_SIZE: u16 = 2;

/// Display name for a participant, `You` for the signed-in user.
fn participant(id: i64, username: &str, me: Option<&Identity>) -> String {
    match me {
        Some(me) if me.id == id => "You".to_string(),
        _ => username.to_string(),
    }
}

/// Render the message history, newest first.
pub fn render_messages(
    frame: &mut Frame,
    history: &History<Message>,
    me: Option<&Identity>,
    area: Rect,
) {
    let block = Block::bordered().title(" Message History ");

    if let Some(placeholder) = placeholder(history, "No messages yet. Send your first message!") {
        frame.render_widget(placeholder.block(block), area);
        return;
    }

    let items: Vec<ListItem> = history
        .items()
        .iter()
        .map(|msg| {
            let from = participant(msg.sender_id, &msg.sender_username, me);
            let to = participant(msg.recipient_id, &msg.recipient_username, me);

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("{from} -> {to}"),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    badge(msg.status.as_str(), msg.status.tone()),
                    Span::styled(
                        format!(" {}", msg.created_at.to_local_string()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::raw(format!("  {}", msg.content))),
            ])
        })
        .collect();

    frame.render_widget(List::new(visible(items, area)).block(block), area);
}

/// Render the recharge history, newest first.
pub fn render_recharges(frame: &mut Frame, history: &History<Recharge>, area: Rect) {
    let block = Block::bordered().title(" Recharge History ");

    if let Some(placeholder) = placeholder(history, "No recharge history yet.") {
        frame.render_widget(placeholder.block(block), area);
        return;
    }

    let items: Vec<ListItem> = history
        .items()
        .iter()
        .map(|recharge| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("+{} credits", recharge.amount),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    badge(recharge.status.as_str(), recharge.status.tone()),
                    Span::styled(
                        format!(" {}", recharge.created_at.to_local_string()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  Transaction: {}", recharge.transaction_id),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    frame.render_widget(List::new(visible(items, area)).block(block), area);
}

/// Loading or empty-state text, if the list has nothing to show.
fn placeholder<T>(history: &History<T>, empty: &'static str) -> Option<Paragraph<'static>> {
    let text = if history.is_loading() {
        "Loading..."
    } else if history.is_empty() {
        empty
    } else {
        return None;
    };

    Some(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))))
            .wrap(Wrap { trim: true }),
    )
}

/// Items that fit in the area. Each entry takes two rows.
fn visible(items: Vec<ListItem<'static>>, area: Rect) -> Vec<ListItem<'static>> {
    let rows = usize::from(area.height.saturating_sub(BORDER_SIZE) / 2);
    items.into_iter().take(rows.max(1)).collect()
}
