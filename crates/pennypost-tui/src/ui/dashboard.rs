//! Dashboard screen
//!
//! Welcome header, stat cards, the send and recharge forms, and both history
//! lists.

use pennypost_app::{App, Dashboard, DashboardFocus};
use pennypost_proto::{MESSAGE_COST, RECHARGE_PRESETS};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::{INPUT_HEIGHT, button, focus_style, history, render_input};

const HEADER_HEIGHT: u16 = 1;
const CARD_HEIGHT: u16 = 4;
const FORMS_HEIGHT: u16 = 2 + INPUT_HEIGHT * 2 + 1;
const BORDERED_MIN: u16 = 3;

/// Render the dashboard.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dashboard) = app.dashboard() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(CARD_HEIGHT),
        Constraint::Length(FORMS_HEIGHT),
        Constraint::Min(BORDERED_MIN),
    ])
    .split(area);

    let [header_area, cards_area, forms_area, history_area] = chunks.as_ref() else {
        return;
    };

    let username = app.identity().map_or("", |identity| identity.username.as_str());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" Welcome, "),
            Span::styled(
                format!("{username}!"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ])),
        *header_area,
    );

    render_cards(frame, dashboard, *cards_area);

    let halves = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]);

    let forms = halves.split(*forms_area);
    if let [send_area, recharge_area] = forms.as_ref() {
        render_send_form(frame, dashboard, *send_area);
        render_recharge_form(frame, dashboard, *recharge_area);
    }

    let lists = halves.split(*history_area);
    if let [messages_area, recharges_area] = lists.as_ref() {
        history::render_messages(frame, &dashboard.messages, app.identity(), *messages_area);
        history::render_recharges(frame, &dashboard.recharges, *recharges_area);
    }
}

/// Stat cards: balance, message cost and account status.
fn render_cards(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let cards = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    let [credits_area, cost_area, status_area] = cards.as_ref() else {
        return;
    };

    let credit_word = if MESSAGE_COST == 1 { "credit" } else { "credits" };
    stat_card(frame, *credits_area, "Available Credits", dashboard.balance.to_string(), Color::Green);
    stat_card(frame, *cost_area, "Message Cost", format!("{MESSAGE_COST} {credit_word}"), Color::Blue);
    stat_card(frame, *status_area, "Account Status", "Active".to_string(), Color::Green);
}

fn stat_card(frame: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let block = Block::bordered().title(format!(" {title} "));
    let paragraph = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_send_form(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let form = &dashboard.send;
    let credit_word = if MESSAGE_COST == 1 { "credit" } else { "credits" };
    let block = Block::bordered()
        .title(format!(" Send Message (costs {MESSAGE_COST} {credit_word}) "))
        .border_style(focus_style(matches!(
            dashboard.focus,
            DashboardFocus::Recipient | DashboardFocus::Content
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
    ])
    .split(inner);

    let [recipient_area, content_area, button_area] = chunks.as_ref() else {
        return;
    };

    render_input(
        frame,
        *recipient_area,
        "Recipient",
        &form.recipient,
        dashboard.focus == DashboardFocus::Recipient,
        false,
    );
    render_input(
        frame,
        *content_area,
        "Message",
        &form.content,
        dashboard.focus == DashboardFocus::Content,
        false,
    );

    let label = if form.pending { "Sending..." } else { "Send" };
    frame.render_widget(
        Paragraph::new(Line::from(button(label, form.can_submit()))).centered(),
        *button_area,
    );
}

fn render_recharge_form(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let form = &dashboard.recharge;
    let block = Block::bordered().title(" Recharge Credits ").border_style(focus_style(matches!(
        dashboard.focus,
        DashboardFocus::Presets | DashboardFocus::Amount
    )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
    ])
    .split(inner);

    let [presets_area, amount_area, button_area] = chunks.as_ref() else {
        return;
    };

    let presets_focused = dashboard.focus == DashboardFocus::Presets;
    let mut spans = Vec::with_capacity(RECHARGE_PRESETS.len() * 2);
    for (index, preset) in RECHARGE_PRESETS.iter().enumerate() {
        let mut style = if form.is_selected(*preset) {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        if presets_focused && index == form.preset_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!(" {preset} "), style));
        spans.push(Span::raw(" "));
    }

    let presets_block =
        Block::bordered().title(" Quick Select ").border_style(focus_style(presets_focused));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(presets_block), *presets_area);

    render_input(
        frame,
        *amount_area,
        "Amount (credits)",
        &form.amount,
        dashboard.focus == DashboardFocus::Amount,
        false,
    );

    let label = if form.pending { "Processing..." } else { "Recharge" };
    frame.render_widget(
        Paragraph::new(Line::from(button(label, form.can_submit()))).centered(),
        *button_area,
    );
}
