//! Login and signup screens

use pennypost_app::{
    App,
    form::{LoginField, SignupField},
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::{INPUT_HEIGHT, button, centered, render_input};

const FORM_WIDTH: u16 = 50;

/// Render the login form.
pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    const FORM_HEIGHT: u16 = 2 + INPUT_HEIGHT * 2 + 2;

    let form = app.login_form();
    let outer = centered(area, FORM_WIDTH, FORM_HEIGHT);
    let block = Block::bordered()
        .title(" Pennypost | Login ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(outer);
    frame.render_widget(block, outer);

    let chunks = Layout::vertical([
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    let [username_area, password_area, button_area, hint_area] = chunks.as_ref() else {
        return;
    };

    render_input(
        frame,
        *username_area,
        "Username",
        &form.username,
        form.focus == LoginField::Username,
        false,
    );
    render_input(
        frame,
        *password_area,
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        true,
    );

    let label = if form.pending { "Logging in..." } else { "Login" };
    frame.render_widget(
        Paragraph::new(Line::from(button(label, form.can_submit()))).centered(),
        *button_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "No account? Press Ctrl+S to sign up",
            Style::default().fg(Color::DarkGray),
        )))
        .centered(),
        *hint_area,
    );
}

/// Render the signup form with per-field validation messages.
pub fn render_signup(frame: &mut Frame, app: &App, area: Rect) {
    const FIELD_HEIGHT: u16 = INPUT_HEIGHT + 1;
    const FORM_HEIGHT: u16 = 2 + FIELD_HEIGHT * 4 + 2;

    let form = app.signup_form();
    let outer = centered(area, FORM_WIDTH, FORM_HEIGHT);
    let block = Block::bordered()
        .title(" Pennypost | Create Account ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(outer);
    frame.render_widget(block, outer);

    let chunks = Layout::vertical([
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    for (field, area) in SignupField::ALL.into_iter().zip(chunks.iter()) {
        let parts = Layout::vertical([Constraint::Length(INPUT_HEIGHT), Constraint::Length(1)])
            .split(*area);
        let [input_area, error_area] = parts.as_ref() else {
            continue;
        };

        let (label, masked) = match field {
            SignupField::Username => ("Username", false),
            SignupField::Email => ("Email", false),
            SignupField::Password => ("Password", true),
            SignupField::Confirm => ("Confirm Password", true),
        };
        render_input(frame, *input_area, label, form.field(field), form.focus == field, masked);

        if let Some(error) = form.error(field) {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {error}"), Style::default().fg(Color::Red))),
                *error_area,
            );
        }
    }

    let [.., button_area, hint_area] = chunks.as_ref() else {
        return;
    };

    let label = if form.pending { "Creating account..." } else { "Sign Up" };
    frame.render_widget(
        Paragraph::new(Line::from(button(label, !form.pending))).centered(),
        *button_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Have an account? Press Ctrl+S to login",
            Style::default().fg(Color::DarkGray),
        )))
        .centered(),
        *hint_area,
    );
}
