//! Keyboard routing for each screen.
//!
//! Global: `Esc` / `Ctrl+C` quit. Login and signup: `Ctrl+S` switches between
//! the two. Dashboard: `Ctrl+L` logs out, `Tab` moves between the send form,
//! recharge presets and amount field.

use crate::{App, AppAction, DashboardFocus, KeyInput, Screen};

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if matches!(key, KeyInput::Esc | KeyInput::Ctrl('c')) {
            return self.quit();
        }
        match self.screen {
            Screen::Login => self.login_key(key),
            Screen::Signup => self.signup_key(key),
            Screen::Dashboard => self.dashboard_key(key),
        }
    }

    fn login_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Ctrl('s') => self.show_signup(),
            KeyInput::Tab | KeyInput::BackTab | KeyInput::Up | KeyInput::Down => {
                self.login.focus = self.login.focus.next();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.submit_login(),
            key => {
                let focus = self.login.focus;
                self.login.field_mut(focus).apply(key);
                vec![AppAction::Render]
            },
        }
    }

    fn signup_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Ctrl('s') => self.show_login(),
            KeyInput::Tab | KeyInput::Down => {
                self.signup.focus = self.signup.focus.next();
                vec![AppAction::Render]
            },
            KeyInput::BackTab | KeyInput::Up => {
                self.signup.focus = self.signup.focus.prev();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.submit_signup(),
            key => {
                let focus = self.signup.focus;
                if self.signup.field_mut(focus).apply(key) {
                    self.signup.clear_error(focus);
                }
                vec![AppAction::Render]
            },
        }
    }

    fn dashboard_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Ctrl('l') {
            return self.logout();
        }
        let Some(dashboard) = self.dashboard.as_mut() else {
            return vec![];
        };
        let focus = dashboard.focus;

        match (key, focus) {
            (KeyInput::Tab | KeyInput::Down, _) => {
                dashboard.focus = focus.next();
                vec![AppAction::Render]
            },
            (KeyInput::BackTab | KeyInput::Up, _) => {
                dashboard.focus = focus.prev();
                vec![AppAction::Render]
            },
            (KeyInput::Enter, DashboardFocus::Recipient | DashboardFocus::Content) => {
                self.submit_message()
            },
            (KeyInput::Enter, DashboardFocus::Presets) => {
                dashboard.recharge.select_highlighted();
                dashboard.focus = DashboardFocus::Amount;
                vec![AppAction::Render]
            },
            (KeyInput::Enter, DashboardFocus::Amount) => self.submit_recharge(),
            (KeyInput::Left, DashboardFocus::Presets) => {
                dashboard.recharge.move_preset(false);
                vec![AppAction::Render]
            },
            (KeyInput::Right, DashboardFocus::Presets) => {
                dashboard.recharge.move_preset(true);
                vec![AppAction::Render]
            },
            (key, DashboardFocus::Recipient) => {
                dashboard.send.recipient.apply(key);
                vec![AppAction::Render]
            },
            (key, DashboardFocus::Content) => {
                dashboard.send.content.apply(key);
                vec![AppAction::Render]
            },
            (key, DashboardFocus::Amount) => {
                dashboard.recharge.edit_amount(key);
                vec![AppAction::Render]
            },
            (_, DashboardFocus::Presets) => vec![],
        }
    }
}
