//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the interactive
//! state of the client completely decoupled from I/O and HTTP mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Routes between the login, signup and dashboard screens. The dashboard is
//!   only reachable with a session.
//! - Owns form state and turns valid submissions into requests.
//! - Applies request completions to the mounted dashboard. Completions that
//!   arrive after their screen was left are dropped.
//! - Queues transient notifications.

use pennypost_proto::Identity;

use crate::{
    AppAction, AppEvent, Dashboard, DashboardFocus, Notifications, RequestKind, Screen, SessionState,
    form::{LoginField, LoginForm, MessageField, SignupField, SignupForm},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Visible screen.
    pub(crate) screen: Screen,
    /// Session as last reported.
    pub(crate) session: SessionState,
    /// Login form.
    pub(crate) login: LoginForm,
    /// Signup form.
    pub(crate) signup: SignupForm,
    /// Mounted dashboard. `Some` only while [`Screen::Dashboard`] is shown.
    pub(crate) dashboard: Option<Dashboard>,
    /// Visible toasts.
    pub(crate) notifications: Notifications,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an anonymous App on the login screen.
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            session: SessionState::Anonymous,
            login: LoginForm::default(),
            signup: SignupForm::default(),
            dashboard: None,
            notifications: Notifications::new(),
            terminal_size: (80, 24),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => {
                if self.notifications.tick() {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::SessionRestored { identity } => {
                let balance = identity.credits;
                self.session = SessionState::Authenticated { identity, verified: false };
                let mut actions = vec![AppAction::VerifySession];
                actions.extend(self.enter_dashboard(balance));
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::SessionVerified { identity } => {
                match &mut self.session {
                    SessionState::Authenticated { identity: current, verified }
                        if !*verified && current.id == identity.id =>
                    {
                        *current = identity;
                        *verified = true;
                        vec![AppAction::Render]
                    },
                    _ => {
                        tracing::debug!(
                            username = %identity.username,
                            "dropping stale session verification"
                        );
                        vec![]
                    },
                }
            },
            AppEvent::LoggedIn { identity } => {
                let balance = identity.credits;
                self.login.reset();
                self.session = SessionState::Authenticated { identity, verified: true };
                self.notifications.success("Login successful!");
                let mut actions = self.enter_dashboard(balance);
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::SignedUp { .. } => {
                self.signup.reset();
                self.notifications.success("Account created successfully! Please login.");
                if !self.session.is_authenticated() {
                    self.login.reset();
                    self.screen = Screen::Login;
                }
                vec![AppAction::Render]
            },
            AppEvent::BalanceLoaded { credits } => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.balance = credits;
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            AppEvent::MessagesLoaded { messages } => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.messages.replace(messages);
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            AppEvent::RechargesLoaded { recharges } => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.recharges.replace(recharges);
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            AppEvent::MessageSent { .. } => {
                let Some(dashboard) = self.dashboard.as_mut() else {
                    return vec![];
                };
                dashboard.send.pending = false;
                dashboard.send.clear();
                if dashboard.focus == DashboardFocus::Content {
                    dashboard.focus = DashboardFocus::Recipient;
                }
                dashboard.message_refresh.bump();
                self.notifications.success("Message sent successfully!");

                let mut actions = vec![AppAction::FetchBalance];
                actions.extend(dashboard.sync());
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::Recharged { recharge } => {
                let Some(dashboard) = self.dashboard.as_mut() else {
                    return vec![];
                };
                dashboard.recharge.pending = false;
                dashboard.recharge.amount.clear();
                dashboard.recharge_refresh.bump();
                self.notifications
                    .success(format!("Successfully recharged {} credits!", recharge.amount));

                let mut actions = vec![AppAction::FetchBalance];
                actions.extend(dashboard.sync());
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::RequestFailed { kind, message } => self.request_failed(kind, message),
            AppEvent::RequestAborted { kind } => {
                self.request_failed(kind, kind.fallback_message().to_string())
            },
        }
    }

    fn request_failed(&mut self, kind: RequestKind, message: String) -> Vec<AppAction> {
        match kind {
            RequestKind::Login => {
                self.login.pending = false;
                self.notifications.error(message);
                vec![AppAction::Render]
            },
            RequestKind::Signup => {
                self.signup.pending = false;
                self.notifications.error(message);
                vec![AppAction::Render]
            },
            RequestKind::VerifySession => {
                // Only an unverified (restored) session is invalidated.
                if matches!(self.session, SessionState::Authenticated { verified: false, .. }) {
                    self.sign_out();
                    vec![AppAction::Logout, AppAction::Render]
                } else {
                    vec![]
                }
            },
            RequestKind::Balance => vec![],
            RequestKind::Messages => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.messages.fetch_failed();
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            RequestKind::RechargeHistory => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.recharges.fetch_failed();
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            RequestKind::SendMessage => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.send.pending = false;
                    self.notifications.error(message);
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            RequestKind::Recharge => match self.dashboard.as_mut() {
                Some(dashboard) => {
                    dashboard.recharge.pending = false;
                    self.notifications.error(message);
                    vec![AppAction::Render]
                },
                None => vec![],
            },
        }
    }

    fn enter_dashboard(&mut self, balance: i64) -> Vec<AppAction> {
        let mut dashboard = Dashboard::new(balance);
        let actions = dashboard.mount();
        self.dashboard = Some(dashboard);
        self.screen = Screen::Dashboard;
        actions
    }

    fn sign_out(&mut self) {
        self.session = SessionState::Anonymous;
        self.dashboard = None;
        self.login.reset();
        self.screen = Screen::Login;
    }

    /// Submit the login form. No-op while a field is empty or a login is
    /// pending.
    pub fn submit_login(&mut self) -> Vec<AppAction> {
        if self.screen != Screen::Login || !self.login.can_submit() {
            return vec![];
        }
        self.login.pending = true;
        vec![
            AppAction::Login {
                username: self.login.username.value().to_string(),
                password: self.login.password.value().to_string(),
            },
            AppAction::Render,
        ]
    }

    /// Validate and submit the signup form. Invalid input only updates the
    /// field errors.
    pub fn submit_signup(&mut self) -> Vec<AppAction> {
        if self.screen != Screen::Signup || self.signup.pending {
            return vec![];
        }
        if !self.signup.validate() {
            return vec![AppAction::Render];
        }
        self.signup.pending = true;
        vec![AppAction::Signup { account: self.signup.account() }, AppAction::Render]
    }

    /// Send the message in the send form.
    pub fn submit_message(&mut self) -> Vec<AppAction> {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return vec![];
        };
        if !dashboard.send.can_submit() {
            return vec![];
        }
        dashboard.send.pending = true;
        vec![AppAction::SendMessage { request: dashboard.send.request() }, AppAction::Render]
    }

    /// Recharge by the amount in the recharge form. A zero or unparsable
    /// amount is refused locally without a request.
    pub fn submit_recharge(&mut self) -> Vec<AppAction> {
        let Some(dashboard) = self.dashboard.as_mut() else {
            return vec![];
        };
        if !dashboard.recharge.can_submit() {
            return vec![];
        }
        match dashboard.recharge.parsed_amount() {
            Some(amount) => {
                dashboard.recharge.pending = true;
                vec![AppAction::Recharge { amount }, AppAction::Render]
            },
            None => {
                self.notifications.error("Please enter a valid amount");
                vec![AppAction::Render]
            },
        }
    }

    /// Fill the recharge amount with a preset value.
    pub fn select_preset(&mut self, value: u32) -> Vec<AppAction> {
        match self.dashboard.as_mut() {
            Some(dashboard) => {
                dashboard.recharge.select_preset(value);
                vec![AppAction::Render]
            },
            None => vec![],
        }
    }

    /// End the session and return to the login screen.
    pub fn logout(&mut self) -> Vec<AppAction> {
        if !self.session.is_authenticated() {
            return vec![];
        }
        self.sign_out();
        vec![AppAction::Logout, AppAction::Render]
    }

    /// Switch to the signup screen. Only while anonymous.
    pub fn show_signup(&mut self) -> Vec<AppAction> {
        if self.session.is_authenticated() || self.auth_pending() {
            return vec![];
        }
        self.signup.reset();
        self.screen = Screen::Signup;
        vec![AppAction::Render]
    }

    /// Switch to the login screen. Only while anonymous.
    pub fn show_login(&mut self) -> Vec<AppAction> {
        if self.session.is_authenticated() || self.auth_pending() {
            return vec![];
        }
        self.login.reset();
        self.screen = Screen::Login;
        vec![AppAction::Render]
    }

    fn auth_pending(&self) -> bool {
        self.login.pending || self.signup.pending
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Replace a login field's contents.
    pub fn set_login_field(&mut self, field: LoginField, value: &str) {
        self.login.field_mut(field).set(value);
    }

    /// Replace a signup field's contents, clearing its error.
    pub fn set_signup_field(&mut self, field: SignupField, value: &str) {
        self.signup.field_mut(field).set(value);
        self.signup.clear_error(field);
    }

    /// Replace a send-form field's contents.
    pub fn set_message_field(&mut self, field: MessageField, value: &str) {
        if let Some(dashboard) = self.dashboard.as_mut() {
            dashboard.send.field_mut(field).set(value);
        }
    }

    /// Replace the recharge amount. Non-digits are discarded.
    pub fn set_recharge_amount(&mut self, value: &str) {
        if let Some(dashboard) = self.dashboard.as_mut() {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            dashboard.recharge.amount.set(&digits);
        }
    }

    /// Visible screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Current user, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    /// Login form.
    pub fn login_form(&self) -> &LoginForm {
        &self.login
    }

    /// Signup form.
    pub fn signup_form(&self) -> &SignupForm {
        &self.signup
    }

    /// Mounted dashboard, if on the dashboard screen.
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Visible notifications.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

#[cfg(test)]
mod tests {
    use pennypost_proto::{Message, MessageStatus, Recharge, RechargeStatus, Timestamp};

    use super::*;
    use crate::{KeyInput, NotificationKind};

    fn alice() -> Identity {
        Identity {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            credits: 100,
            created_at: None,
            is_active: true,
        }
    }

    fn logged_in() -> App {
        let mut app = App::new();
        app.handle(AppEvent::LoggedIn { identity: alice() });
        app
    }

    fn message(id: i64) -> Message {
        Message {
            id,
            sender_id: 1,
            recipient_id: 2,
            content: "hi".into(),
            status: MessageStatus::Sent,
            created_at: Timestamp::now(),
            sender_username: "alice".into(),
            recipient_username: "bob".into(),
        }
    }

    fn recharge(amount: i64) -> Recharge {
        Recharge {
            id: 1,
            user_id: 1,
            amount,
            transaction_id: "txn".into(),
            status: RechargeStatus::Completed,
            created_at: Timestamp::now(),
        }
    }

    fn latest_text(app: &App) -> Option<(NotificationKind, String)> {
        app.notifications().latest().map(|n| (n.kind, n.text.clone()))
    }

    #[test]
    fn starts_anonymous_on_login() {
        let app = App::new();
        assert_eq!(app.screen(), Screen::Login);
        assert!(app.identity().is_none());
        assert!(app.dashboard().is_none());
    }

    #[test]
    fn login_disabled_until_fields_filled() {
        let mut app = App::new();
        assert!(app.submit_login().is_empty());

        app.set_login_field(LoginField::Username, "alice");
        assert!(app.submit_login().is_empty());

        app.set_login_field(LoginField::Password, "secret1");
        let actions = app.submit_login();
        assert_eq!(
            actions[0],
            AppAction::Login { username: "alice".into(), password: "secret1".into() }
        );

        // Pending: a second submit does nothing.
        assert!(app.submit_login().is_empty());
    }

    #[test]
    fn login_success_mounts_dashboard() {
        let mut app = App::new();
        let actions = app.handle(AppEvent::LoggedIn { identity: alice() });

        assert_eq!(app.screen(), Screen::Dashboard);
        assert_eq!(app.dashboard().map(|d| d.balance), Some(100));
        assert!(actions.contains(&AppAction::FetchBalance));
        assert!(actions.contains(&AppAction::FetchMessages));
        assert!(actions.contains(&AppAction::FetchRechargeHistory));
        assert_eq!(
            latest_text(&app),
            Some((NotificationKind::Success, "Login successful!".into()))
        );
    }

    #[test]
    fn login_failure_reenables_form() {
        let mut app = App::new();
        app.set_login_field(LoginField::Username, "alice");
        app.set_login_field(LoginField::Password, "wrong");
        app.submit_login();

        app.handle(AppEvent::RequestFailed {
            kind: RequestKind::Login,
            message: "Incorrect username or password".into(),
        });

        assert!(!app.login_form().pending);
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(
            latest_text(&app),
            Some((NotificationKind::Error, "Incorrect username or password".into()))
        );
    }

    #[test]
    fn restored_session_verifies_and_mounts() {
        let mut app = App::new();
        let actions = app.handle(AppEvent::SessionRestored { identity: alice() });

        assert_eq!(actions[0], AppAction::VerifySession);
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(matches!(app.session(), SessionState::Authenticated { verified: false, .. }));

        let mut fresh = alice();
        fresh.credits = 42;
        app.handle(AppEvent::SessionVerified { identity: fresh });
        assert_eq!(app.identity().map(|i| i.credits), Some(42));
        // Balance card keeps the mount-time value until the balance fetch lands.
        assert_eq!(app.dashboard().map(|d| d.balance), Some(100));
    }

    #[test]
    fn failed_verification_logs_out() {
        let mut app = App::new();
        app.handle(AppEvent::SessionRestored { identity: alice() });

        let actions = app.handle(AppEvent::RequestFailed {
            kind: RequestKind::VerifySession,
            message: "Session expired".into(),
        });

        assert_eq!(actions, vec![AppAction::Logout, AppAction::Render]);
        assert_eq!(app.screen(), Screen::Login);
        assert!(app.dashboard().is_none());
    }

    #[test]
    fn late_verification_ignored_after_relogin() {
        let mut app = App::new();
        app.handle(AppEvent::SessionRestored { identity: alice() });
        app.logout();

        let mut bob = alice();
        bob.id = 2;
        bob.username = "bob".into();
        app.handle(AppEvent::LoggedIn { identity: bob });

        let actions = app.handle(AppEvent::SessionVerified { identity: alice() });

        assert!(actions.is_empty());
        assert_eq!(app.identity().map(|i| i.username.as_str()), Some("bob"));
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn verification_does_not_replace_verified_identity() {
        let mut app = logged_in();

        let mut stale = alice();
        stale.credits = 7;
        app.handle(AppEvent::SessionVerified { identity: stale });

        assert_eq!(app.identity().map(|i| i.credits), Some(100));
    }

    #[test]
    fn screen_switch_blocked_while_login_pending() {
        let mut app = App::new();
        app.set_login_field(LoginField::Username, "alice");
        app.set_login_field(LoginField::Password, "secret1");
        assert_eq!(app.submit_login().len(), 2);

        assert!(app.handle(AppEvent::Key(KeyInput::Ctrl('s'))).is_empty());
        assert!(app.handle(AppEvent::Key(KeyInput::Ctrl('s'))).is_empty());

        assert_eq!(app.screen(), Screen::Login);
        assert!(app.login_form().pending);
        assert!(!app.submit_login().iter().any(|a| matches!(a, AppAction::Login { .. })));
    }

    #[test]
    fn signup_validation_blocks_request() {
        let mut app = App::new();
        app.show_signup();
        let actions = app.submit_signup();
        assert_eq!(actions, vec![AppAction::Render]);
        assert!(app.signup_form().has_errors());
        assert!(!app.signup_form().pending);
    }

    #[test]
    fn signup_success_routes_to_login() {
        let mut app = App::new();
        app.show_signup();
        app.set_signup_field(SignupField::Username, "carol");
        app.set_signup_field(SignupField::Email, "carol@example.com");
        app.set_signup_field(SignupField::Password, "secret1");
        app.set_signup_field(SignupField::Confirm, "secret1");

        let actions = app.submit_signup();
        assert!(matches!(actions[0], AppAction::Signup { .. }));

        let mut carol = alice();
        carol.username = "carol".into();
        app.handle(AppEvent::SignedUp { identity: carol });

        assert_eq!(app.screen(), Screen::Login);
        assert!(app.identity().is_none());
        assert_eq!(
            latest_text(&app),
            Some((
                NotificationKind::Success,
                "Account created successfully! Please login.".into()
            ))
        );
    }

    #[test]
    fn message_sent_refreshes_history_and_balance() {
        let mut app = logged_in();
        app.handle(AppEvent::MessagesLoaded { messages: vec![] });
        app.set_message_field(MessageField::Recipient, "bob");
        app.set_message_field(MessageField::Content, "hi");
        app.submit_message();

        let actions = app.handle(AppEvent::MessageSent { message: message(1) });

        assert_eq!(
            actions,
            vec![AppAction::FetchBalance, AppAction::FetchMessages, AppAction::Render]
        );
        let dashboard = app.dashboard().map(|d| (d.send.pending, d.send.recipient.is_empty()));
        assert_eq!(dashboard, Some((false, true)));
    }

    #[test]
    fn invalid_recharge_never_calls_server() {
        let mut app = logged_in();
        app.set_recharge_amount("0");
        let actions = app.submit_recharge();

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(
            latest_text(&app),
            Some((NotificationKind::Error, "Please enter a valid amount".into()))
        );
    }

    #[test]
    fn empty_recharge_is_disabled() {
        let mut app = logged_in();
        assert!(app.submit_recharge().is_empty());
    }

    #[test]
    fn recharge_success_refreshes_recharge_history() {
        let mut app = logged_in();
        app.select_preset(25);
        let actions = app.submit_recharge();
        assert_eq!(actions[0], AppAction::Recharge { amount: 25 });

        let actions = app.handle(AppEvent::Recharged { recharge: recharge(25) });
        assert_eq!(
            actions,
            vec![AppAction::FetchBalance, AppAction::FetchRechargeHistory, AppAction::Render]
        );
        assert_eq!(
            latest_text(&app),
            Some((NotificationKind::Success, "Successfully recharged 25 credits!".into()))
        );
        assert_eq!(app.dashboard().map(|d| d.recharge.amount.is_empty()), Some(true));
    }

    #[test]
    fn history_failure_keeps_list_and_stops_loading() {
        let mut app = logged_in();
        app.handle(AppEvent::MessagesLoaded { messages: vec![message(1)] });
        let toasts = app.notifications().items().len();
        app.handle(AppEvent::RequestFailed {
            kind: RequestKind::Messages,
            message: "Failed to fetch messages".into(),
        });

        let view = app.dashboard().map(|d| (d.messages.items().len(), d.messages.is_loading()));
        assert_eq!(view, Some((1, false)));
        assert_eq!(app.notifications().items().len(), toasts);
    }

    #[test]
    fn aborted_send_reenables_button() {
        let mut app = logged_in();
        app.set_message_field(MessageField::Recipient, "bob");
        app.set_message_field(MessageField::Content, "hi");
        app.submit_message();

        app.handle(AppEvent::RequestAborted { kind: RequestKind::SendMessage });

        assert_eq!(app.dashboard().map(|d| d.send.pending), Some(false));
        assert_eq!(
            latest_text(&app),
            Some((NotificationKind::Error, "Failed to send message".into()))
        );
    }

    #[test]
    fn late_completions_after_logout_are_dropped() {
        let mut app = logged_in();
        app.logout();

        assert!(app.handle(AppEvent::BalanceLoaded { credits: 5 }).is_empty());
        assert!(app.handle(AppEvent::MessagesLoaded { messages: vec![message(1)] }).is_empty());
        assert!(app.handle(AppEvent::Recharged { recharge: recharge(10) }).is_empty());
        assert!(app.dashboard().is_none());
    }

    #[test]
    fn last_balance_response_wins() {
        let mut app = logged_in();
        app.handle(AppEvent::BalanceLoaded { credits: 99 });
        app.handle(AppEvent::BalanceLoaded { credits: 98 });
        assert_eq!(app.dashboard().map(|d| d.balance), Some(98));
    }

    #[test]
    fn logout_is_only_offered_with_session() {
        let mut app = App::new();
        assert!(app.logout().is_empty());

        let mut app = logged_in();
        assert_eq!(app.logout(), vec![AppAction::Logout, AppAction::Render]);
        assert_eq!(app.screen(), Screen::Login);
    }

    #[test]
    fn tick_renders_only_on_expiry() {
        let mut app = App::new();
        assert!(app.handle(AppEvent::Tick).is_empty());

        app.handle(AppEvent::LoggedIn { identity: alice() });
        let mut renders = 0;
        for _ in 0..crate::SUCCESS_TTL_TICKS {
            renders += app.handle(AppEvent::Tick).len();
        }
        assert_eq!(renders, 1);
        assert!(app.notifications().is_empty());
    }
}
