//! Dashboard state: balance, forms and history views.
//!
//! A [`Dashboard`] exists only while the dashboard screen is shown. Creating
//! one is "mounting": its views start in the loading state and fetch on the
//! first [`Dashboard::sync`]. Dropping it discards any late completions.

use pennypost_proto::{Message, Recharge};

use crate::{
    AppAction,
    form::{RechargeForm, SendMessageForm},
    history::{History, RefreshSignal},
};

/// Focusable dashboard controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardFocus {
    /// Send form, recipient field.
    Recipient,
    /// Send form, content field.
    Content,
    /// Recharge preset buttons.
    Presets,
    /// Recharge amount field.
    Amount,
}

impl DashboardFocus {
    /// Next control, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::Recipient => Self::Content,
            Self::Content => Self::Presets,
            Self::Presets => Self::Amount,
            Self::Amount => Self::Recipient,
        }
    }

    /// Previous control, wrapping.
    pub fn prev(self) -> Self {
        match self {
            Self::Recipient => Self::Amount,
            Self::Content => Self::Recipient,
            Self::Presets => Self::Content,
            Self::Amount => Self::Presets,
        }
    }
}

/// Mounted dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Last known credit balance. Whichever balance response lands last wins.
    pub balance: i64,
    /// Bumped after a successful send.
    pub message_refresh: RefreshSignal,
    /// Bumped after a successful recharge.
    pub recharge_refresh: RefreshSignal,
    /// Message history view.
    pub messages: History<Message>,
    /// Recharge history view.
    pub recharges: History<Recharge>,
    /// Send-message form.
    pub send: SendMessageForm,
    /// Recharge form.
    pub recharge: RechargeForm,
    /// Focused control.
    pub focus: DashboardFocus,
}

impl Dashboard {
    /// Mount with the balance from the identity snapshot.
    pub fn new(initial_balance: i64) -> Self {
        Self {
            balance: initial_balance,
            message_refresh: RefreshSignal::default(),
            recharge_refresh: RefreshSignal::default(),
            messages: History::new(),
            recharges: History::new(),
            send: SendMessageForm::default(),
            recharge: RechargeForm::default(),
            focus: DashboardFocus::Recipient,
        }
    }

    /// Fetches to issue right after mounting.
    pub fn mount(&mut self) -> Vec<AppAction> {
        let mut actions = vec![AppAction::FetchBalance];
        actions.extend(self.sync());
        actions
    }

    /// Fetches for every view whose refresh signal changed.
    pub fn sync(&mut self) -> Vec<AppAction> {
        let mut actions = Vec::new();
        if self.messages.observe(self.message_refresh) {
            actions.push(AppAction::FetchMessages);
        }
        if self.recharges.observe(self.recharge_refresh) {
            actions.push(AppAction::FetchRechargeHistory);
        }
        actions
    }
}
