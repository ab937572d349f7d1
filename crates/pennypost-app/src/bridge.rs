//! Service-to-Application translation layer.
//!
//! The [`Bridge`] wraps the [`SessionService`] and its [`Api`] and adapts them
//! to the application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts request [`crate::AppAction`]s into service and API calls.
//! - Interprets results and converts them back into [`crate::AppEvent`]s to
//!   update the UI.
//! - Produces owned, `'static` futures so the runtime can run requests
//!   concurrently.

use std::future::Future;

use pennypost_client::{Api, SessionService, Storage};

use crate::{AppAction, AppEvent, RequestKind};

/// Bridge between App and the session service.
///
/// Generic over the API adapter and storage to support both production and
/// simulation.
pub struct Bridge<A: Api, S: Storage> {
    session: SessionService<A, S>,
}

impl<A: Api, S: Storage> Bridge<A, S> {
    /// Create a new Bridge over `session`.
    pub fn new(session: SessionService<A, S>) -> Self {
        Self { session }
    }

    /// Underlying session service.
    pub fn session(&self) -> &SessionService<A, S> {
        &self.session
    }

    /// Events for a session cached by a previous run. No network access.
    pub fn restore(&self) -> Vec<AppEvent> {
        match self.session.restore() {
            Some(identity) => vec![AppEvent::SessionRestored { identity }],
            None => vec![],
        }
    }

    /// Execute a local action. Returns false for request actions, which must
    /// go through [`Self::request`].
    pub fn apply_local(&self, action: &AppAction) -> bool {
        match action {
            AppAction::Logout => {
                self.session.logout();
                true
            },
            AppAction::Render | AppAction::Quit => true,
            _ => false,
        }
    }

    /// Owned future performing a request action, tagged with its kind.
    /// `None` for local actions.
    pub fn request(
        &self,
        action: AppAction,
    ) -> Option<(RequestKind, impl Future<Output = Vec<AppEvent>> + Send + 'static)> {
        let kind = action.request_kind()?;
        let session = self.session.clone();
        Some((kind, async move { perform(session, action).await }))
    }

    /// Perform an action to completion in place. Local actions yield no
    /// events.
    pub async fn execute(&self, action: AppAction) -> Vec<AppEvent> {
        if self.apply_local(&action) {
            return vec![];
        }
        perform(self.session.clone(), action).await
    }
}

async fn perform<A: Api, S: Storage>(
    session: SessionService<A, S>,
    action: AppAction,
) -> Vec<AppEvent> {
    let Some(kind) = action.request_kind() else {
        return vec![];
    };
    tracing::debug!(%kind, "request started");

    match action {
        AppAction::Login { username, password } => {
            match session.login(&username, &password).await {
                Ok(identity) => vec![AppEvent::LoggedIn { identity }],
                Err(e) => vec![failed(kind, e.message)],
            }
        },
        AppAction::Signup { account } => match session.signup(&account).await {
            Ok(identity) => vec![AppEvent::SignedUp { identity }],
            Err(e) => vec![failed(kind, e.message)],
        },
        AppAction::VerifySession => match session.verify().await {
            Ok(identity) => vec![AppEvent::SessionVerified { identity }],
            Err(e) => vec![failed(kind, e.message)],
        },
        AppAction::FetchBalance => match session.api().balance().await {
            Ok(balance) => vec![AppEvent::BalanceLoaded { credits: balance.credits }],
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch balance");
                vec![failed(kind, e.user_message(kind.fallback_message()))]
            },
        },
        AppAction::FetchMessages => match session.api().messages().await {
            Ok(messages) => vec![AppEvent::MessagesLoaded { messages }],
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch messages");
                vec![failed(kind, e.user_message(kind.fallback_message()))]
            },
        },
        AppAction::FetchRechargeHistory => match session.api().recharge_history().await {
            Ok(recharges) => vec![AppEvent::RechargesLoaded { recharges }],
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch recharge history");
                vec![failed(kind, e.user_message(kind.fallback_message()))]
            },
        },
        AppAction::SendMessage { request } => {
            let api = session.api();
            let message = match api.send_message(&request).await {
                Ok(message) => message,
                Err(e) => return vec![failed(kind, e.user_message(kind.fallback_message()))],
            };
            tracing::info!(recipient = %request.recipient_username, "message sent");

            // The send form re-reads the balance itself. A failure here is
            // reported against the send even though the message went out.
            let mut events = vec![AppEvent::MessageSent { message }];
            match api.balance().await {
                Ok(balance) => events.push(AppEvent::BalanceLoaded { credits: balance.credits }),
                Err(e) => events.push(failed(kind, e.user_message(kind.fallback_message()))),
            }
            events
        },
        AppAction::Recharge { amount } => match session.api().recharge(amount).await {
            Ok(recharge) => {
                tracing::info!(amount, "recharged");
                vec![AppEvent::Recharged { recharge }]
            },
            Err(e) => vec![failed(kind, e.user_message(kind.fallback_message()))],
        },
        AppAction::Render | AppAction::Quit | AppAction::Logout => vec![],
    }
}

fn failed(kind: RequestKind, message: String) -> AppEvent {
    AppEvent::RequestFailed { kind, message }
}
