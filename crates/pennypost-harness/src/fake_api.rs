//! In-memory model of the remote service.
//!
//! [`FakeServer`] keeps the same ledgers and enforces the same rules as the
//! real backend: new accounts start with 100 credits, each message costs one,
//! listings are newest first and capped. [`FakeApi`] implements
//! [`pennypost_client::Api`] over a shared server and, like the HTTP adapter,
//! reads its bearer token from storage on every call.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::DateTime;
use pennypost_client::{Api, ApiError, Storage, TOKEN_KEY};
use pennypost_proto::{
    AccessToken, Balance, Identity, MESSAGE_COST, Message, MessageStatus, NewAccount, Recharge,
    RechargeStatus, SendMessageRequest, Timestamp,
};

/// Credits granted to every new account.
pub const STARTING_CREDITS: i64 = 100;

/// Maximum messages returned by a listing.
pub const MESSAGE_PAGE: usize = 50;

/// Maximum recharges returned by a listing.
pub const RECHARGE_PAGE: usize = 20;

/// 2024-01-01T00:00:00Z, start of the simulated clock.
const CLOCK_EPOCH: i64 = 1_704_067_200;

/// Remote endpoints, for call accounting and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /token`
    Token,
    /// `GET /me`
    Me,
    /// `POST /signup`
    Signup,
    /// `POST /send-message`
    SendMessage,
    /// `GET /messages`
    Messages,
    /// `GET /balance`
    Balance,
    /// `POST /recharge`
    Recharge,
    /// `GET /recharge-history`
    RechargeHistory,
}

/// A one-shot failure queued for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Network failure; no response.
    Transport,
    /// Error response with an optional string detail.
    Rejected {
        /// HTTP status.
        status: u16,
        /// `detail` field of the body.
        detail: Option<String>,
    },
    /// The request task panics.
    Panic,
}

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password: String,
}

/// Server state.
#[derive(Debug, Default)]
pub struct FakeServer {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    messages: Vec<Message>,
    recharges: Vec<Recharge>,
    faults: HashMap<Endpoint, VecDeque<Fault>>,
    calls: Vec<Endpoint>,
    clock: i64,
    issued_tokens: u64,
    next_message_id: i64,
    next_recharge_id: i64,
}

/// Server shared between API handles and the test.
pub type SharedFakeServer = Arc<Mutex<FakeServer>>;

/// Create an empty shared server.
pub fn create_shared_server() -> SharedFakeServer {
    Arc::new(Mutex::new(FakeServer::new()))
}

fn rejected(status: u16, detail: &str) -> ApiError {
    ApiError::Rejected { status, detail: Some(detail.to_string()) }
}

fn unauthorized() -> ApiError {
    rejected(401, "Could not validate credentials")
}

impl FakeServer {
    /// Create an empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account directly, bypassing signup. Returns its id.
    pub fn add_account(&mut self, username: &str, password: &str, credits: i64) -> i64 {
        let id = self.accounts.len() as i64 + 1;
        let created_at = Some(self.tick());
        self.accounts.push(Account {
            identity: Identity {
                id,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                credits,
                created_at,
                is_active: true,
            },
            password: password.to_string(),
        });
        id
    }

    /// Credits held by `username`.
    pub fn credits(&self, username: &str) -> Option<i64> {
        self.find(username).map(|account| account.identity.credits)
    }

    /// Set a user's credits directly.
    pub fn set_credits(&mut self, username: &str, credits: i64) {
        if let Some(account) = self.find_mut(username) {
            account.identity.credits = credits;
        }
    }

    /// Overwrite the status of a stored message.
    pub fn set_message_status(&mut self, message_id: i64, status: MessageStatus) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) {
            message.status = status;
        }
    }

    /// Overwrite the status of a stored recharge.
    pub fn set_recharge_status(&mut self, recharge_id: i64, status: RechargeStatus) {
        if let Some(recharge) = self.recharges.iter_mut().find(|r| r.id == recharge_id) {
            recharge.status = status;
        }
    }

    /// Invalidate every issued token.
    pub fn revoke_tokens(&mut self) {
        self.tokens.clear();
    }

    /// Queue a one-shot fault for the next call to `endpoint`.
    pub fn fail_next(&mut self, endpoint: Endpoint, fault: Fault) {
        self.faults.entry(endpoint).or_default().push_back(fault);
    }

    /// Every call received, in order.
    pub fn calls(&self) -> &[Endpoint] {
        &self.calls
    }

    /// Number of calls received for `endpoint`.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.iter().filter(|call| **call == endpoint).count()
    }

    /// Stored messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Stored recharges, oldest first.
    pub fn recharges(&self) -> &[Recharge] {
        &self.recharges
    }

    fn tick(&mut self) -> Timestamp {
        self.clock += 1;
        Timestamp::new(DateTime::from_timestamp(CLOCK_EPOCH + self.clock, 0).unwrap_or_default())
    }

    fn find(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.identity.username == username)
    }

    fn find_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.identity.username == username)
    }

    fn by_id_mut(&mut self, id: i64) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.identity.id == id)
    }

    fn authenticate(&self, token: Option<&str>) -> Result<Identity, ApiError> {
        token
            .and_then(|token| self.tokens.get(token))
            .and_then(|id| self.accounts.iter().find(|a| a.identity.id == *id))
            .map(|account| account.identity.clone())
            .ok_or_else(unauthorized)
    }

    fn login(&mut self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        let id = match self.find(username) {
            Some(account) if account.password == password => account.identity.id,
            _ => return Err(rejected(401, "Incorrect username or password")),
        };
        self.issued_tokens += 1;
        let token = format!("token-{username}-{}", self.issued_tokens);
        self.tokens.insert(token.clone(), id);
        Ok(AccessToken { access_token: token, token_type: "bearer".to_string() })
    }

    fn signup(&mut self, account: &NewAccount) -> Result<Identity, ApiError> {
        let taken = self.accounts.iter().any(|existing| {
            existing.identity.username == account.username
                || existing.identity.email == account.email
        });
        if taken {
            return Err(rejected(400, "Username or email already registered"));
        }

        let id = self.add_account(&account.username, &account.password, STARTING_CREDITS);
        let identity = self.by_id_mut(id).map(|a| {
            a.identity.email.clone_from(&account.email);
            a.identity.clone()
        });
        identity.ok_or_else(|| ApiError::Decode("account vanished".to_string()))
    }

    fn send_message(
        &mut self,
        sender: &Identity,
        request: &SendMessageRequest,
    ) -> Result<Message, ApiError> {
        let Some(recipient) = self.find(&request.recipient_username) else {
            return Err(rejected(404, "Recipient not found"));
        };
        let recipient_id = recipient.identity.id;
        let recipient_username = recipient.identity.username.clone();

        if sender.credits < MESSAGE_COST {
            return Err(rejected(400, "Insufficient credits"));
        }

        self.next_message_id += 1;
        let message = Message {
            id: self.next_message_id,
            sender_id: sender.id,
            recipient_id,
            content: request.content.clone(),
            status: MessageStatus::Sent,
            created_at: self.tick(),
            sender_username: sender.username.clone(),
            recipient_username,
        };
        self.messages.push(message.clone());
        if let Some(account) = self.by_id_mut(sender.id) {
            account.identity.credits -= MESSAGE_COST;
        }
        Ok(message)
    }

    fn message_listing(&self, user: &Identity) -> Vec<Message> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.sender_id == user.id || m.recipient_id == user.id)
            .take(MESSAGE_PAGE)
            .cloned()
            .collect()
    }

    fn recharge(&mut self, user: &Identity, amount: u32) -> Result<Recharge, ApiError> {
        if amount == 0 {
            return Err(rejected(400, "Recharge amount must be positive"));
        }

        self.next_recharge_id += 1;
        let recharge = Recharge {
            id: self.next_recharge_id,
            user_id: user.id,
            amount: i64::from(amount),
            transaction_id: format!("txn-{:08}", self.next_recharge_id),
            status: RechargeStatus::Completed,
            created_at: self.tick(),
        };
        self.recharges.push(recharge.clone());
        if let Some(account) = self.by_id_mut(user.id) {
            account.identity.credits += i64::from(amount);
        }
        Ok(recharge)
    }

    fn recharge_listing(&self, user: &Identity) -> Vec<Recharge> {
        self.recharges
            .iter()
            .rev()
            .filter(|r| r.user_id == user.id)
            .take(RECHARGE_PAGE)
            .cloned()
            .collect()
    }
}

/// [`Api`] implementation backed by a [`FakeServer`].
#[derive(Clone)]
pub struct FakeApi<S: Storage> {
    server: SharedFakeServer,
    storage: S,
}

impl<S: Storage> FakeApi<S> {
    /// Create an adapter over `server`, authenticating from `storage`.
    pub fn new(server: SharedFakeServer, storage: S) -> Self {
        Self { server, storage }
    }

    /// Lock the shared server.
    pub fn server(&self) -> MutexGuard<'_, FakeServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn call<T>(
        &self,
        endpoint: Endpoint,
        handler: impl FnOnce(&mut FakeServer, Option<&str>) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let fault = {
            let mut server = self.server();
            server.calls.push(endpoint);
            server.faults.get_mut(&endpoint).and_then(VecDeque::pop_front)
        };

        match fault {
            None => {
                let mut server = self.server();
                handler(&mut *server, token.as_deref())
            },
            Some(Fault::Transport) => {
                Err(ApiError::Transport(format!("connection refused ({endpoint:?})")))
            },
            Some(Fault::Rejected { status, detail }) => Err(ApiError::Rejected { status, detail }),
            Some(Fault::Panic) => injected_panic(endpoint),
        }
    }
}

#[allow(clippy::panic, reason = "Fault injection for task-failure paths")]
fn injected_panic<T>(endpoint: Endpoint) -> T {
    tracing::warn!(?endpoint, "injecting request panic");
    panic!("injected panic on {endpoint:?}")
}

impl<S: Storage> Api for FakeApi<S> {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        self.call(Endpoint::Token, |server, _| server.login(username, password))
    }

    async fn profile(&self) -> Result<Identity, ApiError> {
        self.call(Endpoint::Me, |server, token| server.authenticate(token))
    }

    async fn signup(&self, account: &NewAccount) -> Result<Identity, ApiError> {
        self.call(Endpoint::Signup, |server, _| server.signup(account))
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, ApiError> {
        self.call(Endpoint::SendMessage, |server, token| {
            let sender = server.authenticate(token)?;
            server.send_message(&sender, request)
        })
    }

    async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        self.call(Endpoint::Messages, |server, token| {
            let user = server.authenticate(token)?;
            Ok(server.message_listing(&user))
        })
    }

    async fn balance(&self) -> Result<Balance, ApiError> {
        self.call(Endpoint::Balance, |server, token| {
            let user = server.authenticate(token)?;
            Ok(Balance { credits: user.credits })
        })
    }

    async fn recharge(&self, amount: u32) -> Result<Recharge, ApiError> {
        self.call(Endpoint::Recharge, |server, token| {
            let user = server.authenticate(token)?;
            server.recharge(&user, amount)
        })
    }

    async fn recharge_history(&self) -> Result<Vec<Recharge>, ApiError> {
        self.call(Endpoint::RechargeHistory, |server, token| {
            let user = server.authenticate(token)?;
            Ok(server.recharge_listing(&user))
        })
    }
}
