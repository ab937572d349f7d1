//! Session lifecycle tests.
//!
//! A scripted [`Api`] stub authenticates against the same [`MemoryStorage`]
//! the session writes, mirroring how `HttpApi` reads the bearer token.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks on the persisted keys, since storage is the
//! single source of truth for the session.

#![allow(clippy::disallowed_types, reason = "Synchronous stub state only")]

use std::sync::{Arc, Mutex};

use pennypost_client::{
    Api, ApiError, MemoryStorage, SessionService, Storage, TOKEN_KEY, USER_KEY,
    proto::{
        AccessToken, Balance, Identity, Message, NewAccount, Recharge, SendMessageRequest,
    },
};

const GOOD_TOKEN: &str = "token-alice";

#[derive(Default)]
struct Script {
    reject_login: Option<ApiError>,
    reject_profile: Option<ApiError>,
    reject_signup: Option<ApiError>,
    /// Another login lands while the profile request is in flight.
    relogin_during_profile: Option<(String, Identity)>,
    profile_calls: usize,
}

#[derive(Clone)]
struct StubApi {
    storage: MemoryStorage,
    script: Arc<Mutex<Script>>,
}

impl StubApi {
    fn new(storage: MemoryStorage) -> Self {
        Self { storage, script: Arc::new(Mutex::new(Script::default())) }
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }
}

fn alice(credits: i64) -> Identity {
    Identity {
        id: 1,
        username: "alice".into(),
        email: "alice@example.com".into(),
        credits,
        created_at: None,
        is_active: true,
    }
}

impl Api for StubApi {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        if let Some(err) = self.script().reject_login.clone() {
            return Err(err);
        }
        if username == "alice" && password == "secret1" {
            Ok(AccessToken { access_token: GOOD_TOKEN.into(), token_type: "bearer".into() })
        } else {
            Err(ApiError::rejected(401, r#"{"detail": "Incorrect username or password"}"#))
        }
    }

    async fn profile(&self) -> Result<Identity, ApiError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let mut script = self.script();
        script.profile_calls += 1;
        if let Some((fresh_token, identity)) = script.relogin_during_profile.take() {
            self.storage.set(TOKEN_KEY, &fresh_token)?;
            self.storage.set(USER_KEY, &serde_json::to_string(&identity).unwrap())?;
        }
        if let Some(err) = script.reject_profile.clone() {
            return Err(err);
        }
        match token.as_deref() {
            Some(GOOD_TOKEN) => Ok(alice(99)),
            _ => Err(ApiError::rejected(401, r#"{"detail": "Could not validate credentials"}"#)),
        }
    }

    async fn signup(&self, account: &NewAccount) -> Result<Identity, ApiError> {
        if let Some(err) = self.script().reject_signup.clone() {
            return Err(err);
        }
        Ok(Identity {
            id: 2,
            username: account.username.clone(),
            email: account.email.clone(),
            credits: 100,
            created_at: None,
            is_active: true,
        })
    }

    async fn send_message(&self, _request: &SendMessageRequest) -> Result<Message, ApiError> {
        Err(ApiError::Transport("unused".into()))
    }

    async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        Ok(Vec::new())
    }

    async fn balance(&self) -> Result<Balance, ApiError> {
        Ok(Balance { credits: 0 })
    }

    async fn recharge(&self, _amount: u32) -> Result<Recharge, ApiError> {
        Err(ApiError::Transport("unused".into()))
    }

    async fn recharge_history(&self) -> Result<Vec<Recharge>, ApiError> {
        Ok(Vec::new())
    }
}

fn session() -> (SessionService<StubApi, MemoryStorage>, StubApi, MemoryStorage) {
    let storage = MemoryStorage::new();
    let api = StubApi::new(storage.clone());
    (SessionService::new(api.clone(), storage.clone()), api, storage)
}

#[tokio::test]
async fn login_persists_token_and_identity() {
    let (session, _api, storage) = session();

    let identity = session.login("alice", "secret1").await.unwrap();

    assert_eq!(identity.username, "alice");
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some(GOOD_TOKEN));
    assert!(storage.get(USER_KEY).unwrap().is_some());
    assert!(session.is_authenticated());
    assert_eq!(session.current(), Some(alice(99)));
}

#[tokio::test]
async fn login_with_bad_credentials_reports_server_detail() {
    let (session, _api, storage) = session();

    let failure = session.login("alice", "wrong").await.unwrap_err();

    assert_eq!(failure.message, "Incorrect username or password");
    assert!(storage.is_empty());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn login_transport_failure_uses_generic_message() {
    let (session, api, _storage) = session();
    api.script().reject_login = Some(ApiError::Transport("connection refused".into()));

    let failure = session.login("alice", "secret1").await.unwrap_err();

    assert_eq!(failure.message, "Login failed");
}

#[tokio::test]
async fn failed_profile_after_login_leaves_no_partial_session() {
    let (session, api, storage) = session();
    api.script().reject_profile = Some(ApiError::Decode("truncated body".into()));

    let failure = session.login("alice", "secret1").await.unwrap_err();

    assert_eq!(failure.message, "Login failed");
    assert!(storage.is_empty(), "token must not outlive a failed login");
}

#[tokio::test]
async fn signup_does_not_log_in() {
    let (session, _api, storage) = session();
    let account = NewAccount {
        username: "carol".into(),
        email: "carol@example.com".into(),
        password: "secret1".into(),
    };

    let created = session.signup(&account).await.unwrap();

    assert_eq!(created.username, "carol");
    assert!(storage.is_empty());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn signup_failure_reports_detail_or_fallback() {
    let (session, api, _storage) = session();
    let account = NewAccount {
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: "secret1".into(),
    };

    api.script().reject_signup =
        Some(ApiError::rejected(400, r#"{"detail": "Username or email already registered"}"#));
    let failure = session.signup(&account).await.unwrap_err();
    assert_eq!(failure.message, "Username or email already registered");

    api.script().reject_signup = Some(ApiError::Transport("reset".into()));
    let failure = session.signup(&account).await.unwrap_err();
    assert_eq!(failure.message, "Signup failed");
}

#[tokio::test]
async fn restore_exposes_cached_identity_without_network() {
    let (session, api, storage) = session();
    storage.set(TOKEN_KEY, GOOD_TOKEN).unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&alice(5)).unwrap()).unwrap();

    let restored = session.restore();

    assert_eq!(restored, Some(alice(5)));
    assert_eq!(api.script().profile_calls, 0);
}

#[tokio::test]
async fn restore_requires_both_keys() {
    let (session, _api, storage) = session();
    storage.set(TOKEN_KEY, GOOD_TOKEN).unwrap();
    assert_eq!(session.restore(), None);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

    storage.remove(TOKEN_KEY).unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&alice(5)).unwrap()).unwrap();
    assert_eq!(session.restore(), None);
}

#[tokio::test]
async fn restore_discards_corrupt_snapshot() {
    let (session, _api, storage) = session();
    storage.set(TOKEN_KEY, GOOD_TOKEN).unwrap();
    storage.set(USER_KEY, "{not json").unwrap();

    assert_eq!(session.restore(), None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn verify_refreshes_snapshot() {
    let (session, _api, storage) = session();
    storage.set(TOKEN_KEY, GOOD_TOKEN).unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&alice(5)).unwrap()).unwrap();

    let fresh = session.verify().await.unwrap();

    assert_eq!(fresh.credits, 99);
    assert_eq!(session.current(), Some(alice(99)));
}

#[tokio::test]
async fn verify_failure_logs_out() {
    let (session, _api, storage) = session();
    storage.set(TOKEN_KEY, "revoked").unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&alice(5)).unwrap()).unwrap();

    assert!(session.restore().is_some());
    assert!(session.verify().await.is_err());

    assert!(storage.is_empty());
    assert!(!session.is_authenticated());
}

fn bob() -> Identity {
    Identity {
        id: 2,
        username: "bob".into(),
        email: "bob@example.com".into(),
        credits: 100,
        created_at: None,
        is_active: true,
    }
}

#[tokio::test]
async fn late_verify_failure_keeps_newer_login() {
    let (session, api, storage) = session();
    storage.set(TOKEN_KEY, "revoked").unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&alice(5)).unwrap()).unwrap();
    api.script().relogin_during_profile = Some(("token-bob".into(), bob()));

    assert!(session.verify().await.is_err());

    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("token-bob"));
    assert_eq!(session.current(), Some(bob()));
}

#[tokio::test]
async fn late_verify_success_keeps_newer_snapshot() {
    let (session, api, storage) = session();
    storage.set(TOKEN_KEY, GOOD_TOKEN).unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&alice(5)).unwrap()).unwrap();
    api.script().relogin_during_profile = Some(("token-bob".into(), bob()));

    assert_eq!(session.verify().await.unwrap(), alice(99));

    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("token-bob"));
    assert_eq!(session.current(), Some(bob()));
}

#[tokio::test]
async fn logout_is_idempotent() {
    let (session, _api, storage) = session();
    session.login("alice", "secret1").await.unwrap();

    session.logout();
    session.logout();

    assert!(storage.is_empty());
    assert_eq!(session.current(), None);
}
