//! End-to-end flows through the production Runtime against the fake server.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - App state reflects the server's ledgers (balance, histories)
//! - Persisted session keys match the session state
//! - No invariant was violated at any render

use pennypost_app::{AppEvent, KeyInput, NotificationKind, Screen, SessionState};
use pennypost_client::{MemoryStorage, Storage, TOKEN_KEY, USER_KEY};
use pennypost_harness::{
    Endpoint, Fault, SharedFakeServer, SimDriver, SimRuntime, create_shared_server, sim_runtime,
};
use pennypost_proto::{MessageStatus, StatusTone};

fn server() -> SharedFakeServer {
    let server = create_shared_server();
    {
        let mut guard = server.lock().unwrap();
        guard.add_account("alice", "secret1", 100);
        guard.add_account("bob", "secret2", 100);
    }
    server
}

fn key(runtime: &mut SimRuntime, key: KeyInput) {
    runtime.dispatch(AppEvent::Key(key)).unwrap();
}

fn type_text(runtime: &mut SimRuntime, text: &str) {
    for c in text.chars() {
        key(runtime, KeyInput::Char(c));
    }
}

fn latest(runtime: &SimRuntime) -> Option<(NotificationKind, String)> {
    runtime.app().notifications().latest().map(|n| (n.kind, n.text.clone()))
}

fn assert_clean(driver: &SimDriver) {
    assert!(driver.violations().is_empty(), "violations: {:?}", driver.violations());
}

async fn logged_in(server: &SharedFakeServer, storage: MemoryStorage) -> (SimRuntime, SimDriver) {
    let (mut runtime, driver) = sim_runtime(server, storage);
    runtime.start().unwrap();
    type_text(&mut runtime, "alice");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "secret1");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();
    assert_eq!(runtime.app().screen(), Screen::Dashboard);
    (runtime, driver)
}

/// Focus the send form and fill it in.
fn compose(runtime: &mut SimRuntime, recipient: &str, content: &str) {
    type_text(runtime, recipient);
    key(runtime, KeyInput::Tab);
    type_text(runtime, content);
}

#[tokio::test]
async fn login_mounts_dashboard_and_persists_session() {
    let server = server();
    let storage = MemoryStorage::new();
    let (runtime, driver) = logged_in(&server, storage.clone()).await;

    let dashboard = runtime.app().dashboard().unwrap();
    assert_eq!(dashboard.balance, 100);
    assert!(!dashboard.messages.is_loading());
    assert!(dashboard.messages.is_empty());
    assert!(!dashboard.recharges.is_loading());
    assert_eq!(latest(&runtime), Some((NotificationKind::Success, "Login successful!".into())));

    assert!(storage.get(TOKEN_KEY).unwrap().is_some());
    assert!(storage.get(USER_KEY).unwrap().unwrap().contains("alice"));
    assert_eq!(runtime.in_flight(), 0);
    assert_clean(&driver);
}

#[tokio::test]
async fn wrong_password_stays_on_login() {
    let server = server();
    let storage = MemoryStorage::new();
    let (mut runtime, driver) = sim_runtime(&server, storage.clone());
    runtime.start().unwrap();

    type_text(&mut runtime, "alice");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "nope");
    key(&mut runtime, KeyInput::Enter);
    assert!(runtime.app().login_form().pending);
    runtime.settle().await.unwrap();

    assert_eq!(runtime.app().screen(), Screen::Login);
    assert!(!runtime.app().login_form().pending);
    assert_eq!(
        latest(&runtime),
        Some((NotificationKind::Error, "Incorrect username or password".into()))
    );
    assert!(storage.is_empty());
    assert_clean(&driver);
}

#[tokio::test]
async fn restored_session_is_verified() {
    let server = server();
    let storage = MemoryStorage::new();
    drop(logged_in(&server, storage.clone()).await);

    let (mut runtime, driver) = sim_runtime(&server, storage);
    runtime.start().unwrap();

    // Optimistic: dashboard before any response.
    assert_eq!(runtime.app().screen(), Screen::Dashboard);
    assert!(matches!(runtime.app().session(), SessionState::Authenticated { verified: false, .. }));

    runtime.settle().await.unwrap();
    assert!(matches!(runtime.app().session(), SessionState::Authenticated { verified: true, .. }));
    assert_clean(&driver);
}

#[tokio::test]
async fn revoked_session_logs_out_on_verify() {
    let server = server();
    let storage = MemoryStorage::new();
    drop(logged_in(&server, storage.clone()).await);
    server.lock().unwrap().revoke_tokens();

    let (mut runtime, driver) = sim_runtime(&server, storage.clone());
    runtime.start().unwrap();
    runtime.settle().await.unwrap();

    assert_eq!(runtime.app().screen(), Screen::Login);
    assert!(runtime.app().identity().is_none());
    assert!(storage.is_empty());
    assert_clean(&driver);
}

#[tokio::test]
async fn sending_costs_one_credit_and_lists_message() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;

    compose(&mut runtime, "bob", "hello bob");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    let dashboard = runtime.app().dashboard().unwrap();
    assert_eq!(dashboard.balance, 99);
    assert_eq!(dashboard.messages.items().len(), 1);
    assert_eq!(dashboard.messages.items()[0].recipient_username, "bob");
    assert!(dashboard.send.recipient.is_empty());
    assert!(!dashboard.send.pending);
    assert_eq!(
        latest(&runtime),
        Some((NotificationKind::Success, "Message sent successfully!".into()))
    );

    let server = server.lock().unwrap();
    assert_eq!(server.credits("alice"), Some(99));
    // Mount, plus two re-reads after the send.
    assert_eq!(server.call_count(Endpoint::Balance), 3);
    drop(server);
    assert_clean(&driver);
}

#[tokio::test]
async fn unknown_recipient_reports_server_detail() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;

    compose(&mut runtime, "nobody", "hi");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    assert_eq!(latest(&runtime), Some((NotificationKind::Error, "Recipient not found".into())));
    let dashboard = runtime.app().dashboard().unwrap();
    assert_eq!(dashboard.balance, 100);
    // Failed sends keep the form for correction.
    assert_eq!(dashboard.send.recipient.value(), "nobody");
    assert_clean(&driver);
}

#[tokio::test]
async fn insufficient_credits_rejected() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;
    server.lock().unwrap().set_credits("alice", 0);

    compose(&mut runtime, "bob", "hi");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    assert_eq!(latest(&runtime), Some((NotificationKind::Error, "Insufficient credits".into())));
    assert!(server.lock().unwrap().messages().is_empty());
    assert_clean(&driver);
}

#[tokio::test]
async fn preset_recharge_updates_balance_and_history() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;

    key(&mut runtime, KeyInput::BackTab);
    key(&mut runtime, KeyInput::BackTab);
    key(&mut runtime, KeyInput::Right);
    key(&mut runtime, KeyInput::Enter);
    assert!(runtime.app().dashboard().unwrap().recharge.is_selected(25));
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    let dashboard = runtime.app().dashboard().unwrap();
    assert_eq!(dashboard.balance, 125);
    assert_eq!(dashboard.recharges.items().len(), 1);
    assert_eq!(dashboard.recharges.items()[0].amount, 25);
    assert_eq!(dashboard.recharges.items()[0].status.tone(), StatusTone::Positive);
    assert_eq!(
        latest(&runtime),
        Some((NotificationKind::Success, "Successfully recharged 25 credits!".into()))
    );
    assert_eq!(server.lock().unwrap().credits("alice"), Some(125));
    assert_clean(&driver);
}

#[tokio::test]
async fn zero_recharge_never_reaches_server() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;

    key(&mut runtime, KeyInput::BackTab);
    type_text(&mut runtime, "0");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    assert_eq!(
        latest(&runtime),
        Some((NotificationKind::Error, "Please enter a valid amount".into()))
    );
    assert_eq!(server.lock().unwrap().call_count(Endpoint::Recharge), 0);
    assert_clean(&driver);
}

#[tokio::test]
async fn panicking_request_reenables_controls() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;
    server.lock().unwrap().fail_next(Endpoint::SendMessage, Fault::Panic);

    compose(&mut runtime, "bob", "boom");
    key(&mut runtime, KeyInput::Enter);
    assert!(runtime.app().dashboard().unwrap().send.pending);
    runtime.settle().await.unwrap();

    assert!(!runtime.app().dashboard().unwrap().send.pending);
    assert_eq!(
        latest(&runtime),
        Some((NotificationKind::Error, "Failed to send message".into()))
    );
    assert_clean(&driver);
}

#[tokio::test]
async fn history_failure_shows_empty_state_not_loading() {
    let server = server();
    {
        let mut guard = server.lock().unwrap();
        guard.fail_next(Endpoint::Messages, Fault::Transport);
        guard.fail_next(Endpoint::RechargeHistory, Fault::Rejected { status: 500, detail: None });
    }
    let (runtime, driver) = logged_in(&server, MemoryStorage::new()).await;

    let dashboard = runtime.app().dashboard().unwrap();
    assert!(!dashboard.messages.is_loading());
    assert!(dashboard.messages.is_empty());
    assert!(!dashboard.recharges.is_loading());
    // Fetch failures are logged, not toasted.
    assert_eq!(latest(&runtime), Some((NotificationKind::Success, "Login successful!".into())));
    assert_clean(&driver);
}

#[tokio::test]
async fn unknown_status_is_neutral() {
    let server = server();
    let (mut runtime, driver) = logged_in(&server, MemoryStorage::new()).await;

    compose(&mut runtime, "bob", "first");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();
    let first_id = server.lock().unwrap().messages()[0].id;
    server.lock().unwrap().set_message_status(first_id, MessageStatus::from("queued".to_string()));

    compose(&mut runtime, "bob", "second");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    let items = runtime.app().dashboard().unwrap().messages.items().to_vec();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content, "second");
    assert_eq!(items[0].status.tone(), StatusTone::Positive);
    assert_eq!(items[1].status.as_str(), "queued");
    assert_eq!(items[1].status.tone(), StatusTone::Neutral);
    assert_clean(&driver);
}

#[tokio::test]
async fn logout_clears_session_and_drops_late_results() {
    let server = server();
    let storage = MemoryStorage::new();
    let (mut runtime, driver) = logged_in(&server, storage.clone()).await;

    compose(&mut runtime, "bob", "in flight");
    key(&mut runtime, KeyInput::Enter);
    key(&mut runtime, KeyInput::Ctrl('l'));

    // Cleared before the send completes.
    assert!(storage.is_empty());
    assert_eq!(runtime.app().screen(), Screen::Login);

    runtime.settle().await.unwrap();
    assert_eq!(runtime.app().screen(), Screen::Login);
    assert!(runtime.app().dashboard().is_none());
    assert_clean(&driver);
}

#[tokio::test]
async fn signup_then_login() {
    let server = server();
    let (mut runtime, driver) = sim_runtime(&server, MemoryStorage::new());
    runtime.start().unwrap();

    key(&mut runtime, KeyInput::Ctrl('s'));
    type_text(&mut runtime, "carol");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "carol@example.org");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "secret3");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "secret3");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    assert_eq!(runtime.app().screen(), Screen::Login);
    assert!(runtime.app().identity().is_none());
    assert_eq!(server.lock().unwrap().credits("carol"), Some(100));

    type_text(&mut runtime, "carol");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "secret3");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    assert_eq!(runtime.app().identity().map(|i| i.username.as_str()), Some("carol"));
    assert_eq!(runtime.app().dashboard().unwrap().balance, 100);
    assert_clean(&driver);
}

#[tokio::test]
async fn duplicate_signup_shows_server_detail() {
    let server = server();
    let (mut runtime, driver) = sim_runtime(&server, MemoryStorage::new());
    runtime.start().unwrap();

    key(&mut runtime, KeyInput::Ctrl('s'));
    type_text(&mut runtime, "alice");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "alice2@example.org");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "secret1");
    key(&mut runtime, KeyInput::Tab);
    type_text(&mut runtime, "secret1");
    key(&mut runtime, KeyInput::Enter);
    runtime.settle().await.unwrap();

    assert_eq!(runtime.app().screen(), Screen::Signup);
    assert!(!runtime.app().signup_form().pending);
    assert_eq!(
        latest(&runtime),
        Some((NotificationKind::Error, "Username or email already registered".into()))
    );
    assert_clean(&driver);
}

#[tokio::test]
async fn run_loop_drains_scripted_session() {
    let server = server();
    let storage = MemoryStorage::new();
    let (runtime, driver) = sim_runtime(&server, storage.clone());

    driver.inject_text("alice");
    driver.inject_key(KeyInput::Tab);
    driver.inject_text("secret1");
    driver.inject_key(KeyInput::Enter);
    driver.inject_tick();

    runtime.run().await.unwrap();

    assert!(driver.is_stopped());
    assert!(!driver.has_pending());
    assert_eq!(driver.last_screen(), Some(Screen::Dashboard));
    assert!(storage.get(TOKEN_KEY).unwrap().is_some());
    assert_clean(&driver);
}

#[tokio::test]
async fn escape_quits_run_loop() {
    let server = server();
    let (runtime, driver) = sim_runtime(&server, MemoryStorage::new());
    driver.inject_key(KeyInput::Esc);
    driver.inject_text("ignored");

    runtime.run().await.unwrap();

    assert!(driver.is_stopped());
    assert!(driver.has_pending());
}

#[tokio::test]
async fn render_failure_surfaces_as_error() {
    let server = server();
    let (runtime, driver) = sim_runtime(&server, MemoryStorage::new());
    driver.fail_next_render("terminal gone");

    let err = runtime.run().await.unwrap_err();
    assert_eq!(err.0, "terminal gone");
}
