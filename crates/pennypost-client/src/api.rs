//! Remote API adapter.
//!
//! The [`Api`] trait lists the remote operations the client depends on. The
//! production implementation, [`HttpApi`], maps each one onto a REST endpoint
//! and attaches the persisted bearer token when one exists. Simulation
//! implementations live in the harness crate.

use std::future::Future;

use pennypost_proto::{
    AccessToken, Balance, Identity, Message, NewAccount, Recharge, RechargeRequest,
    SendMessageRequest,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{ApiError, ClientConfig, Storage, TOKEN_KEY};

/// Remote operations used by the client.
///
/// Implementations authenticate calls themselves; callers never pass the
/// credential explicitly. Every method is a single request: no retries, no
/// client-side timeout.
pub trait Api: Clone + Send + Sync + 'static {
    /// Exchange credentials for a bearer token.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<AccessToken, ApiError>> + Send;

    /// Profile of the authenticated user.
    fn profile(&self) -> impl Future<Output = Result<Identity, ApiError>> + Send;

    /// Register a new account. Does not authenticate.
    fn signup(
        &self,
        account: &NewAccount,
    ) -> impl Future<Output = Result<Identity, ApiError>> + Send;

    /// Send a message, charged by the server.
    fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> impl Future<Output = Result<Message, ApiError>> + Send;

    /// Messages sent or received by the authenticated user.
    fn messages(&self) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send;

    /// Current credit balance.
    fn balance(&self) -> impl Future<Output = Result<Balance, ApiError>> + Send;

    /// Add credits to the account.
    fn recharge(&self, amount: u32) -> impl Future<Output = Result<Recharge, ApiError>> + Send;

    /// Past recharges of the authenticated user.
    fn recharge_history(&self) -> impl Future<Output = Result<Vec<Recharge>, ApiError>> + Send;
}

/// [`Api`] over HTTP.
///
/// Reads the bearer token from storage on every request, so the adapter needs
/// no notification when the session changes. Clone is cheap.
#[derive(Clone)]
pub struct HttpApi<S: Storage> {
    client: Client,
    config: ClientConfig,
    storage: S,
}

impl<S: Storage> HttpApi<S> {
    /// Create an adapter for the configured server, authenticating from
    /// `storage`.
    pub fn new(config: ClientConfig, storage: S) -> Self {
        Self { client: Client::new(), config, storage }
    }

    /// Configured connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(match self.storage.get(TOKEN_KEY)? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(self.client.get(self.config.endpoint(path)))?;
        tracing::debug!(path, "GET");
        decode(request.send().await?).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authorized(self.client.post(self.config.endpoint(path)))?;
        tracing::debug!(path, "POST");
        decode(request.json(body).send().await?).await
    }
}

impl<S: Storage> Api for HttpApi<S> {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        let request = self
            .client
            .post(self.config.endpoint("/token"))
            .form(&[("username", username), ("password", password)]);
        tracing::debug!(path = "/token", "POST");
        decode(request.send().await?).await
    }

    async fn profile(&self) -> Result<Identity, ApiError> {
        self.get("/me").await
    }

    async fn signup(&self, account: &NewAccount) -> Result<Identity, ApiError> {
        self.post("/signup", account).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, ApiError> {
        self.post("/send-message", request).await
    }

    async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get("/messages").await
    }

    async fn balance(&self) -> Result<Balance, ApiError> {
        self.get("/balance").await
    }

    async fn recharge(&self, amount: u32) -> Result<Recharge, ApiError> {
        self.post("/recharge", &RechargeRequest { amount }).await
    }

    async fn recharge_history(&self) -> Result<Vec<Recharge>, ApiError> {
        self.get("/recharge-history").await
    }
}

/// Decode a success body, or turn a failure status into [`ApiError::Rejected`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "request rejected");
    Err(ApiError::rejected(status.as_u16(), &body))
}
