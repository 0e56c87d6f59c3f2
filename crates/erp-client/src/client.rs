//! HTTP client for the ERP REST API

use crate::{
    envelope::{Envelope, server_message},
    error::{ClientError, ClientResult},
};
use erp_core::config::ApiConfig;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Login endpoint
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// User name
    pub username: &'a str,
    /// Password
    pub password: &'a str,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// User id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Role, e.g. `admin`
    #[serde(default)]
    pub role: String,
}

/// Login response payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token
    pub token: String,
    /// Signed-in user
    pub user: AuthUser,
}

/// API client attaching the bearer token of the current session
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<Arc<str>>>,
}

impl ApiClient {
    /// Client for `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| ClientError::InvalidUrl {
            url: base_url.clone(),
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("erp-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Client configured from the `api` config section
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        Self::new(
            config.base_url.as_str(),
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Start with a known token
    #[must_use]
    pub fn with_token(self, token: impl Into<Arc<str>>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// Replace or clear the bearer token
    pub fn set_token(&self, token: Option<Arc<str>>) {
        *self.token.write() = token;
    }

    /// Current bearer token
    pub fn token(&self) -> Option<Arc<str>> {
        self.token.read().clone()
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign in and keep the returned token for later calls
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the call fails.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let body = LoginRequest { username, password };
        let session: Session = self
            .send(Method::POST, LOGIN_PATH, Some(&body))
            .await?
            .into_data()?;

        self.set_token(Some(Arc::from(session.token.as_str())));
        info!(username = %session.user.username, role = %session.user.role, "signed in");
        Ok(session)
    }

    /// `GET` a path and unwrap its envelope
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a failed envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<(), T>(Method::GET, path, None)
            .await?
            .into_data()
    }

    /// `POST` a JSON body and unwrap the envelope
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a failed envelope.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await?.into_data()
    }

    /// `PUT` a JSON body and unwrap the envelope
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a failed envelope.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body)).await?.into_data()
    }

    /// `DELETE` a path; an empty body counts as success
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a failed envelope.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send::<(), serde_json::Value>(Method::DELETE, path, None)
            .await?
            .into_option()
            .map(drop)
    }

    /// `GET` a health endpoint, which answers plain JSON without an envelope
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable, not 2xx or not JSON.
    pub async fn health(&self, path: &str) -> ClientResult<serde_json::Value> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &url))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: server_message(&body).unwrap_or(body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Status code of a raw request, without reading the envelope
    ///
    /// The session token is attached unless `anonymous` is set.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response arrives.
    pub async fn probe<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        anonymous: bool,
    ) -> ClientResult<StatusCode>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if !anonymous {
            request = self.authorize(request);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &url))?;
        Ok(response.status())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Envelope<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%method, %url, "api request");

        let mut request = self.authorize(self.http.request(method, &url));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &url))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, &url))?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "request unauthorized");
            return Err(ClientError::Unauthorized(
                server_message(&text).unwrap_or_else(|| status.to_string()),
            ));
        }

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: server_message(&text).unwrap_or(text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Envelope::empty());
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.read().is_some())
            .finish_non_exhaustive()
    }
}
