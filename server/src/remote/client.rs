//! HTTP client for the remote Service Layer API.
//!
//! The remote service authenticates with a login call that yields an
//! opaque session id; every subsequent request presents it as a
//! `B1SESSION` cookie. Logout invalidates the session and replies 204.

use async_trait::async_trait;
use reqwest::{header, StatusCode, Url};
use serde::{Deserialize, Serialize};
use stocksync_engine::RemoteItem;

use crate::config::Config;
use crate::remote::fetcher::PageSource;

/// Fields requested from the items collection.
const ITEM_SELECT: &str = "ItemCode,ItemName,ItemsGroupCode";
/// Stable ordering keeps page contents reproducible between requests.
const ITEM_ORDER: &str = "ItemCode";
/// Session cookie understood by the remote service.
const SESSION_COOKIE: &str = "B1SESSION";

/// Errors from the remote API client.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request rejected with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid request: {0}")]
    Request(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Opaque session credential returned by login.
#[derive(Debug, Clone)]
pub struct SessionToken(String);

impl SessionToken {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    fn cookie(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.0)
    }
}

/// Login request body.
#[derive(Debug, Serialize)]
struct Credentials<'a> {
    #[serde(rename = "CompanyDB")]
    company_db: &'a str,
    #[serde(rename = "UserName")]
    user_name: &'a str,
    #[serde(rename = "Password")]
    password: &'a str,
}

/// Login response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "SessionId")]
    session_id: String,
    #[serde(rename = "Version")]
    #[allow(dead_code)]
    version: Option<String>,
    #[serde(rename = "SessionTimeout")]
    #[allow(dead_code)]
    session_timeout: Option<i64>,
}

/// One page of the items collection.
#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(rename = "odata.nextLink")]
    #[allow(dead_code)]
    next_link: Option<String>,
    value: Vec<RemoteItem>,
}

/// Client for the session-authenticated remote API.
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base: String,
    company_db: String,
    user_name: String,
    password: String,
    item_filter: String,
}

impl RemoteClient {
    /// Build a client from configuration. Fails on an unparseable base URL.
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let base = config.external_api_url.trim_end_matches('/').to_string();
        Url::parse(&base)
            .map_err(|e| RemoteError::Request(format!("invalid EXTERNAL_API_URL: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            company_db: config.company_db.clone(),
            user_name: config.user_name.clone(),
            password: config.password.clone(),
            item_filter: config.item_filter.clone(),
        })
    }

    /// Acquire a session token.
    pub async fn login(&self) -> Result<SessionToken, RemoteError> {
        let credentials = Credentials {
            company_db: &self.company_db,
            user_name: &self.user_name,
            password: &self.password,
        };

        let response = self
            .http
            .post(format!("{}/Login", self.base))
            .json(&credentials)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(format!("login response: {e}")))?;

        Ok(SessionToken::new(body.session_id))
    }

    /// Invalidate a session token. The remote replies 204 on success.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(format!("{}/Logout", self.base))
            .header(header::COOKIE, token.cookie())
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }

        Ok(())
    }

    /// Total number of items matching the configured filter.
    ///
    /// The `$count` sub-resource replies with a plain-text integer body.
    pub async fn item_count(&self, token: &SessionToken) -> Result<i64, RemoteError> {
        let response = self
            .http
            .get(format!("{}/Items/$count", self.base))
            .query(&[
                ("$select", ITEM_SELECT),
                ("$filter", self.item_filter.as_str()),
                ("$orderby", ITEM_ORDER),
            ])
            .header(header::ACCEPT, "text/plain")
            .header(header::COOKIE, token.cookie())
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.text().await?;
        body.trim()
            .parse()
            .map_err(|e| RemoteError::Decode(format!("count body {body:?}: {e}")))
    }

    /// Fetch one page of items with OData `$top`/`$skip` paging.
    pub async fn item_page(
        &self,
        token: &SessionToken,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RemoteItem>, RemoteError> {
        let top = limit.to_string();
        let skip = offset.to_string();

        let response = self
            .http
            .get(format!("{}/Items", self.base))
            .query(&[
                ("$select", ITEM_SELECT),
                ("$filter", self.item_filter.as_str()),
                ("$orderby", ITEM_ORDER),
                ("$top", top.as_str()),
                ("$skip", skip.as_str()),
            ])
            .header(header::ACCEPT, "application/json")
            .header(header::COOKIE, token.cookie())
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: ItemsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(format!("items page at offset {offset}: {e}")))?;

        Ok(body.value)
    }
}

#[async_trait]
impl PageSource for RemoteClient {
    async fn fetch_page(
        &self,
        token: &SessionToken,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RemoteItem>, RemoteError> {
        self.item_page(token, limit, offset).await
    }
}

/// Map non-success statuses to a typed error, preserving the body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status { status, body })
}
