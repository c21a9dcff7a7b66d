//! HTTP transport with an explicit, resettable cookie jar
//!
//! Redirects are never followed: the panel signals a successful login (and an
//! expired session) through 3xx responses, so callers need to see them.

use crate::config::HttpConfig;
use crate::error::{PanelError, Result};
use crate::models::Credentials;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, LOCATION, USER_AGENT};
use reqwest::{redirect, Client, Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0";

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    /// Sent as `application/x-www-form-urlencoded`, in order
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

#[derive(Debug, Clone)]
pub struct PanelRequest {
    pub method: Method,
    pub url: String,
    pub basic_auth: Option<Credentials>,
    pub body: RequestBody,
}

impl PanelRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            basic_auth: None,
            body: RequestBody::Empty,
        }
    }

    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            basic_auth: None,
            body,
        }
    }

    pub fn with_basic_auth(mut self, creds: &Credentials) -> Self {
        self.basic_auth = Some(creds.clone());
        self
    }
}

#[derive(Debug, Clone)]
pub struct PanelResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl PanelResponse {
    pub fn text(&self, resource: &str) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| PanelError::parse(resource, e))
    }
}

/// One request/response round trip against the panel, plus the cookie jar
/// those round trips share.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse>;

    /// Drop every stored cookie so the next request starts a clean session
    fn reset_cookies(&mut self) -> Result<()>;
}

pub struct HttpClient {
    inner: Client,
    settings: HttpConfig,
}

impl HttpClient {
    pub fn new(settings: &HttpConfig) -> Result<Self> {
        Ok(Self {
            inner: Self::build(settings, Arc::new(Jar::default()))?,
            settings: settings.clone(),
        })
    }

    fn build(settings: &HttpConfig, jar: Arc<Jar>) -> Result<Client> {
        let mut headers = HeaderMap::new();
        let agent = settings.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .cookie_provider(jar)
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(settings.timeout))
            .connect_timeout(Duration::from_secs(settings.connect_timeout))
            .default_headers(headers)
            .build()?;

        Ok(client)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse> {
        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = self.inner.request(request.method, &request.url);
        if let Some(creds) = &request.basic_auth {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Json(value) => builder.json(&value),
        };

        let resp = builder.send().await?;
        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?.to_vec();

        tracing::debug!("   -> {} ({} bytes)", status, body.len());
        Ok(PanelResponse {
            status,
            location,
            body,
        })
    }

    fn reset_cookies(&mut self) -> Result<()> {
        self.inner = Self::build(&self.settings, Arc::new(Jar::default()))?;
        Ok(())
    }
}
