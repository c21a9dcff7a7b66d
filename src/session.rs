//! Authenticated session against one panel login
//!
//! The panel authenticates with basic auth on the login page and answers a
//! good login with a redirect, setting the session cookies on the way. A
//! session may expire at any time; that is only noticed on the next use.

use crate::error::{PanelError, Result};
use crate::http::{PanelRequest, PanelResponse, Transport};
use crate::models::{AuthCheck, Credentials};
use reqwest::StatusCode;

pub const LOGIN_PATH: &str = "/Aspx/Interface/Base/Login.aspx";
/// Only reachable with a live session. The login page itself may answer 200
/// to anonymous visitors, so it can't be used for the check.
pub const HOME_PATH: &str = "/Aspx/Interface/Base/Home.aspx";

/// Not safe for concurrent use: logging in resets the cookie jar, and a
/// fetch-then-submit pair must not interleave with that. Use one session per
/// server and serialize calls on it (`&mut self` enforces this).
pub struct Session<T> {
    base_url: String,
    credentials: Credentials,
    auth_check: AuthCheck,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        auth_check: AuthCheck,
        transport: T,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credentials,
            auth_check,
            transport,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether the cookies we hold still belong to a live session.
    ///
    /// Any unexpected status simply means "no"; only transport failures are
    /// errors.
    pub async fn is_authenticated(&self) -> Result<bool> {
        let authenticated = match self.auth_check {
            AuthCheck::LandingPage => {
                let resp = self.send(PanelRequest::get(self.url(HOME_PATH))).await?;
                resp.status.is_success()
            }
            AuthCheck::LoginRedirect => {
                let resp = self.send(PanelRequest::get(self.url(LOGIN_PATH))).await?;
                resp.status == StatusCode::FOUND && self.lands_home(&resp)
            }
        };

        tracing::debug!("[{}] authenticated: {}", self.credentials.username, authenticated);
        Ok(authenticated)
    }

    /// Log in unless already logged in.
    ///
    /// The cookie jar is emptied before each attempt so nothing from an
    /// expired session survives into the new one.
    pub async fn authenticate(&mut self) -> Result<()> {
        if self.is_authenticated().await? {
            return Ok(());
        }

        tracing::info!("[{}] Logging into panel...", self.credentials.username);
        self.transport.reset_cookies()?;

        let request = PanelRequest::get(self.url(LOGIN_PATH)).with_basic_auth(&self.credentials);
        let resp = self.send(request).await?;
        if resp.status != StatusCode::FOUND {
            tracing::warn!(
                "[{}] Login answered {} instead of 302 Found",
                self.credentials.username,
                resp.status
            );
            return Err(PanelError::AuthenticationFailed {
                status: resp.status,
            });
        }

        tracing::info!("   -> Logged in");
        Ok(())
    }

    /// Location must name the home page exactly, relative or absolute.
    fn lands_home(&self, resp: &PanelResponse) -> bool {
        resp.location
            .as_deref()
            .is_some_and(|loc| loc == HOME_PATH || loc == self.url(HOME_PATH))
    }

    pub async fn send(&self, request: PanelRequest) -> Result<PanelResponse> {
        self.transport.execute(request).await
    }
}
