//! Data models for panel sessions and scraped results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Panel login. Only ever sent as basic auth, never persisted by the client.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Values scraped for one game server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub password: String,
}

/// Where the authoritative connection password is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordSource {
    /// The "Server Password" field of the config editor
    #[default]
    ConfigPage,
    /// The `-ServerPassword=` argument of the running command line
    ServiceCommandLine,
}

/// How "already logged in" is detected; differs between panel versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthCheck {
    /// GET the home page and expect 200
    #[default]
    LandingPage,
    /// GET the login page and expect a redirect to the home page
    LoginRedirect,
}

/// State of a checkbox as the form processor expects it echoed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxState {
    On,
    Off,
}

impl CheckboxState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// Deployment-fixed identifiers of the config file edited on every service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileId {
    pub game_id: String,
    pub mod_id: String,
    pub file_id: String,
}

/// Response of the restart callback: `{ "d": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct RestartEnvelope {
    #[serde(default)]
    pub d: Vec<String>,
}

impl RestartEnvelope {
    /// Position of the activity id in `d`, fixed by the endpoint
    const ACTIVITY_ID_INDEX: usize = 3;

    pub fn activity_id(&self) -> String {
        self.d
            .get(Self::ACTIVITY_ID_INDEX)
            .cloned()
            .unwrap_or_default()
    }
}

/// One line of a polling cycle, as handed to whatever publishes results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    pub server_name: String,
    pub server_password: String,
}
