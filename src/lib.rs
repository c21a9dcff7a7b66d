//! Panelctl - scraping client for legacy game hosting control panels
//!
//! The panel exposes no API: values live in server-rendered postback forms.
//! This crate keeps an authenticated session per login, scrapes server names
//! and passwords out of the rendered pages, and resubmits the config editor
//! form with fresh anti-tampering tokens.

pub mod config;
pub mod dom;
pub mod error;
pub mod form;
pub mod http;
pub mod models;
pub mod panel;
pub mod parser;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{PanelError, Result, UpdateFault};
pub use http::{HttpClient, Transport};
pub use models::{AuthCheck, Credentials, PasswordSource, ServerInfo, ServerStatus};
pub use panel::{MonitoredServer, PanelClient, ServerQuery, ServerRegistry};
pub use session::Session;
