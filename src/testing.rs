//! Fixtures and an in-memory panel for tests

use crate::error::Result;
use crate::form::{
    ENCODING_FIELD, EVENT_VALIDATION_FIELD, GDK_CHECKBOX_FIELD, RCON_PASSWORD_FIELD,
    SERVER_NAME_FIELD, SERVER_PASSWORD_FIELD, STEAM_CHECKBOX_FIELD, VIEW_STATE_FIELD,
};
use crate::http::{PanelRequest, PanelResponse, RequestBody, Transport};
use crate::models::{ConfigFileId, Credentials};
use crate::panel::client::{COMMAND_LINE_PATH, CONFIG_EDITOR_PATH, RESTART_PATH};
use crate::session::{HOME_PATH, LOGIN_PATH};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::sync::{Arc, Mutex, MutexGuard};

pub const BASE_URL: &str = "http://panel.test";

pub fn credentials() -> Credentials {
    Credentials::new("admin", "letmein")
}

pub fn config_file() -> ConfigFileId {
    ConfigFileId {
        game_id: "1098726659".to_string(),
        mod_id: "0".to_string(),
        file_id: "1".to_string(),
    }
}

fn hidden(name: &str, value: &str, skip: Option<&str>) -> String {
    if skip == Some(name) {
        return String::new();
    }
    format!(r#"<input type="hidden" name="{}" id="{}" value="{}" />"#, name, name, value)
}

fn row(caption: &str, input: String) -> String {
    format!(
        r#"<div class="FormRow"><div class="Caption"><label for="ctl_{id}"><span class="Label">{caption}</span></label></div><div class="Field">{input}</div></div>"#,
        id = caption.replace(' ', ""),
        caption = caption,
        input = input
    )
}

fn text_input(name: &str, value: &str, skip: Option<&str>) -> String {
    if skip == Some(name) {
        return String::new();
    }
    format!(r#"<input type="text" name="{}" value="{}" />"#, name, value)
}

fn checkbox(name: &str, checked: bool) -> String {
    format!(
        r#"<input type="checkbox" name="{}" value="on"{} />"#,
        name,
        if checked { r#" checked="checked""# } else { "" }
    )
}

fn config_page_with(name: &str, password: &str, skip: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Config Editor</title></head>
<body>
<form method="post" action="./MvcConfigEditor.aspx" id="aspnetForm">
<div>
{vstate}
{evval}
{encoding}
</div>
<div class="Editor">
{name_row}
{password_row}
{rcon_row}
{gdk_row}
{steam_row}
</div>
</form>
</body></html>"#,
        vstate = hidden(VIEW_STATE_FIELD, "vstate-blob", skip),
        evval = hidden(EVENT_VALIDATION_FIELD, "evval-blob", skip),
        encoding = hidden(ENCODING_FIELD, "utf-8", skip),
        name_row = row("Server Name", text_input(SERVER_NAME_FIELD, name, skip)),
        password_row = row("Server Password", text_input(SERVER_PASSWORD_FIELD, password, skip)),
        rcon_row = row("RCON Password", text_input(RCON_PASSWORD_FIELD, "rcon-pw", skip)),
        gdk_row = row("Enable GDK", checkbox(GDK_CHECKBOX_FIELD, true)),
        steam_row = row("Enable Steam", checkbox(STEAM_CHECKBOX_FIELD, false)),
    )
}

/// Config editor showing `name` and `password`
pub fn config_page(name: &str, password: &str) -> String {
    config_page_with(name, password, None)
}

/// Config editor with the input named `field` left out
pub fn config_page_without(field: &str) -> String {
    config_page_with("Alpha", "secret", Some(field))
}

pub fn command_line_page(line: &str) -> String {
    format!(
        r#"<html><body><div class="Panel"><div class="CommandLine SelectedCommandLine"><b>Default</b><br><span class="Value">{}</span></div></div></body></html>"#,
        line
    )
}

/// Caption whose `<label>` has no `for`
pub const UNLINKED_LABEL_PAGE: &str = r#"<html><body>
<div class="FormRow"><div class="Caption"><label><span class="Label">Server Name</span></label></div>
<div class="Field"><input type="text" name="n" value="Alpha" /></div></div>
</body></html>"#;

/// Linked caption, but the input sits outside the caption's third ancestor
pub const SHALLOW_LABEL_PAGE: &str = r#"<html><body>
<div class="Outer">
<div class="FormRow"><div class="Caption"><label for="n"><span class="Label">Server Name</span></label></div></div>
<div class="Field"><input type="text" name="n" value="Alpha" /></div>
</div>
</body></html>"#;

struct PanelState {
    credentials: Credentials,
    logged_in: bool,
    login_status: StatusCode,
    login_location: String,
    config_page: String,
    command_line_page: String,
    restart_body: String,
    page_status: Option<(StatusCode, Option<String>)>,
    update_status: Option<(StatusCode, Option<String>)>,
    requests: Vec<PanelRequest>,
    cookie_resets: usize,
}

/// Emulates the panel behind a `Transport`: cookie-backed login, pages, save
/// postbacks and restarts. Clones share state, so a test can keep one handle
/// and inspect every recorded request after handing the other to a session.
#[derive(Clone)]
pub struct FakePanel {
    state: Arc<Mutex<PanelState>>,
}

impl FakePanel {
    pub fn new(config_page: String) -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                credentials: credentials(),
                logged_in: false,
                login_status: StatusCode::FOUND,
                login_location: HOME_PATH.to_string(),
                config_page,
                command_line_page: command_line_page("-port=7777"),
                restart_body: r#"{"d":[]}"#.to_string(),
                page_status: None,
                update_status: None,
                requests: Vec::new(),
                cookie_resets: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap()
    }

    pub fn with_command_line(self, html: String) -> Self {
        self.lock().command_line_page = html;
        self
    }

    pub fn with_restart_body(self, body: &str) -> Self {
        self.lock().restart_body = body.to_string();
        self
    }

    pub fn set_config_page(&self, html: String) {
        self.lock().config_page = html;
    }

    /// Answer logins with `status`; anything but 302 leaves the session logged out
    pub fn set_login_status(&self, status: StatusCode) {
        self.lock().login_status = status;
    }

    pub fn set_login_location(&self, location: &str) {
        self.lock().login_location = location.to_string();
    }

    /// Answer page GETs with `status` instead of the page
    pub fn set_page_status(&self, status: StatusCode, location: Option<&str>) {
        self.lock().page_status = Some((status, location.map(str::to_string)));
    }

    /// Answer save postbacks with `status`
    pub fn set_update_status(&self, status: StatusCode, location: Option<&str>) {
        self.lock().update_status = Some((status, location.map(str::to_string)));
    }

    /// Drop the server side of the session, as a panel timeout would
    pub fn expire_session(&self) {
        self.lock().logged_in = false;
    }

    pub fn cookie_resets(&self) -> usize {
        self.lock().cookie_resets
    }

    /// Login GETs that carried basic auth
    pub fn login_attempts(&self) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| path_of(&r.url) == LOGIN_PATH && r.basic_auth.is_some())
            .count()
    }

    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.urls(method, path).len()
    }

    pub fn urls(&self, method: &Method, path: &str) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .filter(|r| &r.method == method && path_of(&r.url) == path)
            .map(|r| r.url.clone())
            .collect()
    }

    /// Form bodies posted to `path`, in order
    pub fn forms(&self, path: &str) -> Vec<Vec<(String, String)>> {
        self.lock()
            .requests
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .filter_map(|r| match &r.body {
                RequestBody::Form(fields) => Some(fields.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn json_bodies(&self, path: &str) -> Vec<serde_json::Value> {
        self.lock()
            .requests
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .filter_map(|r| match &r.body {
                RequestBody::Json(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }
}

fn path_of(url: &str) -> &str {
    let rest = url.strip_prefix(BASE_URL).unwrap_or(url);
    rest.split('?').next().unwrap_or(rest)
}

fn respond(status: StatusCode, location: Option<&str>, body: &str) -> PanelResponse {
    PanelResponse {
        status,
        location: location.map(str::to_string),
        body: body.as_bytes().to_vec(),
    }
}

fn redirect(to: &str) -> PanelResponse {
    respond(StatusCode::FOUND, Some(to), "")
}

fn overridden(status: &Option<(StatusCode, Option<String>)>) -> Option<PanelResponse> {
    status
        .as_ref()
        .map(|(code, location)| respond(*code, location.as_deref(), ""))
}

#[async_trait]
impl Transport for FakePanel {
    async fn execute(&self, request: PanelRequest) -> Result<PanelResponse> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let basic_ok = request.basic_auth.as_ref() == Some(&state.credentials);
        let authorized = state.logged_in || basic_ok;

        let get = request.method == Method::GET;
        let post = request.method == Method::POST;
        let path = path_of(&request.url);

        let resp = match path {
            HOME_PATH if get && state.logged_in => respond(StatusCode::OK, None, "home"),
            HOME_PATH if get => redirect(LOGIN_PATH),
            LOGIN_PATH if get && (basic_ok || (request.basic_auth.is_none() && state.logged_in)) => {
                if basic_ok && state.login_status == StatusCode::FOUND {
                    state.logged_in = true;
                }
                respond(state.login_status, Some(state.login_location.as_str()), "")
            }
            LOGIN_PATH if get => respond(StatusCode::OK, None, "<form>login</form>"),
            CONFIG_EDITOR_PATH | COMMAND_LINE_PATH if !authorized => redirect(LOGIN_PATH),
            CONFIG_EDITOR_PATH | COMMAND_LINE_PATH if get => match overridden(&state.page_status) {
                Some(resp) => resp,
                None if path == CONFIG_EDITOR_PATH => {
                    respond(StatusCode::OK, None, &state.config_page)
                }
                None => respond(StatusCode::OK, None, &state.command_line_page),
            },
            CONFIG_EDITOR_PATH if post => overridden(&state.update_status)
                .unwrap_or_else(|| respond(StatusCode::OK, None, &state.config_page)),
            RESTART_PATH if post && state.logged_in => {
                respond(StatusCode::OK, None, &state.restart_body)
            }
            RESTART_PATH if post => redirect(LOGIN_PATH),
            _ => respond(StatusCode::NOT_FOUND, None, "not found"),
        };
        Ok(resp)
    }

    fn reset_cookies(&mut self) -> Result<()> {
        let mut state = self.lock();
        state.logged_in = false;
        state.cookie_resets += 1;
        Ok(())
    }
}
