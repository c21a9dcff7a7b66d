//! Postback payload for the config editor's save button
//!
//! The editor is a classic server-side form: every save must carry the
//! anti-tampering tokens of the page it was rendered from, echo fields this
//! client never edits, and resend every checkbox (an omitted checkbox is read
//! as "unchecked").

use crate::dom::ParsedPage;
use crate::error::{Result, UpdateFault};
use crate::parser::{checked_state, value_by_name};

const EDITOR: &str = "ctl00$ContentPlaceHolderMain$MvcConfigEditor1";

pub const VIEW_STATE_FIELD: &str = "__VSTATE";
pub const EVENT_VALIDATION_FIELD: &str = "__EVENTVALIDATION";
pub const ENCODING_FIELD: &str = "ctl00$ContentPlaceHolderMain$MvcConfigEditor1$HiddenFieldEncoding";

pub const SERVER_NAME_FIELD: &str =
    "ctl00$ContentPlaceHolderMain$MvcConfigEditor1$FormViewer1$TextBox__DEFAULT_VARIABLE_False61$TextBox1";
pub const SERVER_PASSWORD_FIELD: &str =
    "ctl00$ContentPlaceHolderMain$MvcConfigEditor1$FormViewer1$TextBox__DEFAULT_VARIABLE_False82$TextBox1";
/// Read-only for us, but the form processor wants it back
pub const RCON_PASSWORD_FIELD: &str =
    "ctl00$ContentPlaceHolderMain$MvcConfigEditor1$FormViewer1$TextBox__DEFAULT_VARIABLE_False73$TextBox1";

pub const GDK_CHECKBOX_FIELD: &str =
    "ctl00$ContentPlaceHolderMain$MvcConfigEditor1$FormViewer1$CheckBox109872665934$CheckBox1";
pub const STEAM_CHECKBOX_FIELD: &str =
    "ctl00$ContentPlaceHolderMain$MvcConfigEditor1$FormViewer1$CheckBox109872665925$CheckBox1";

/// Ordered field list, sent URL-encoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Tokens scraped from the page the save is submitted against
struct PageTokens {
    view_state: String,
    event_validation: String,
    encoding: String,
    rcon_password: String,
}

impl PageTokens {
    fn scrape(page: &ParsedPage) -> Result<Self> {
        let required = |field: &'static str| {
            value_by_name(page, field).ok_or(UpdateFault::MissingField(field))
        };

        Ok(Self {
            view_state: required(VIEW_STATE_FIELD)?,
            event_validation: required(EVENT_VALIDATION_FIELD)?,
            encoding: required(ENCODING_FIELD)?,
            rcon_password: required(RCON_PASSWORD_FIELD)?,
        })
    }
}

/// Builds the save postback for `page` with a new server name and password.
///
/// Fails with `MissingField` before anything is sent when one of the hidden
/// tokens is gone.
pub fn server_info_update(page: &ParsedPage, name: &str, password: &str) -> Result<FormPayload> {
    let tokens = PageTokens::scrape(page)?;
    let gdk = checked_state(page, GDK_CHECKBOX_FIELD);
    let steam = checked_state(page, STEAM_CHECKBOX_FIELD);

    let mut payload = FormPayload::new();
    payload
        .push("__EVENTTARGET", format!("{}$ButtonSave", EDITOR))
        .push("__EVENTARGUMENT", "")
        .push(VIEW_STATE_FIELD, tokens.view_state)
        .push("__VIEWSTATE", "")
        .push("__SCROLLPOSITIONX", "0")
        .push("__SCROLLPOSITIONY", "0")
        .push("__VIEWSTATEENCRYPTED", "")
        .push(EVENT_VALIDATION_FIELD, tokens.event_validation)
        .push("ctl00$NumericTextBoxItem", "0.00")
        .push(ENCODING_FIELD, tokens.encoding)
        .push(SERVER_NAME_FIELD, name)
        .push(SERVER_PASSWORD_FIELD, password)
        .push(RCON_PASSWORD_FIELD, tokens.rcon_password)
        .push(GDK_CHECKBOX_FIELD, gdk.as_str())
        .push(STEAM_CHECKBOX_FIELD, steam.as_str());

    Ok(payload)
}
