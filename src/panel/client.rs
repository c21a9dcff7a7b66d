//! Config editor client for one panel service login
//!
//! Reads the server name/password off the config editor, writes them back
//! through the editor's save postback, and restarts services.

use crate::dom::ParsedPage;
use crate::error::{PanelError, Result, UpdateFault};
use crate::form;
use crate::http::{PanelRequest, RequestBody, Transport};
use crate::models::{ConfigFileId, PasswordSource, RestartEnvelope, ServerInfo};
use crate::panel::ServerQuery;
use crate::parser;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::StatusCode;

pub const CONFIG_EDITOR_PATH: &str = "/Aspx/Interface/GameHosting/MvcConfigEditor.aspx";
pub const COMMAND_LINE_PATH: &str = "/Aspx/Interface/GameHosting/ServiceCommandLine.aspx";
pub const RESTART_PATH: &str = "/Aspx/Interface/Base/CallBacks/ServiceManager.aspx/Restart";

const SERVER_NAME_LABEL: &str = "Server Name";
const SERVER_PASSWORD_LABEL: &str = "Server Password";

pub struct PanelClient<T> {
    session: Session<T>,
    config_file: ConfigFileId,
}

impl<T: Transport> PanelClient<T> {
    pub fn new(session: Session<T>, config_file: ConfigFileId) -> Self {
        Self {
            session,
            config_file,
        }
    }

    fn config_editor_url(&self, service_id: &str) -> String {
        self.session.url(&format!(
            "{}?gameid={}&modid={}&fileid={}&serviceid={}",
            CONFIG_EDITOR_PATH,
            urlencoding::encode(&self.config_file.game_id),
            urlencoding::encode(&self.config_file.mod_id),
            urlencoding::encode(&self.config_file.file_id),
            urlencoding::encode(service_id)
        ))
    }

    fn command_line_url(&self, service_id: &str) -> String {
        self.session.url(&format!(
            "{}?serviceid={}",
            COMMAND_LINE_PATH,
            urlencoding::encode(service_id)
        ))
    }

    /// GET an authenticated page and parse it. Anything but 200 is reported
    /// with its redirect target, which usually tells an expired session
    /// (redirect to login) from a moved page.
    async fn fetch_page(&mut self, resource: &str, url: String) -> Result<ParsedPage> {
        self.session.authenticate().await?;

        let request = PanelRequest::get(url).with_basic_auth(self.session.credentials());
        let resp = self.session.send(request).await?;
        if resp.status != StatusCode::OK {
            return Err(PanelError::StructuralFetch {
                resource: resource.to_string(),
                status: resp.status,
                location: resp.location,
            });
        }

        Ok(ParsedPage::parse(resp.text(resource)?))
    }

    pub async fn fetch_config_page(&mut self, service_id: &str) -> Result<ParsedPage> {
        let url = self.config_editor_url(service_id);
        self.fetch_page("config editor", url).await
    }

    pub async fn fetch_service_command_line(&mut self, service_id: &str) -> Result<ParsedPage> {
        let url = self.command_line_url(service_id);
        self.fetch_page("service command line", url).await
    }

    pub async fn read_server_info(
        &mut self,
        service_id: &str,
        source: PasswordSource,
    ) -> Result<ServerInfo> {
        tracing::debug!("[{}] Reading server info ({:?})", service_id, source);

        let (name, config_password) = {
            let page = self.fetch_config_page(service_id).await?;
            (
                parser::value_by_label(&page, SERVER_NAME_LABEL),
                parser::value_by_label(&page, SERVER_PASSWORD_LABEL),
            )
        };
        let password = self.resolve_password(service_id, source, config_password).await?;

        Ok(ServerInfo { name, password })
    }

    /// Picks the password the configured source considers authoritative.
    /// The command line source ignores the config page value entirely.
    async fn resolve_password(
        &mut self,
        service_id: &str,
        source: PasswordSource,
        config_password: String,
    ) -> Result<String> {
        match source {
            PasswordSource::ConfigPage => Ok(config_password),
            PasswordSource::ServiceCommandLine => {
                let page = self.fetch_service_command_line(service_id).await?;
                Ok(parser::command_line_password(&page))
            }
        }
    }

    /// Save a new server name and password through the config editor.
    ///
    /// Always posts against a page fetched for this call; tokens from any
    /// earlier render would be rejected as stale.
    pub async fn write_server_info(
        &mut self,
        service_id: &str,
        name: &str,
        password: &str,
    ) -> Result<()> {
        tracing::info!("[{}] Updating server info...", service_id);

        let payload = {
            let page = self.fetch_config_page(service_id).await?;
            form::server_info_update(&page, name, password)?
        };
        tracing::debug!("   Posting {} fields", payload.len());

        let request = PanelRequest::post(
            self.config_editor_url(service_id),
            RequestBody::Form(payload.into_fields()),
        )
        .with_basic_auth(self.session.credentials());
        let resp = self.session.send(request).await?;
        if resp.status != StatusCode::OK {
            return Err(UpdateFault::UnexpectedStatus {
                status: resp.status,
                location: resp.location,
            }
            .into());
        }

        tracing::info!("   -> Saved");
        Ok(())
    }

    /// Restart a service. Returns the panel's activity id, or an empty string
    /// when the response doesn't carry one.
    pub async fn restart_service(&mut self, service_id: &str) -> Result<String> {
        self.session.authenticate().await?;
        tracing::info!("[{}] Restarting service...", service_id);

        let request = PanelRequest::post(
            self.session.url(RESTART_PATH),
            RequestBody::Json(serde_json::json!({ "serviceId": service_id })),
        );
        let resp = self.session.send(request).await?;
        if resp.status != StatusCode::OK {
            return Err(UpdateFault::UnexpectedStatus {
                status: resp.status,
                location: resp.location,
            }
            .into());
        }

        let envelope: RestartEnvelope = serde_json::from_slice(&resp.body)
            .map_err(|e| PanelError::parse("restart callback", e))?;
        let activity = envelope.activity_id();
        tracing::info!("   -> Restart queued (activity '{}')", activity);
        Ok(activity)
    }
}

#[async_trait]
impl<T: Transport> ServerQuery for PanelClient<T> {
    async fn server_info(&mut self, service_id: &str, source: PasswordSource) -> Result<ServerInfo> {
        self.read_server_info(service_id, source).await
    }
}
