//! Panelctl - read and update game server settings on a hosting panel

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use panelctl::config::{Config, ServerConfig};
use panelctl::{HttpClient, MonitoredServer, PanelClient, ServerRegistry, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "panelctl")]
#[command(about = "Game hosting panel client", long_about = None)]
struct Args {
    /// Config file path (default: search panelctl.toml, /etc, ~/.config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read name and password of every configured server
    Status,
    /// Read name and password of one server
    Info {
        /// Server name from the config
        server: String,
    },
    /// Change name and password of one server
    Set {
        server: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Restart one server's service
    Restart { server: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let cfg = Config::load(args.config.as_deref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .init();

    tracing::debug!("Panel: {}", cfg.panel.base_url);

    match args.command {
        Command::Status => run_status(&cfg).await,
        Command::Info { server } => {
            let server = find_server(&cfg, &server)?;
            let info = build_client(&cfg, server)?
                .read_server_info(&server.service_id, server.password_source)
                .await
                .with_context(|| format!("Failed to read server info for '{}'", server.name))?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Command::Set {
            server,
            name,
            password,
        } => {
            let server = find_server(&cfg, &server)?;
            build_client(&cfg, server)?
                .write_server_info(&server.service_id, &name, &password)
                .await
                .with_context(|| format!("Failed to update '{}'", server.name))?;
            tracing::info!("Updated '{}'", server.name);
            Ok(())
        }
        Command::Restart { server } => {
            let server = find_server(&cfg, &server)?;
            let activity = build_client(&cfg, server)?
                .restart_service(&server.service_id)
                .await
                .with_context(|| format!("Failed to restart '{}'", server.name))?;
            println!("{}", serde_json::json!({ "server": server.name, "activity_id": activity }));
            Ok(())
        }
    }
}

fn find_server<'a>(cfg: &'a Config, name: &str) -> Result<&'a ServerConfig> {
    cfg.server(name).with_context(|| {
        let known: Vec<&str> = cfg.servers.iter().map(|s| s.name.as_str()).collect();
        format!("No server named '{}' (configured: {})", name, known.join(", "))
    })
}

/// One client, and so one cookie jar, per server
fn build_client(cfg: &Config, server: &ServerConfig) -> Result<PanelClient<HttpClient>> {
    let transport = HttpClient::new(&cfg.http).context("Failed to build HTTP client")?;
    let session = Session::new(
        cfg.panel.base_url.clone(),
        server.credentials.clone(),
        cfg.panel.auth_check,
        transport,
    );
    Ok(PanelClient::new(session, cfg.panel.config_file()))
}

/// Build a server registry from configuration
fn build_registry(cfg: &Config) -> Result<ServerRegistry> {
    let mut registry = ServerRegistry::new();

    for server in &cfg.servers {
        registry.register(MonitoredServer {
            name: server.name.clone(),
            service_id: server.service_id.clone(),
            password_source: server.password_source,
            color: server.color,
            query: Box::new(build_client(cfg, server)?),
        });
    }

    if registry.is_empty() {
        tracing::warn!("No servers configured! Add [[servers]] entries to the config file");
    }

    Ok(registry)
}

async fn run_status(cfg: &Config) -> Result<()> {
    let mut registry = build_registry(cfg)?;
    tracing::info!("Polling {} server(s)...", registry.len());

    let statuses = registry.poll_all().await;
    println!("{}", serde_json::to_string_pretty(&statuses)?);
    Ok(())
}
