//! CLI entry point for the redirector client.
//!
//! Creates and deletes redirects on a redirector instance. The base URL comes
//! from `--base-url`, `REDIRECTOR_URL` or the `.meta` metadata file, and the
//! authorization token from `--token` or `REDIRECTOR_TOKEN`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use redirector_client::fetch::{BasicClient, Pipeline};
use redirector_client::{
    AuthorizationInterceptor, Config, RedirectApi, RedirectResponse, RedirectorClient,
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "redirector")]
#[command(about = "Manage redirects on a redirector instance", long_about = None)]
struct Cli {
    /// Base URL of the redirector API (defaults to `url` in the metadata file)
    #[arg(long, env = "REDIRECTOR_URL", global = true)]
    base_url: Option<String>,

    /// Value sent in the authorization header
    #[arg(long, env = "REDIRECTOR_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Name of the authorization header
    #[arg(long, env = "REDIRECTOR_HEADER", global = true, default_value = "Authorization")]
    header: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a redirect, replacing any existing one with the same key
    Create {
        /// Key of the redirect
        #[arg(value_name = "KEY")]
        key: String,

        /// Target URL of the redirect
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Delete a redirect
    Delete {
        /// Key of the redirect
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print the loaded client configuration
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/redirector.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("redirector.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Create { key, url } => {
            let client = build_client(
                &cli.header,
                cli.token.as_deref(),
                cli.base_url.as_deref(),
                &config,
            )?;
            let response = client
                .create(&url, &key)?
                .execute()
                .await
                .with_context(|| format!("failed to create redirect '{key}'"))?;
            report("create", &key, response)?;
        }
        Commands::Delete { key } => {
            let client = build_client(
                &cli.header,
                cli.token.as_deref(),
                cli.base_url.as_deref(),
                &config,
            )?;
            let response = client
                .delete(&key)?
                .execute()
                .await
                .with_context(|| format!("failed to delete redirect '{key}'"))?;
            report("delete", &key, response)?;
        }
        Commands::Info => {
            info!(
                base_url = %cli.base_url.as_deref().unwrap_or(config.base_url.as_str()),
                framework_version = config.framework_version.as_deref().unwrap_or("unknown"),
                client_version = config.client_version.as_deref().unwrap_or("unknown"),
                "Redirector client configuration"
            );
        }
    }

    Ok(())
}

fn build_client(
    header: &str,
    token: Option<&str>,
    base_url: Option<&str>,
    config: &Config,
) -> Result<RedirectorClient> {
    let token = token.context("an authorization token is required (--token or REDIRECTOR_TOKEN)")?;
    let rule = AuthorizationInterceptor::with_header(header, token)?;
    let transport = BasicClient::with_timeouts(Duration::from_secs(10), Duration::from_secs(30))?;
    let pipeline = rule.attach_to_pipeline(&Pipeline::new(transport));
    let client = RedirectorClient::from_pipeline(pipeline, base_url, config)?;
    Ok(client)
}

/// Logs the outcome of a call and turns a rejection into an error exit.
fn report(action: &str, key: &str, response: RedirectResponse) -> Result<()> {
    match response.into_result() {
        Ok(_) => {
            info!(action, key, "Redirect updated");
            Ok(())
        }
        Err(e) => {
            error!(action, key, error = %e, "Redirector rejected the request");
            Err(e.into())
        }
    }
}
