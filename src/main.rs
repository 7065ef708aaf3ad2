use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use paystack_tools::transport::{self, McpServer};
use paystack_tools::tools::paystack;
use paystack_tools::{Config, PaystackClient, Redactor, ToolRegistry};

#[derive(Parser)]
#[command(name = "paystack-tools", version, about = "Paystack tools over MCP or HTTP")]
struct Cli {
    /// Paystack API base URL (overrides PAYSTACK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve MCP over stdin/stdout (default)
    Stdio,
    /// Serve the HTTP API
    Http {
        /// Address to bind (overrides PAYSTACK_HTTP_ADDR)
        #[arg(long)]
        addr: Option<std::net::SocketAddr>,
    },
}

/// Build the full Paystack tool registry. The client is created here once and
/// shared by every invocation.
fn build_registry(config: &Config) -> anyhow::Result<ToolRegistry> {
    let client = PaystackClient::from_config(config)?;
    let redactor = Redactor::new().with_secret(&config.secret_key);
    Ok(paystack::registry(Arc::new(client), redactor)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP traffic
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let registry = Arc::new(build_registry(&config)?);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal.cancel();
        }
    });

    match cli.command.unwrap_or(Command::Stdio) {
        Command::Stdio => {
            Arc::new(McpServer::new(registry))
                .serve_stdio(shutdown)
                .await?
        }
        Command::Http { addr } => {
            transport::serve_http(registry, addr.unwrap_or(config.http_addr), shutdown).await?
        }
    }

    Ok(())
}
