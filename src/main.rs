use anyhow::Result;
use clap::{Parser, Subcommand};
use contact_relay::Config;

/// contact-relay - Contact form to SMTP relay
#[derive(Parser)]
#[command(name = "contact-relay")]
#[command(about = "Relays contact form submissions to a mailbox over SMTP", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Report which mail settings are present without sending anything
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Local development convenience; deployments set real variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    contact_relay::observability::init_observability(
        "contact-relay",
        env!("CARGO_PKG_VERSION"),
        &config.observability,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Check => check_command(config),
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting contact-relay server...");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    if let Err(e) = config.smtp.envelope() {
        tracing::warn!(error = %e, "Mail relay is not ready, submissions will fail until it is configured");
    }

    let app = contact_relay::create_smtp_app(config);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

fn check_command(config: Config) -> Result<()> {
    let smtp = &config.smtp;
    let present = |value: Option<&str>| if value.is_some() { "set" } else { "missing" };

    tracing::info!(
        smtp_server = %smtp.server,
        smtp_port = smtp.port,
        timeout_secs = smtp.timeout_secs,
        "SMTP relay"
    );
    tracing::info!(
        sender_email = present(smtp.sender_email()),
        sender_password = present(smtp.sender_password()),
        receiver_email = smtp.receiver_email().unwrap_or("missing"),
        "Mail credentials"
    );

    match smtp.envelope() {
        Ok(_) => {
            tracing::info!("Mail relay configuration is complete");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e)),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
