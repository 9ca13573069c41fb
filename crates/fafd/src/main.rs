//! fafd — the FAF daemon.
//!
//! Serves the D-FAF/P-FAF JSON API, or evaluates a single request body
//! from a file or stdin.
//!
//! # Usage
//!
//! ```text
//! fafd serve --config fafd.toml --port 5000
//! echo '{"x": [0, 1], "n_iterations": 1}' | fafd eval dfaf
//! ```

mod eval;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use faf_core::{FafConfig, TransformKind};

#[derive(Parser)]
#[command(name = "fafd", about = "FAF transform service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Path to fafd.toml. Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind, overriding [server].bind.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on, overriding [server].port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one transform request and print the result as JSON.
    Eval {
        /// Transform to run: dfaf or pfaf.
        transform: TransformKind,

        /// Request body file; `-` or omitted reads stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path to fafd.toml, for request limits.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,fafd=debug,faf=debug"))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, bind, port } => {
            let mut config = FafConfig::load(config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Eval {
            transform,
            input,
            config,
        } => {
            let config = FafConfig::load(config.as_deref())?;
            let mut stdout = std::io::stdout().lock();
            eval::run(transform, input.as_deref(), &config.limits, &mut stdout)
        }
    }
}

async fn serve(config: FafConfig) -> anyhow::Result<()> {
    info!(
        max_iterations = config.limits.max_iterations,
        max_elements = config.limits.max_elements,
        body_limit_bytes = config.server.body_limit_bytes,
        "FAF daemon starting"
    );

    let router = faf_api::build_router(&config);
    let listener =
        tokio::net::TcpListener::bind((config.server.bind.as_str(), config.server.port)).await?;
    info!(addr = %listener.local_addr()?, "API server listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("FAF daemon stopped");
    Ok(())
}
