//! IntelSphere CLI and HTTP gateway entry point.
//!
//! Binary name: `sphere`
//!
//! Parses CLI arguments, loads configuration, wires the provider registry,
//! then dispatches to the command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Commands};
use intelsphere_infra::config::{load_global_config, resolve_config_path};
use intelsphere_infra::secret::EnvKeySource;
use intelsphere_observe::tracing_setup::{
    LogFormat, TracingOptions, init_tracing, shutdown_tracing, verbosity_filter,
};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut tracing_options = TracingOptions::new(verbosity_filter(cli.verbose, cli.quiet));
    if cli.log_json {
        tracing_options.format = LogFormat::Json;
    }
    tracing_options.enable_otel = cli.otel;
    if let Err(e) = init_tracing(&tracing_options) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = load_global_config(&config_path).await;
    let keys = EnvKeySource::new();

    match cli.command {
        Commands::Providers => {
            cli::providers::list_providers(&config, &keys, cli.json)?;
        }

        Commands::Ask {
            prompt,
            personality,
        } => {
            let state = AppState::init(config, &keys)?;
            cli::ask::ask(&state, &prompt, &personality, cli.json).await?;
        }

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = format!("{}:{}", config.server.host, config.server.port);

            let state = AppState::init(config, &keys)?;
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} IntelSphere gateway listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {} provider{} in roster, config {}",
                    console::style(state.aggregator.registry().len()).bold(),
                    if state.aggregator.registry().len() == 1 { "" } else { "s" },
                    console::style(config_path.display()).dim()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, "HTTP server started");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A signal handler that cannot be installed never fires; the other one
/// still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
