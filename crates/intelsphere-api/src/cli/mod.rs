//! CLI command definitions for the `sphere` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod providers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Multi-provider LLM intelligence gateway.
#[derive(Parser)]
#[command(name = "sphere", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to sphere.toml (defaults to the user config directory).
    #[arg(long, global = true, env = "SPHERE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export provider-call spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway.
    Serve {
        /// Address to bind (overrides `server.host`).
        #[arg(long, env = "SPHERE_HOST")]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long, env = "SPHERE_PORT")]
        port: Option<u16>,
    },

    /// Fan a prompt out to every provider and print the combined answer.
    Ask {
        /// The question or analysis request.
        prompt: String,

        /// Analyst personality (e.g. strategic, osint-analyst).
        #[arg(long, short = 'p', default_value = "strategic")]
        personality: String,
    },

    /// List the provider roster and whether each API key is set.
    #[command(alias = "ls")]
    Providers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_serve_overrides() {
        let cli = Cli::try_parse_from(["sphere", "-vv", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(port, Some(8080));
                assert!(host.is_none() || std::env::var("SPHERE_HOST").is_ok());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from([
            "sphere",
            "ask",
            "Profile Acme Corp",
            "--personality",
            "osint-analyst",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Ask {
                prompt,
                personality,
            } => {
                assert_eq!(prompt, "Profile Acme Corp");
                assert_eq!(personality, "osint-analyst");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
