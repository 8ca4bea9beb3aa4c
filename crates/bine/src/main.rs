//! bine - Project-scoped binary version manager
//!
//! Entry point for the `bine` command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Must happen before any TLS operation
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let global = cli.global_options();
    match cli.command {
        Commands::Get(args) => commands::get::run(args, &global).await,
        Commands::Run(args) => {
            let code = commands::run::run(args, &global).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Sync => commands::sync::run(&global).await,
        Commands::List(args) => commands::list::run(args, &global).await,
        Commands::Upgrade(args) => commands::upgrade::run(args, &global).await,
        Commands::Path => commands::path::run(&global).await,
        Commands::Env(args) => commands::env::run(args, &global).await,
        Commands::Config(args) => commands::config::run(args, &global).await,
        Commands::Version(args) => commands::version::run(args),
    }
}

/// Initialize tracing on stderr; `RUST_LOG` wins over the flags
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
