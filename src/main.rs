use std::{io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use photoapp_client::{
    config::{self, DEFAULT_CONFIG_FILE},
    console::Console,
    dispatch::{run_session, SessionSettings},
    logging, PhotoAppClient,
};

/// Interactive client for the PhotoApp web service.
#[derive(Debug, Parser)]
#[command(name = "photoapp")]
#[command(about = "Interactive client for the PhotoApp web service", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, value_name = "PATH")]
    config: PathBuf,

    /// Base URL of the web service; overrides the config file and
    /// PHOTOAPP_WEBSERVICE.
    #[arg(long, value_name = "URL")]
    webservice: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("**ERROR: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    println!("** Welcome to Multi-tier PhotoApp **");
    println!();

    let mut cfg = config::load(&cli.config)?;
    if let Some(url) = &cli.webservice {
        cfg.override_webservice(url)?;
    }

    if let Err(err) = logging::init_logging(&cfg.logging) {
        logging::init_logging_stderr();
        tracing::warn!("could not open log file, logging to stderr: {err}");
    }
    tracing::debug!(?cfg, "loaded config");

    let client = PhotoAppClient::from_config(&cfg).context("failed to build client")?;
    let settings = SessionSettings {
        download_dir: cfg.download_dir(),
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    run_session(&client, &mut console, &settings).await?;

    println!();
    println!("** done **");
    Ok(())
}
