//! rbacfs shell
//!
//! Interactive front end for the role-gated file store.

use anyhow::{Context, Result};
use clap::Parser;
use rbacfs_cli::settings::{build_shell, load_config};
use rbacfs_cli::Console;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Role-gated file shell
#[derive(Parser, Debug)]
#[command(name = "rbacfs")]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (JSON)
    #[arg(short, long, env = "RBACFS_CONFIG")]
    config: Option<PathBuf>,

    /// Base directory for relative file paths
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(short = 'e', long = "command", value_name = "LINE")]
    command: Option<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with shell output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    info!("rbacfs v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let mut shell = build_shell(&config, args.root).context("Failed to initialize shell")?;
    let console = Console::new();

    if let Some(line) = args.command {
        console.render(&shell.execute(&line));
        return Ok(());
    }

    console.print_banner();

    let mut editor = rustyline::DefaultEditor::new().context("Failed to create line editor")?;

    loop {
        match editor.readline("(rbacfs) ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        debug!("History entry not added: {}", e);
                    }
                }
                if !console.render(&shell.execute(&line)) {
                    break;
                }
            }
            // Ctrl+C clears the current line
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                console.print_error(&format!("Readline error: {}", e));
                break;
            }
        }
    }

    Ok(())
}
