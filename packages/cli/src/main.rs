mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{config, replay, ConfigArgs, ReplayArgs};
use tracing_subscriber::EnvFilter;

/// Inkframe CLI - Inspect and exercise the embedded editor headlessly
#[derive(Parser, Debug)]
#[command(name = "inkframe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an embed URL query string into the editor configuration
    Config(ConfigArgs),

    /// Replay a script of parent messages against a headless editor
    Replay(ReplayArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config(args) => config(args),
        Command::Replay(args) => replay(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
