mod commands;
mod config;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, check, init, preview, scan, ApplyArgs, CheckArgs, InitArgs, PreviewArgs, ScanArgs,
};
use tracing_subscriber::EnvFilter;

/// attrmark - `{.class #id key=value}` annotations for rendered text
#[derive(Parser, Debug)]
#[command(name = "attrmark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default attrmark.config.json
    Init(InitArgs),

    /// Apply annotations to a JSON element tree
    Apply(ApplyArgs),

    /// List the annotations that end each line of a file
    Scan(ScanArgs),

    /// Report annotations a strict host would reject
    Check(CheckArgs),

    /// Show the live decorations for a file
    Preview(PreviewArgs),
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
                Command::Scan(args) => scan(args, &cwd),
                Command::Check(args) => check(args, &cwd),
                Command::Preview(args) => preview(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
