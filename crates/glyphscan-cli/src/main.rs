mod analyze_cmd;
mod cli;
mod config;
mod glyphs_cmd;
mod page_range;
mod report;
mod scan_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Scan {
            ref input,
            no_labels,
            json,
            threshold,
            ref detection,
        } => scan_cmd::run(input, no_labels, json, threshold, detection),
        cli::Commands::Glyphs {
            ref file,
            ref pages,
            ref format,
        } => glyphs_cmd::run(file, pages.as_deref(), format),
        cli::Commands::Analyze {
            ref file,
            ref format,
            ref detection,
        } => analyze_cmd::run(file, format, detection),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr. `-v` flags win over `RUST_LOG`; the fallback level is `warn`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
