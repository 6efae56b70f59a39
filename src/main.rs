mod cli;
mod commands;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Annotate { input, output_dir } => commands::annotate::run(input, output_dir),
        cli::Commands::Labels { input, output_file } => commands::labels::run(input, output_file),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
