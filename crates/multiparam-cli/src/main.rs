#![forbid(unsafe_code)]

mod algo;
mod cli;
mod config;
mod error;
mod finder;
mod population;
mod report;

use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli::run() {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}
