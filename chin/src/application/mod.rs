pub mod handlers;

use crate::presentation::cli::{Cli, Commands, Verbosity};
use chin_core::error::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Compress {
            sources,
            split_mb,
            out_dir,
        } => handlers::handle_compress(sources, split_mb, out_dir, cli.verbosity.quiet),
        Commands::Decompress { archive, dest } => {
            handlers::handle_decompress(archive, dest, cli.verbosity.quiet)
        }
        Commands::Verify { archive } => handlers::handle_verify(archive),
        Commands::List { archive, json } => handlers::handle_list(archive, json),
    }
}

fn init_tracing(v: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if v.verbose {
            "debug"
        } else if v.quiet {
            "warn"
        } else {
            "info"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
