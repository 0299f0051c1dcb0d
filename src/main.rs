use anyhow::Result;
use clap::Parser;
use portphelia::cli::{self, Args};
use tracing_subscriber::EnvFilter;

/// Log filter: `PORTPHELIA_LOG` wins, otherwise `-v` raises the level.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "portphelia=warn",
        1 => "portphelia=info",
        _ => "portphelia=debug",
    };
    let filter = EnvFilter::try_from_env("PORTPHELIA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);
    cli::run(args)
}
