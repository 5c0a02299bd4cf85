use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn print_usage() {
    println!("Usage: ssi [-hvp]");
    println!("   -h   Print this help message");
    println!("   -v   Enable verbose mode");
    println!("   -p   Do not print a command prompt");
    process::exit(1);
}

/// Sends logs to stderr, filtered by `RUST_LOG` when set. Otherwise only
/// warnings are shown, or debug output in verbose mode.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
