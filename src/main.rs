use ssi::shell::{Options, Shell};
use ssi::utils;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command-line arguments.
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    for arg in &args[1..] {
        match arg.as_str() {
            "-h" => utils::print_usage(),
            "-v" => options.verbose = true,
            "-p" => options.emit_prompt = false,
            _ => {}
        }
    }

    utils::init_logging(options.verbose);

    // Run the main shell loop with the options.
    match Shell::new(options).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ssi: {}", e);
            ExitCode::FAILURE
        }
    }
}
