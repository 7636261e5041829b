use clap::Parser;
use std::process;
use weather_pipeline::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(commands::run(args)) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // The pipeline has already logged the failure with its stage
            // context; surface the description on stderr for the caller.
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
