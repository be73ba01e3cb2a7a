//! sass-generator CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run the batch,
//! and exit with a non-zero status on configuration errors.
//! For programmatic use, prefer the library API (`sass_generator::SassGenerator`).

use clap::Parser;

use sass_generator::cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
