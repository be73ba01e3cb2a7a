//! `sass-dump`: the same command as `sass-generator` under its historical name.

use clap::{CommandFactory, FromArgMatches};

use sass_generator::cli::{self, CliArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = CliArgs::command().name("sass-dump").get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;
    cli::run(args)
}
