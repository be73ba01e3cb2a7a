//! Command Line Interface (CLI) layer.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) shared by both binaries. It wires
//! user-provided options to the batch driver exposed via `sass_generator::api`.
//!
//! If you are embedding the generator into another application, prefer using
//! `sass_generator::SassGenerator` instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
