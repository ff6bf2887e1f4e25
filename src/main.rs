//! Rotular CLI
//!
//! Entry point for the caption-pipeline tooling.
//!
//! # Usage
//!
//! ```bash
//! # Clean a raw annotation file into a corpus artifact
//! rotular prepare Flickr8k.token.txt --output captions.json
//!
//! # Build the training vocabulary
//! rotular vocab captions.json trainImages.txt --output vocab.json
//!
//! # Summarize an artifact
//! rotular info vocab.json
//! ```

use clap::Parser;
use rotular::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
