//! CLI module for rotular
//!
//! Command definitions and handlers for the `rotular` binary.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Rotular: image-caption training pipeline
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "rotular")]
#[command(version)]
#[command(about = "Caption corpus preparation, vocabulary building, and artifact inspection")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Parse and clean a raw annotation file into a corpus artifact
    Prepare(PrepareArgs),

    /// Build a vocabulary from a cleaned corpus and a training split
    Vocab(VocabArgs),

    /// Summarize a corpus or vocabulary artifact
    Info(InfoArgs),
}

/// Arguments for the prepare command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PrepareArgs {
    /// Raw annotation file (`<photo>.jpg#<n>\t<caption>` lines)
    #[arg(value_name = "CAPTIONS")]
    pub captions: PathBuf,

    /// Output path for the cleaned corpus JSON
    #[arg(short, long, default_value = "captions.json")]
    pub output: PathBuf,
}

/// Arguments for the vocab command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct VocabArgs {
    /// Cleaned corpus artifact produced by `prepare`
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Training split manifest (one image filename per line)
    #[arg(value_name = "SPLIT")]
    pub split: PathBuf,

    /// Minimum corpus-wide token frequency
    #[arg(short, long, default_value_t = 2)]
    pub min_frequency: usize,

    /// Output path for the vocabulary JSON
    #[arg(short, long, default_value = "vocab.json")]
    pub output: PathBuf,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Corpus or vocabulary artifact to summarize
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,
}
